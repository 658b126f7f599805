//! Calendar month keys in `YYYY-MM` form

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rejected month key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid month '{0}', expected YYYY-MM")]
pub struct MonthKeyError(pub String);

/// A calendar month, the key budgets are stored under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Build a key from numeric parts, month in `1..=12`
    pub fn new(year: i32, month: u32) -> Result<Self, MonthKeyError> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return Err(MonthKeyError(format!("{}-{}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// Strictly parse `YYYY-MM`
    pub fn parse(value: &str) -> Result<Self, MonthKeyError> {
        let invalid = || MonthKeyError(value.to_string());

        let bytes = value.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        let mut digits = bytes[..4].iter().chain(&bytes[5..]);
        if !digits.all(u8::is_ascii_digit) {
            return Err(invalid());
        }

        let year = value[..4].parse().map_err(|_| invalid())?;
        let month = value[5..].parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    /// The month containing the given instant (UTC)
    pub fn of(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
        }
    }

    /// The current UTC month
    pub fn current() -> Self {
        Self::of(Utc::now())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Whether the instant falls inside this calendar month and year
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant.year() == self.year && instant.month() == self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = MonthKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}
