//! Expense model and request validation

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use common::summary::{ExpenseEntry, normalize_category};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::parse_amount;
use crate::error::{ApiError, ApiResult};

/// Expense entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ExpenseEntry for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

/// Validated expense ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub owner_id: Uuid,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
}

/// Request body for creating an expense
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateExpenseRequest {
    pub title: Option<String>,
    pub amount: Option<Value>,
    pub category: Option<String>,
    pub date: Option<String>,
}

impl CreateExpenseRequest {
    /// Validate the request for `owner_id`, defaulting the date to `now`
    pub fn validate(self, owner_id: Uuid, now: DateTime<Utc>) -> ApiResult<NewExpense> {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .ok_or_else(|| ApiError::Validation("Missing required fields (title, amount)".into()))?
            .to_string();

        let amount = match self.amount.as_ref() {
            None | Some(Value::Null) => {
                return Err(ApiError::Validation(
                    "Missing required fields (title, amount)".into(),
                ));
            }
            Some(value) => parse_amount(value).map_err(ApiError::Validation)?,
        };

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => now,
            Some(raw) => parse_date(raw)
                .ok_or_else(|| ApiError::Validation(format!("Invalid date '{}'", raw)))?,
        };

        Ok(NewExpense {
            owner_id,
            title,
            amount,
            category: normalize_category(self.category.as_deref()),
            date,
        })
    }
}

/// Accept RFC 3339 timestamps, naive timestamps (taken as UTC) and plain dates
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(date.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}
