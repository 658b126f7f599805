//! Budget status derivation
//!
//! Computes how much of a monthly budget has been spent and classifies the
//! result. Both the API service and the terminal client call
//! [`compute_status`], so the thresholds and rounding live only here.

use serde::{Deserialize, Serialize};

/// Usage ratio (percent) at which a budget is flagged as close to the limit
pub const WARN_THRESHOLD_PERCENT: f64 = 70.0;

/// Usage ratio (percent) at which a budget is flagged as exceeded
pub const OVER_THRESHOLD_PERCENT: f64 = 100.0;

/// Classification of spending against the month's budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// No budget set for the month
    NoBudget,
    /// Below the warning threshold
    Ok,
    /// At or above the warning threshold, below the limit
    Warn,
    /// At or above the budget
    Over,
}

impl Status {
    /// Short human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Status::NoBudget => "No budget set",
            Status::Ok => "On track",
            Status::Warn => "Close to the limit",
            Status::Over => "Over budget",
        }
    }
}

/// Spend-versus-budget summary for one month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub total_spent: f64,
    /// `None` when no budget is set; negative once the budget is exceeded
    pub remaining: Option<f64>,
    /// Rounded usage for display
    pub usage_percent: i64,
    /// `usage_percent` clamped to `0..=100`, for progress bars only
    pub bar_percent: i64,
    pub status: Status,
}

/// Sum amounts, counting non-finite values as zero
pub fn total_spent<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    amounts
        .into_iter()
        .map(|amount| if amount.is_finite() { amount } else { 0.0 })
        .sum()
}

/// Derive the status of a month from its expense amounts and optional budget.
///
/// Classification uses the unrounded ratio so that, for example, 69.9% is
/// `Ok` even though it displays as 70%.
pub fn compute_status<I>(amounts: I, budget: Option<f64>) -> BudgetStatus
where
    I: IntoIterator<Item = f64>,
{
    let total_spent = total_spent(amounts);

    let budget = match budget {
        Some(amount) if amount.is_finite() => amount,
        _ => {
            return BudgetStatus {
                total_spent,
                remaining: None,
                usage_percent: 0,
                bar_percent: 0,
                status: Status::NoBudget,
            };
        }
    };

    let raw_percent = if budget > 0.0 {
        total_spent * 100.0 / budget
    } else {
        0.0
    };
    let usage_percent = raw_percent.round() as i64;

    let status = if raw_percent >= OVER_THRESHOLD_PERCENT {
        Status::Over
    } else if raw_percent >= WARN_THRESHOLD_PERCENT {
        Status::Warn
    } else {
        Status::Ok
    };

    BudgetStatus {
        total_spent,
        remaining: Some(budget - total_spent),
        usage_percent,
        bar_percent: usage_percent.clamp(0, 100),
        status,
    }
}
