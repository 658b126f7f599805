//! Monthly budget model

use chrono::{DateTime, Utc};
use common::{BudgetStatus, MonthKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::parse_amount;
use crate::error::{ApiError, ApiResult};

/// Budget entity, one per owner and month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub month: MonthKey,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for setting a month's budget
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertBudgetRequest {
    pub month: Option<String>,
    pub amount: Option<Value>,
}

impl UpsertBudgetRequest {
    /// Validate into a month key and a non-negative amount
    pub fn validate(self) -> ApiResult<(MonthKey, f64)> {
        let (Some(month), Some(amount)) = (self.month, self.amount.filter(|v| !v.is_null()))
        else {
            return Err(ApiError::Validation(
                "Missing required fields (month, amount)".to_string(),
            ));
        };

        let month = MonthKey::parse(month.trim()).map_err(|e| ApiError::Validation(e.to_string()))?;
        let amount = parse_amount(&amount).map_err(ApiError::Validation)?;
        if amount < 0.0 {
            return Err(ApiError::Validation(
                "Amount must be zero or greater".to_string(),
            ));
        }

        Ok((month, amount))
    }
}

/// Budget status for a month, as returned by `GET /budgets/:month/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatusResponse {
    pub month: MonthKey,
    pub budget: Option<f64>,
    #[serde(flatten)]
    pub status: BudgetStatus,
}
