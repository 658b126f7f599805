//! API models for request and response payloads

use auth::models::UserSummary;
use serde::Serialize;
use serde_json::Value;

pub mod budget;
pub mod expense;

pub use budget::{Budget, BudgetStatusResponse, UpsertBudgetRequest};
pub use expense::{CreateExpenseRequest, Expense, NewExpense};

/// Response for user registration
#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

/// Response for user login
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub user: UserSummary,
}

/// Response acknowledging a deletion
#[derive(Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
    pub message: String,
}

/// Read a monetary amount from a JSON number or numeric string
pub fn parse_amount(value: &Value) -> Result<f64, String> {
    let amount = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match amount {
        Some(amount) if amount.is_finite() => Ok(amount),
        _ => Err("Amount must be a finite number".to_string()),
    }
}
