//! Monthly budget routes

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use common::{MonthKey, summary::month_status};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{Budget, BudgetStatusResponse, UpsertBudgetRequest},
    state::AppState,
};

fn parse_month(raw: &str) -> ApiResult<MonthKey> {
    MonthKey::parse(raw).map_err(|e| ApiError::Validation(e.to_string()))
}

/// The caller's budget for a month, `null` when none is set
pub async fn get_budget(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(month): Path<String>,
) -> ApiResult<Json<Option<Budget>>> {
    let month = parse_month(&month)?;
    let budget = state.budgets.find(user.id, month).await?;
    Ok(Json(budget))
}

/// Spend against the budget for a month
pub async fn get_budget_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(month): Path<String>,
) -> ApiResult<Json<BudgetStatusResponse>> {
    let month = parse_month(&month)?;

    let budget = state
        .budgets
        .find(user.id, month)
        .await?
        .map(|budget| budget.amount);
    let expenses = state.expenses.list_by_owner(user.id).await?;

    Ok(Json(BudgetStatusResponse {
        month,
        budget,
        status: month_status(&expenses, month, budget),
    }))
}

/// Create or overwrite the caller's budget for a month
pub async fn upsert_budget(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<UpsertBudgetRequest>, JsonRejection>,
) -> ApiResult<Json<Budget>> {
    let Json(payload) = payload?;
    let (month, amount) = payload.validate()?;

    let budget = state.budgets.upsert(user.id, month, amount).await?;
    info!("User {} set budget for {}", user.id, month);

    Ok(Json(budget))
}
