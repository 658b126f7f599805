//! Expense ledger routes

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{CreateExpenseRequest, DeleteResponse, Expense},
    state::AppState,
};

/// All expenses of the caller, newest first
pub async fn list_expenses(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Expense>>> {
    let expenses = state.expenses.list_by_owner(user.id).await?;
    Ok(Json(expenses))
}

/// Record an expense for the caller
pub async fn create_expense(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let new_expense = payload.validate(user.id, Utc::now())?;

    let expense = state.expenses.create(&new_expense).await?;
    info!("User {} recorded expense {}", user.id, expense.id);

    Ok((StatusCode::CREATED, Json(expense)))
}

/// Delete one of the caller's expenses
///
/// Unknown ids, malformed ids and other users' expenses all answer 404.
pub async fn delete_expense(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let not_found = || ApiError::NotFound("Expense not found".to_string());

    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    if !state.expenses.delete_owned(user.id, id).await? {
        return Err(not_found());
    }

    Ok(Json(DeleteResponse {
        ok: true,
        message: "Expense deleted".to_string(),
    }))
}
