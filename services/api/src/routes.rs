//! API service routes

use axum::{
    Json, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::json;

use crate::{
    cors::cors_layer,
    error::ApiError,
    middleware::{auth_middleware, origin_guard},
    state::AppState,
};

pub mod auth;
pub mod budgets;
pub mod expenses;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route(
            "/expenses",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route("/expenses/:id", delete(expenses::delete_expense))
        .route("/budgets", post(budgets::upsert_budget))
        .route("/budgets/:month", get(budgets::get_budget))
        .route("/budgets/:month/status", get(budgets::get_budget_status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected_routes)
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), origin_guard))
        .layer(cors_layer(state.origins.clone()))
        .with_state(state)
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match &state.db_pool {
        Some(pool) => match common::database::health_check(pool).await {
            Ok(true) => "ok",
            _ => "unavailable",
        },
        None => "memory",
    };

    Json(json!({
        "status": "ok",
        "service": "budget-api",
        "database": database,
    }))
}
