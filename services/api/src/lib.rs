//! REST API for the budget tracker
//!
//! Exposes registration, login, the expense ledger and monthly budgets over
//! HTTP. Storage is PostgreSQL in production; an in-memory backend with the
//! same semantics backs the tests.

pub mod config;
pub mod cors;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;

pub use config::{ServerConfig, StorageBackend};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
