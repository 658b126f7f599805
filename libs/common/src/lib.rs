//! Common library for the budget tracker
//!
//! This crate provides functionality shared by the API service and the
//! terminal client: database connectivity, persistence errors, month keys,
//! and the budget status derivation both sides must agree on.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, init_pool, health_check, run_migrations};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let is_healthy = health_check(&pool).await?;
//!     println!("Database health check: {}", is_healthy);
//!     Ok(())
//! }
//! ```

pub mod budget_status;
pub mod database;
pub mod error;
pub mod month;
pub mod summary;

pub use budget_status::{BudgetStatus, Status, compute_status};
pub use month::{MonthKey, MonthKeyError};
pub use summary::{DEFAULT_CATEGORY, ExpenseEntry};
