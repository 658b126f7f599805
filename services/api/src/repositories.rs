//! Stores for expenses and budgets
//!
//! Each store is a trait with a PostgreSQL implementation and an in-process
//! one used by tests and the `memory` storage backend.

pub mod budget;
pub mod expense;

pub use budget::{BudgetStore, InMemoryBudgetRepository, PgBudgetRepository};
pub use expense::{ExpenseStore, InMemoryExpenseRepository, PgExpenseRepository};
