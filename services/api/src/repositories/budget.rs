//! Budget repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use common::MonthKey;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::Budget;

/// Persistence for monthly budgets keyed by (owner, month)
#[async_trait]
pub trait BudgetStore: Send + Sync {
    /// Create the budget or overwrite the amount of the existing one
    async fn upsert(&self, owner_id: Uuid, month: MonthKey, amount: f64) -> DatabaseResult<Budget>;

    /// Budget of `owner_id` for `month`, if one was set
    async fn find(&self, owner_id: Uuid, month: MonthKey) -> DatabaseResult<Option<Budget>>;
}

/// PostgreSQL budget repository
#[derive(Clone)]
pub struct PgBudgetRepository {
    pool: PgPool,
}

impl PgBudgetRepository {
    /// Create a new budget repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn budget_from_row(row: &PgRow) -> DatabaseResult<Budget> {
    let month: String = row.try_get("month").map_err(DatabaseError::Query)?;
    let month = MonthKey::parse(&month)
        .map_err(|e| DatabaseError::Query(sqlx::Error::Decode(Box::new(e))))?;

    Ok(Budget {
        id: row.try_get("id").map_err(DatabaseError::Query)?,
        owner_id: row.try_get("owner_id").map_err(DatabaseError::Query)?,
        month,
        amount: row.try_get("amount").map_err(DatabaseError::Query)?,
        created_at: row.try_get("created_at").map_err(DatabaseError::Query)?,
        updated_at: row.try_get("updated_at").map_err(DatabaseError::Query)?,
    })
}

#[async_trait]
impl BudgetStore for PgBudgetRepository {
    async fn upsert(&self, owner_id: Uuid, month: MonthKey, amount: f64) -> DatabaseResult<Budget> {
        info!("Setting budget {} for user {}", month, owner_id);

        let row = sqlx::query(
            r#"
            INSERT INTO budgets (id, owner_id, month, amount)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (owner_id, month)
            DO UPDATE SET amount = EXCLUDED.amount, updated_at = now()
            RETURNING id, owner_id, month, amount, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(month.to_string())
        .bind(amount)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::query)?;

        budget_from_row(&row)
    }

    async fn find(&self, owner_id: Uuid, month: MonthKey) -> DatabaseResult<Option<Budget>> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, month, amount, created_at, updated_at
            FROM budgets
            WHERE owner_id = $1 AND month = $2
            "#,
        )
        .bind(owner_id)
        .bind(month.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::query)?;

        row.as_ref().map(budget_from_row).transpose()
    }
}

/// In-process budget repository
#[derive(Clone, Default)]
pub struct InMemoryBudgetRepository {
    budgets: Arc<RwLock<HashMap<(Uuid, MonthKey), Budget>>>,
}

impl InMemoryBudgetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BudgetStore for InMemoryBudgetRepository {
    async fn upsert(&self, owner_id: Uuid, month: MonthKey, amount: f64) -> DatabaseResult<Budget> {
        let mut budgets = self.budgets.write().await;
        let now = Utc::now();

        let budget = budgets
            .entry((owner_id, month))
            .and_modify(|budget| {
                budget.amount = amount;
                budget.updated_at = now;
            })
            .or_insert_with(|| Budget {
                id: Uuid::new_v4(),
                owner_id,
                month,
                amount,
                created_at: now,
                updated_at: now,
            });

        Ok(budget.clone())
    }

    async fn find(&self, owner_id: Uuid, month: MonthKey) -> DatabaseResult<Option<Budget>> {
        let budgets = self.budgets.read().await;
        Ok(budgets.get(&(owner_id, month)).cloned())
    }
}
