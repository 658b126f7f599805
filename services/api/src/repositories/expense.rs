//! Expense repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::{Expense, NewExpense};

/// Persistence for expenses, always scoped to an owner
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Insert a validated expense
    async fn create(&self, expense: &NewExpense) -> DatabaseResult<Expense>;

    /// Every expense of `owner_id`, newest date first
    async fn list_by_owner(&self, owner_id: Uuid) -> DatabaseResult<Vec<Expense>>;

    /// Delete an expense only if `owner_id` owns it; `false` when nothing matched
    async fn delete_owned(&self, owner_id: Uuid, id: Uuid) -> DatabaseResult<bool>;
}

/// PostgreSQL expense repository
#[derive(Clone)]
pub struct PgExpenseRepository {
    pool: PgPool,
}

impl PgExpenseRepository {
    /// Create a new expense repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn expense_from_row(row: &PgRow) -> DatabaseResult<Expense> {
    Ok(Expense {
        id: row.try_get("id").map_err(DatabaseError::Query)?,
        owner_id: row.try_get("owner_id").map_err(DatabaseError::Query)?,
        title: row.try_get("title").map_err(DatabaseError::Query)?,
        amount: row.try_get("amount").map_err(DatabaseError::Query)?,
        category: row.try_get("category").map_err(DatabaseError::Query)?,
        date: row.try_get("date").map_err(DatabaseError::Query)?,
        created_at: row.try_get("created_at").map_err(DatabaseError::Query)?,
    })
}

#[async_trait]
impl ExpenseStore for PgExpenseRepository {
    async fn create(&self, expense: &NewExpense) -> DatabaseResult<Expense> {
        let row = sqlx::query(
            r#"
            INSERT INTO expenses (id, owner_id, title, amount, category, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, title, amount, category, date, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(expense.owner_id)
        .bind(&expense.title)
        .bind(expense.amount)
        .bind(&expense.category)
        .bind(expense.date)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::query)?;

        expense_from_row(&row)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> DatabaseResult<Vec<Expense>> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, title, amount, category, date, created_at
            FROM expenses
            WHERE owner_id = $1
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::query)?;

        rows.iter().map(expense_from_row).collect()
    }

    async fn delete_owned(&self, owner_id: Uuid, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM expenses
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::query)?;

        if result.rows_affected() > 0 {
            info!("Deleted expense {} for user {}", id, owner_id);
        }

        Ok(result.rows_affected() > 0)
    }
}

/// In-process expense repository
#[derive(Clone, Default)]
pub struct InMemoryExpenseRepository {
    expenses: Arc<RwLock<HashMap<Uuid, Expense>>>,
}

impl InMemoryExpenseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpenseStore for InMemoryExpenseRepository {
    async fn create(&self, expense: &NewExpense) -> DatabaseResult<Expense> {
        let expense = Expense {
            id: Uuid::new_v4(),
            owner_id: expense.owner_id,
            title: expense.title.clone(),
            amount: expense.amount,
            category: expense.category.clone(),
            date: expense.date,
            created_at: Utc::now(),
        };

        self.expenses
            .write()
            .await
            .insert(expense.id, expense.clone());

        Ok(expense)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> DatabaseResult<Vec<Expense>> {
        let expenses = self.expenses.read().await;

        let mut owned: Vec<Expense> = expenses
            .values()
            .filter(|expense| expense.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        Ok(owned)
    }

    async fn delete_owned(&self, owner_id: Uuid, id: Uuid) -> DatabaseResult<bool> {
        let mut expenses = self.expenses.write().await;

        match expenses.get(&id) {
            Some(expense) if expense.owner_id == owner_id => {
                expenses.remove(&id);
                info!("Deleted expense {} for user {}", id, owner_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};

    fn new_expense(owner_id: Uuid, title: &str, date: DateTime<Utc>) -> NewExpense {
        NewExpense {
            owner_id,
            title: title.to_string(),
            amount: 10.0,
            category: "General".to_string(),
            date,
        }
    }

    #[tokio::test]
    async fn test_list_is_scoped_and_newest_first() {
        let repo = InMemoryExpenseRepository::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        let may = Utc.with_ymd_and_hms(2025, 5, 20, 0, 0, 0).unwrap();
        let june = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        repo.create(&new_expense(owner, "May", may)).await.unwrap();
        repo.create(&new_expense(owner, "June", june)).await.unwrap();
        repo.create(&new_expense(other, "Theirs", june)).await.unwrap();

        let titles: Vec<String> = repo
            .list_by_owner(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|expense| expense.title)
            .collect();
        assert_eq!(titles, vec!["June", "May"]);
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let repo = InMemoryExpenseRepository::new();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let expense = repo
            .create(&new_expense(owner, "Rent", Utc::now()))
            .await
            .unwrap();

        assert!(!repo.delete_owned(intruder, expense.id).await.unwrap());
        assert_eq!(repo.list_by_owner(owner).await.unwrap().len(), 1);

        assert!(repo.delete_owned(owner, expense.id).await.unwrap());
        assert!(repo.list_by_owner(owner).await.unwrap().is_empty());
        assert!(!repo.delete_owned(owner, expense.id).await.unwrap());
    }
}
