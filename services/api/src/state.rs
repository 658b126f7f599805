//! Application state shared across handlers

use auth::{
    AuthResult, AuthService, CredentialHasher, JwtService,
    repositories::{InMemoryUserRepository, PgUserRepository},
};
use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    cors::OriginPolicy,
    repositories::{
        BudgetStore, ExpenseStore, InMemoryBudgetRepository, InMemoryExpenseRepository,
        PgBudgetRepository, PgExpenseRepository,
    },
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub expenses: Arc<dyn ExpenseStore>,
    pub budgets: Arc<dyn BudgetStore>,
    pub origins: Arc<OriginPolicy>,
    /// Present only for the Postgres backend
    pub db_pool: Option<PgPool>,
}

impl AppState {
    /// State backed by PostgreSQL
    pub fn postgres(
        pool: PgPool,
        hasher: CredentialHasher,
        jwt: JwtService,
        origins: OriginPolicy,
    ) -> AuthResult<Self> {
        let users = Arc::new(PgUserRepository::new(pool.clone()));

        Ok(Self {
            auth: AuthService::new(users, hasher, jwt)?,
            expenses: Arc::new(PgExpenseRepository::new(pool.clone())),
            budgets: Arc::new(PgBudgetRepository::new(pool.clone())),
            origins: Arc::new(origins),
            db_pool: Some(pool),
        })
    }

    /// State kept in process memory, lost on restart
    pub fn in_memory(
        hasher: CredentialHasher,
        jwt: JwtService,
        origins: OriginPolicy,
    ) -> AuthResult<Self> {
        Ok(Self {
            auth: AuthService::new(Arc::new(InMemoryUserRepository::new()), hasher, jwt)?,
            expenses: Arc::new(InMemoryExpenseRepository::new()),
            budgets: Arc::new(InMemoryBudgetRepository::new()),
            origins: Arc::new(origins),
            db_pool: None,
        })
    }
}
