//! Integration tests for the PostgreSQL infrastructure
//!
//! These tests need a reachable database (`DATABASE_URL`) and are ignored by
//! default. Run them with `cargo test -p common -- --ignored`.

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use sqlx::Row;

/// Migrations apply cleanly and the uniqueness constraints are in place
#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    run_migrations(&pool).await?;
    // Running twice must be a no-op
    run_migrations(&pool).await?;

    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS constraints
        FROM information_schema.table_constraints
        WHERE constraint_type = 'UNIQUE'
          AND constraint_name IN ('users_email_key', 'budgets_owner_month_key')
        "#,
    )
    .fetch_one(&pool)
    .await?;

    let constraints: i64 = row.get("constraints");
    assert_eq!(constraints, 2, "Unique constraints are missing");

    Ok(())
}
