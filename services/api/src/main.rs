use anyhow::Result;
use api::{AppState, ServerConfig, StorageBackend, cors::OriginPolicy, create_router};
use auth::{CredentialHasher, HashingConfig, JwtConfig, JwtService};
use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting budget API");

    let server_config = ServerConfig::from_env()?;
    let jwt = JwtService::new(JwtConfig::from_env()?);
    let hasher = CredentialHasher::new(HashingConfig::from_env())?;
    let origins = OriginPolicy::from_config(&server_config);

    let app_state = match server_config.storage_backend {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            run_migrations(&pool).await?;
            AppState::postgres(pool, hasher, jwt, origins)?
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on restart");
            AppState::in_memory(hasher, jwt, origins)?
        }
    };

    let app = create_router(app_state);

    let listener = TcpListener::bind(&server_config.bind_address).await?;
    info!("Budget API listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
