//! Server configuration
//!
//! Read from `BUDGET_*` environment variables through the `config` crate.
//! Database, JWT and hashing settings keep their own `from_env` loaders.

use anyhow::Result;
use serde::Deserialize;

/// Where expenses, budgets and users are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_address: String,
    pub storage_backend: StorageBackend,
    /// Comma separated list of exact origins allowed to call the API
    pub cors_allowed_origins: String,
    /// Deployed client origin, allowed in addition to the list
    #[serde(default)]
    pub client_url: Option<String>,
    /// Any origin whose host ends with this suffix is allowed
    pub cors_trusted_suffix: String,
}

impl ServerConfig {
    /// Load from the environment
    ///
    /// # Environment Variables
    /// - `BUDGET_BIND_ADDRESS` (default: `0.0.0.0:3000`)
    /// - `BUDGET_STORAGE_BACKEND`: `postgres` or `memory` (default: `postgres`)
    /// - `BUDGET_CORS_ALLOWED_ORIGINS` (default: `http://localhost:5173,http://localhost:3000`)
    /// - `BUDGET_CLIENT_URL` (optional)
    /// - `BUDGET_CORS_TRUSTED_SUFFIX` (default: `.vercel.app`)
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("bind_address", "0.0.0.0:3000")?
            .set_default("storage_backend", "postgres")?
            .set_default(
                "cors_allowed_origins",
                "http://localhost:5173,http://localhost:3000",
            )?
            .set_default("cors_trusted_suffix", ".vercel.app")?
            .add_source(config::Environment::with_prefix("BUDGET"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Exact origins accepted by the CORS policy
    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .split(',')
            .map(str::trim)
            .chain(self.client_url.as_deref().map(str::trim))
            .filter(|origin| !origin.is_empty())
            .map(|origin| origin.trim_end_matches('/').to_string())
            .collect()
    }
}
