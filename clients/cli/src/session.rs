//! Local session state
//!
//! The token and cached profile live in a small JSON file. The lifecycle is
//! hydrate (read the file) -> login (write it) -> logout or an auth failure
//! (delete it). A file that cannot be parsed is treated as no session.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::api::{ApiClient, UserProfile};
use crate::error::{ClientError, ClientResult};

/// Environment variable overriding the session file location
pub const SESSION_FILE_ENV: &str = "BUDGET_SESSION_FILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    user: UserProfile,
}

/// Token and profile of the signed-in user, if any
#[derive(Debug)]
pub struct SessionContext {
    path: PathBuf,
    stored: Option<StoredSession>,
}

impl SessionContext {
    /// `BUDGET_SESSION_FILE`, or `session.json` under the user config directory
    pub fn default_path() -> ClientResult<PathBuf> {
        if let Ok(path) = std::env::var(SESSION_FILE_ENV) {
            return Ok(PathBuf::from(path));
        }

        dirs::config_dir()
            .map(|dir| dir.join("budget-tracker").join("session.json"))
            .ok_or_else(|| ClientError::Session("Could not find a config directory".to_string()))
    }

    /// Load the session stored at `path`
    pub fn hydrate(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let stored = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(stored) => Some(stored),
                Err(e) => {
                    warn!("Ignoring unreadable session file {}: {}", path.display(), e);
                    None
                }
            },
            Err(_) => None,
        };

        Self { path, stored }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn token(&self) -> Option<&str> {
        self.stored.as_ref().map(|stored| stored.token.as_str())
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.stored.as_ref().map(|stored| &stored.user)
    }

    pub fn is_logged_in(&self) -> bool {
        self.stored.is_some()
    }

    /// Token for an authenticated call, or `Unauthorized` when signed out
    pub fn require_token(&self) -> ClientResult<&str> {
        self.token().ok_or_else(|| {
            ClientError::Unauthorized("Not logged in. Run `budget login` first.".to_string())
        })
    }

    /// Remember a freshly issued token
    pub fn login(&mut self, token: String, user: UserProfile) -> ClientResult<()> {
        self.stored = Some(StoredSession { token, user });
        self.persist()
    }

    /// Forget the session and remove the file
    pub fn clear(&mut self) -> ClientResult<()> {
        self.stored = None;

        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Session(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Re-fetch the cached profile through `/auth/me`
    ///
    /// A rejected token clears the session. Other failures keep the cached
    /// profile so offline commands still know who is signed in.
    pub async fn refresh(&mut self, client: &ApiClient) -> ClientResult<()> {
        let Some(token) = self.token().map(str::to_string) else {
            return Ok(());
        };

        match client.me(&token).await {
            Ok(user) => {
                if self.user() != Some(&user) {
                    self.stored = Some(StoredSession { token, user });
                    self.persist()?;
                }
                Ok(())
            }
            Err(err) if err.is_unauthorized() => {
                debug!("Stored token rejected, clearing session");
                self.clear()?;
                Err(err)
            }
            Err(err) => {
                warn!("Could not refresh profile: {}", err);
                Ok(())
            }
        }
    }

    fn persist(&self) -> ClientResult<()> {
        let Some(stored) = &self.stored else {
            return Ok(());
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ClientError::Session(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let contents = serde_json::to_string_pretty(stored)
            .map_err(|e| ClientError::Session(e.to_string()))?;
        fs::write(&self.path, contents).map_err(|e| {
            ClientError::Session(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}
