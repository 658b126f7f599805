//! Client error types

use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the API or handling the local session
#[derive(Error, Debug)]
pub enum ClientError {
    /// The API rejected the credentials or token (HTTP 401)
    #[error("{0}")]
    Unauthorized(String),

    /// Any other non-success response; `message` is the server's own text
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    /// The request never produced a usable response
    #[error("Could not reach the API: {0}")]
    Transport(#[from] reqwest::Error),

    /// The session file could not be read or written
    #[error("Session error: {0}")]
    Session(String),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }
}

/// Type alias for client results
pub type ClientResult<T> = Result<T, ClientError>;
