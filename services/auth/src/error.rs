//! Authentication errors

use common::error::DatabaseError;
use thiserror::Error;

/// Message shared by every failed login, whatever the cause
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Errors raised while registering, authenticating or verifying tokens
#[derive(Error, Debug)]
pub enum AuthError {
    /// The token could not be decoded
    #[error("Malformed token")]
    Malformed,

    /// The token's expiry is not in the future
    #[error("Token expired")]
    Expired,

    /// The token was not signed with our secret
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Unknown email or wrong password; never says which
    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,

    /// The email is already registered
    #[error("Email is already registered")]
    Duplicate,

    /// Rejected input
    #[error("{0}")]
    Validation(String),

    /// No user behind a verified identity
    #[error("User not found")]
    UserNotFound,

    /// Hashing or signing failed
    #[error("Credential processing failed: {0}")]
    Crypto(String),

    /// The credential store failed
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub type AuthResult<T> = Result<T, AuthError>;
