//! Authentication for the budget tracker
//!
//! Owns the credential store, Argon2 password hashing and the stateless JWT
//! session issuer. The API service mounts the HTTP routes on top of
//! [`AuthService`].

pub mod error;
pub mod jwt;
pub mod models;
pub mod password;
pub mod repositories;
pub mod service;
pub mod validation;

pub use error::{AuthError, AuthResult, INVALID_CREDENTIALS};
pub use jwt::{IssuedToken, JwtConfig, JwtService};
pub use password::{CredentialHasher, HashingConfig};
pub use service::{AuthService, LoginOutcome};
