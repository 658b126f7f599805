//! Credential store implementations

pub mod user;

pub use user::{InMemoryUserRepository, PgUserRepository, UserStore};
