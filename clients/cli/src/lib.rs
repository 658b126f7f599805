//! Terminal client for the budget tracker
//!
//! Talks to the REST API over HTTP, keeps the session token in a local file
//! and derives monthly summaries with the same budget-status rules as the
//! server.

pub mod api;
pub mod commands;
pub mod error;
pub mod output;
pub mod session;
pub mod views;

pub use api::ApiClient;
pub use error::{ClientError, ClientResult};
pub use session::SessionContext;
