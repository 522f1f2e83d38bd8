//! Accounts API Library
//!
//! This crate contains the account service components: registration, login,
//! stateless JWT sessions and the request authentication pipeline.

pub mod accounts;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
