//! Account domain: model, persistence and use cases

pub mod model;
pub mod repo;
pub mod service;

pub use model::{normalize_email, Account, AccountRole, AccountStatus};
pub use repo::{AccountRepository, PgAccountRepository, RepoError};
pub use service::{AccountService, LoginOutcome, Profile, RegisteredAccount};
