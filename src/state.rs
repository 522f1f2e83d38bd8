//! Shared application state

use std::sync::Arc;

use sqlx::PgPool;

use crate::accounts::{AccountService, PgAccountRepository};
use crate::auth::{AuthState, JwtManager};
use crate::config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: JwtManager,
    pub accounts: AccountService,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Self {
        let jwt = JwtManager::new(
            &config.jwt_secret,
            config.access_token_ttl_minutes,
            config.refresh_token_ttl_days,
        );
        let repo = Arc::new(PgAccountRepository::new(pool.clone()));
        let accounts = AccountService::new(repo, jwt.clone());

        Self {
            pool,
            config: Arc::new(config),
            jwt,
            accounts,
        }
    }

    /// State handed to the authentication middleware
    pub fn auth_state(&self) -> AuthState {
        AuthState {
            jwt: self.jwt.clone(),
        }
    }
}
