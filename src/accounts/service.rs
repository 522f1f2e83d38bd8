//! Account use cases: register, login and profile lookup.
//!
//! Orchestrates the repository, the password hasher and the token issuer.
//! Login verifies the password before the status check, so a wrong password
//! on an inactive account reads as `InvalidCredentials` and never leaks
//! activation state to unauthenticated guessers.

use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::accounts::model::{normalize_email, Account, AccountRole};
use crate::accounts::repo::AccountRepository;
use crate::auth::jwt::JwtManager;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{ApiError, ApiResult};

const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 100;
const NAME_MIN: usize = 2;
const NAME_MAX: usize = 50;

/// Result of a successful registration
#[derive(Debug)]
pub struct RegisteredAccount {
    pub id: Uuid,
    pub email: String,
}

/// Result of a successful login
#[derive(Debug)]
pub struct LoginOutcome {
    pub id: Uuid,
    pub email: String,
    pub role: AccountRole,
    pub access_token: String,
    pub refresh_token: String,
}

/// Public profile fields; the password hash never leaves the service
#[derive(Debug)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: AccountRole,
}

impl From<Account> for Profile {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
            role: account.role,
        }
    }
}

#[derive(Clone)]
pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
    jwt: JwtManager,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepository>, jwt: JwtManager) -> Self {
        Self { repo, jwt }
    }

    /// Register a new account with a fresh identity, active status and the
    /// ordinary user role.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> ApiResult<RegisteredAccount> {
        let email = normalize_email(email)
            .ok_or_else(|| ApiError::Validation("Invalid email format".to_string()))?;

        // Bounds are in characters, so multi-byte input is counted correctly
        let password_chars = password.chars().count();
        if password_chars < PASSWORD_MIN || password_chars > PASSWORD_MAX {
            return Err(ApiError::Validation(format!(
                "Password must be between {PASSWORD_MIN} and {PASSWORD_MAX} characters"
            )));
        }

        let name = name.trim();
        let name_chars = name.chars().count();
        if name_chars < NAME_MIN || name_chars > NAME_MAX {
            return Err(ApiError::Validation(format!(
                "Name must be between {NAME_MIN} and {NAME_MAX} characters"
            )));
        }

        if self.repo.load_by_email(&email).await?.is_some() {
            tracing::warn!(email = %email, "register: email already taken");
            return Err(ApiError::DuplicateAccount);
        }

        let password_hash = hash_password(password).map_err(|e| {
            tracing::error!(error = %e, "register: password hashing failed");
            ApiError::Internal
        })?;

        let account = Account::register(email, password_hash, name);
        self.repo.save(&account).await?;

        tracing::info!(account_id = %account.id, "register: account created");

        Ok(RegisteredAccount {
            id: account.id,
            email: account.email,
        })
    }

    /// Authenticate by email and password, record the login and issue a
    /// fresh token pair.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginOutcome> {
        let email = normalize_email(email)
            .ok_or_else(|| ApiError::Validation("Invalid email format".to_string()))?;

        let mut account = self
            .repo
            .load_by_email(&email)
            .await?
            .ok_or_else(|| {
                tracing::warn!(email = %email, "login: account not found");
                ApiError::AccountNotFound
            })?;

        // Password before status: activation state is never revealed to a
        // caller who does not hold the credentials.
        if !verify_password(password, &account.password_hash) {
            tracing::warn!(account_id = %account.id, "login: invalid password");
            return Err(ApiError::InvalidCredentials);
        }

        if !account.is_active() {
            tracing::warn!(account_id = %account.id, "login: account inactive");
            return Err(ApiError::AccountInactive);
        }

        account.record_login(OffsetDateTime::now_utc());
        self.repo.save(&account).await?;

        let access_token = self
            .jwt
            .issue_access_token(account.id, account.role)
            .map_err(|e| {
                tracing::error!(error = %e, "login: token issuance failed");
                ApiError::Internal
            })?;
        let refresh_token = self
            .jwt
            .issue_refresh_token(account.id, account.role)
            .map_err(|e| {
                tracing::error!(error = %e, "login: token issuance failed");
                ApiError::Internal
            })?;

        tracing::info!(account_id = %account.id, "login: successful");

        Ok(LoginOutcome {
            id: account.id,
            email: account.email,
            role: account.role,
            access_token,
            refresh_token,
        })
    }

    /// Look up the public profile for an account identity
    pub async fn profile(&self, id: Uuid) -> ApiResult<Profile> {
        let account = self
            .repo
            .load_by_id(id)
            .await?
            .ok_or(ApiError::AccountNotFound)?;

        Ok(Profile::from(account))
    }
}
