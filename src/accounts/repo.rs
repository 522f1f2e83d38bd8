//! Account persistence
//!
//! The service talks to a repository trait; the Postgres implementation is
//! the production collaborator, and tests substitute an in-memory double.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::accounts::model::{Account, AccountRole, AccountStatus};
use crate::error::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Corrupt account row {id}: bad {field}")]
    Corrupt { id: Uuid, field: &'static str },
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Database(e) => ApiError::from(e),
            RepoError::Corrupt { .. } => {
                tracing::error!("{err}");
                ApiError::Database(err.to_string())
            }
        }
    }
}

/// Storage collaborator for accounts. `save` has insert-or-full-replace
/// semantics keyed by id.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn load_by_email(&self, email: &str) -> Result<Option<Account>, RepoError>;
    async fn load_by_id(&self, id: Uuid) -> Result<Option<Account>, RepoError>;
    async fn save(&self, account: &Account) -> Result<(), RepoError>;
}

// =============================================================================
// Postgres implementation
// =============================================================================

pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    password_hash: String,
    name: String,
    status: String,
    role: String,
    last_login_at: Option<OffsetDateTime>,
}

impl AccountRow {
    fn into_account(self) -> Result<Account, RepoError> {
        let status = AccountStatus::parse(&self.status).ok_or(RepoError::Corrupt {
            id: self.id,
            field: "status",
        })?;
        let role = AccountRole::parse(&self.role).ok_or(RepoError::Corrupt {
            id: self.id,
            field: "role",
        })?;
        Ok(Account {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
            name: self.name,
            status,
            role,
            last_login_at: self.last_login_at,
        })
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn load_by_email(&self, email: &str) -> Result<Option<Account>, RepoError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, email, password_hash, name, status, role, last_login_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn load_by_id(&self, id: Uuid) -> Result<Option<Account>, RepoError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, email, password_hash, name, status, role, last_login_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn save(&self, account: &Account) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, password_hash, name, status, role, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                name = EXCLUDED.name,
                status = EXCLUDED.status,
                role = EXCLUDED.role,
                last_login_at = EXCLUDED.last_login_at,
                updated_at = NOW()
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.name)
        .bind(account.status.as_str())
        .bind(account.role.as_str())
        .bind(account.last_login_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// In-memory implementation (tests)
// =============================================================================

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Test double with the same insert-or-replace semantics as Postgres
    #[derive(Default)]
    pub struct InMemoryAccountRepository {
        accounts: Mutex<HashMap<Uuid, Account>>,
    }

    #[async_trait]
    impl AccountRepository for InMemoryAccountRepository {
        async fn load_by_email(&self, email: &str) -> Result<Option<Account>, RepoError> {
            #[allow(clippy::unwrap_used)]
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts.values().find(|a| a.email == email).cloned())
        }

        async fn load_by_id(&self, id: Uuid) -> Result<Option<Account>, RepoError> {
            #[allow(clippy::unwrap_used)]
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts.get(&id).cloned())
        }

        async fn save(&self, account: &Account) -> Result<(), RepoError> {
            #[allow(clippy::unwrap_used)]
            let mut accounts = self.accounts.lock().unwrap();
            accounts.insert(account.id, account.clone());
            Ok(())
        }
    }
}
