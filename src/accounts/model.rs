//! Account domain model

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A registered user account.
///
/// `id` is the stable public identifier embedded in tokens; it is assigned at
/// registration and never changes. The password hash stays inside the service
/// and is never serialized into a response.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub status: AccountStatus,
    pub role: AccountRole,
    pub last_login_at: Option<OffsetDateTime>,
}

impl Account {
    /// Create a fresh account the way registration does: new identity,
    /// active, ordinary user, never logged in.
    pub fn register(email: String, password_hash: String, name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            name: name.trim().to_string(),
            status: AccountStatus::Active,
            role: AccountRole::User,
            last_login_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Record a successful login
    pub fn record_login(&mut self, now: OffsetDateTime) {
        self.last_login_at = Some(now);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(AccountStatus::Active),
            "inactive" => Some(AccountStatus::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    User,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::User => "user",
            AccountRole::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(AccountRole::User),
            "admin" => Some(AccountRole::Admin),
            _ => None,
        }
    }
}

/// Trim, lowercase and validate an email address. Returns the normalized
/// form, or `None` if the input is not a plausible address.
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    is_valid_email(&email).then_some(email)
}

fn is_valid_email(email: &str) -> bool {
    // Length checks per RFC 5321
    if email.len() > 254 || email.is_empty() {
        return false;
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let local = parts[0];
    let domain = parts[1];

    // Local part validation
    if local.is_empty() || local.len() > 64 {
        return false;
    }
    // No leading/trailing/consecutive dots
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    // Allow alphanumeric, dots, hyphens, underscores, plus signs
    if !local
        .chars()
        .all(|c| c.is_alphanumeric() || ".+-_%".contains(c))
    {
        return false;
    }

    // Domain validation
    if domain.is_empty() || domain.len() > 255 {
        return false;
    }
    if domain.starts_with('-') || domain.ends_with('-') {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return false;
    }

    // Must have valid TLD (at least 2 chars, alpha only)
    let domain_parts: Vec<&str> = domain.split('.').collect();
    if domain_parts.len() < 2 {
        return false;
    }
    if let Some(tld) = domain_parts.last() {
        if tld.len() < 2 || !tld.chars().all(|c| c.is_alphabetic()) {
            return false;
        }
    }

    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_lowercases_and_trims() {
        assert_eq!(
            normalize_email("  Ann@Example.COM "),
            Some("ann@example.com".to_string())
        );
    }

    #[test]
    fn test_normalize_email_is_idempotent() {
        let once = normalize_email("  USER.name+tag@Example.Org ").unwrap();
        let twice = normalize_email(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_invalid_emails_rejected() {
        for bad in [
            "",
            "   ",
            "no-at-sign",
            "two@@ats.com",
            "@example.com",
            "user@",
            ".dot@example.com",
            "dot.@example.com",
            "double..dot@example.com",
            "user@-example.com",
            "user@example",
            "user@example.c",
            "user@example.c0m",
        ] {
            assert!(normalize_email(bad).is_none(), "accepted: {bad:?}");
        }
    }

    #[test]
    fn test_register_defaults() {
        let account = Account::register(
            "ann@example.com".to_string(),
            "$argon2id$fake".to_string(),
            "  Ann  ",
        );
        assert_eq!(account.status, AccountStatus::Active);
        assert_eq!(account.role, AccountRole::User);
        assert_eq!(account.name, "Ann");
        assert!(account.last_login_at.is_none());
    }

    #[test]
    fn test_record_login() {
        let mut account = Account::register(
            "ann@example.com".to_string(),
            "$argon2id$fake".to_string(),
            "Ann",
        );
        let now = OffsetDateTime::now_utc();
        account.record_login(now);
        assert_eq!(account.last_login_at, Some(now));
    }

    #[test]
    fn test_status_and_role_round_trip() {
        for status in [AccountStatus::Active, AccountStatus::Inactive] {
            assert_eq!(AccountStatus::parse(status.as_str()), Some(status));
        }
        for role in [AccountRole::User, AccountRole::Admin] {
            assert_eq!(AccountRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(AccountRole::parse("owner"), None);
    }
}
