use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

const NAME_LEN: std::ops::RangeInclusive<usize> = 2..=50;
const MIN_PASSWORD_LEN: usize = 6;

/// A stored account. Accounts provisioned by single-user or proxy
/// authentication carry no password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: Option<String>,
}

impl NewAccount<'_> {
    #[must_use]
    pub fn into_account(self) -> Account {
        Account {
            id: Uuid::now_v7(),
            name: self.name.trim().to_string(),
            email: normalize_email(self.email),
            password_hash: self.password_hash,
            created_at: Utc::now(),
        }
    }
}

/// What handlers hand back to clients; never includes the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    /// ## Errors
    /// Returns `ValidationError` for a name outside 2..=50 characters, an
    /// email without a local part and domain, or a password under 6 characters.
    pub fn validate(&self) -> ServiceResult<()> {
        let name_len = self.name.trim().chars().count();
        if !NAME_LEN.contains(&name_len) {
            return Err(ServiceError::ValidationError(
                "name must be between 2 and 50 characters".to_string(),
            ));
        }
        if !is_plausible_email(&self.email) {
            return Err(ServiceError::ValidationError(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::ValidationError(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Emails compare case-insensitively and without surrounding whitespace.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_plausible_email(email: &str) -> bool {
    email
        .trim()
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        })
}
