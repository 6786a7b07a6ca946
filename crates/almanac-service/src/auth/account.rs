use crate::calendar::tasks::ensure_default_lists;
use crate::error::{ServiceError, ServiceResult};
use crate::model::account::{Account, Credentials, NewAccount, Registration};
use crate::store::{AccountStore, TaskStore};

use super::password::{hash_password, verify_password};

/// ## Summary
/// Creates an account and seeds its default task lists.
///
/// ## Side Effects
/// - Inserts the account
/// - Inserts the default task lists for it
///
/// ## Errors
/// Returns `Conflict` if the email is taken, or any storage error.
pub fn provision_account<S>(store: &S, new_account: NewAccount<'_>) -> ServiceResult<Account>
where
    S: AccountStore + TaskStore + ?Sized,
{
    let account = new_account.into_account();
    store.insert_account(account.clone())?;
    ensure_default_lists(store, account.id)?;

    tracing::info!(account_id = %account.id, email = %account.email, "Account created");
    Ok(account)
}

/// ## Summary
/// Registers a password-protected account.
///
/// ## Errors
/// `ValidationError` for malformed input, `Conflict` for a taken email.
#[tracing::instrument(skip(store, registration), fields(email = %registration.email))]
pub fn register<S>(store: &S, registration: &Registration) -> ServiceResult<Account>
where
    S: AccountStore + TaskStore + ?Sized,
{
    registration.validate()?;

    if store.account_by_email(&registration.email)?.is_some() {
        return Err(ServiceError::Conflict(
            "an account with this email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&registration.password)?;
    provision_account(
        store,
        NewAccount {
            name: &registration.name,
            email: &registration.email,
            password_hash: Some(password_hash),
        },
    )
}

/// ## Summary
/// Checks an email/password pair.
///
/// ## Errors
/// `NotAuthenticated` for an unknown email, an account without a password, or
/// a wrong password.
#[tracing::instrument(skip(store, credentials), fields(email = %credentials.email))]
pub fn login<S>(store: &S, credentials: &Credentials) -> ServiceResult<Account>
where
    S: AccountStore + ?Sized,
{
    let account = store
        .account_by_email(&credentials.email)?
        .ok_or(ServiceError::NotAuthenticated)?;
    let hash = account
        .password_hash
        .as_deref()
        .ok_or(ServiceError::NotAuthenticated)?;

    verify_password(&credentials.password, hash)?;
    tracing::debug!(account_id = %account.id, "Credentials accepted");
    Ok(account)
}
