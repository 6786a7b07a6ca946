use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use almanac_core::config::{AuthMethod, ProxyAuthConfig, Settings};

use super::account::{login, provision_account};
use super::password::run_blocking;
use crate::error::{ServiceError, ServiceResult};
use crate::model::account::{Account, Credentials, NewAccount};
use crate::store::{AccountStore, TaskStore};

/// Get the user configured in settings for single user authentication.
///
/// If it doesn't exist, provision it.
///
/// ## Errors
///
/// Returns an error if the section is missing or the account cannot be stored.
#[tracing::instrument(skip(store, config))]
fn authenticate_single_user<S>(store: &S, config: &Settings) -> ServiceResult<Account>
where
    S: AccountStore + TaskStore + ?Sized,
{
    let single_user = config
        .auth
        .single_user
        .as_ref()
        .ok_or_else(|| {
            ServiceError::InvalidConfiguration("Single user config is missing".to_string())
        })?;

    if let Some(account) = store.account_by_email(&single_user.email)? {
        tracing::trace!(email = %account.email, "Single user already exists");
        return Ok(account);
    }

    tracing::debug!(email = %single_user.email, "Creating single user");
    provision_account(
        store,
        NewAccount {
            name: &single_user.name,
            email: &single_user.email,
            password_hash: None,
        },
    )
}

/// Splits an `Authorization: Basic ...` header into credentials.
fn parse_basic_auth(header: &str) -> Option<Credentials> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (email, password) = decoded.split_once(':')?;

    Some(Credentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Checks HTTP Basic credentials, verifying the password off the async
/// workers.
async fn authenticate_basic<S>(req: &salvo::Request, store: Arc<S>) -> ServiceResult<Account>
where
    S: AccountStore + ?Sized + 'static,
{
    let credentials = req
        .headers()
        .get(salvo::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic_auth)
        .ok_or(ServiceError::NotAuthenticated)?;

    run_blocking(move || login(&*store, &credentials)).await
}

/// Trusts the identity header set by a fronting proxy, provisioning the
/// account on first sight.
fn authenticate_proxy<S>(req: &salvo::Request, store: &S, config: &Settings) -> ServiceResult<Account>
where
    S: AccountStore + TaskStore + ?Sized,
{
    let proxy = config.auth.proxy.clone().unwrap_or_default();
    let ProxyAuthConfig { header } = &proxy;

    let email = req
        .headers()
        .get(header.as_str())
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .ok_or(ServiceError::NotAuthenticated)?;

    if let Some(account) = store.account_by_email(email)? {
        return Ok(account);
    }

    let name = email.split_once('@').map_or(email, |(local, _)| local);
    provision_account(
        store,
        NewAccount {
            name,
            email,
            password_hash: None,
        },
    )
}

/// ## Summary
/// Authenticate a request based on the configured authentication method.
///
/// ## Errors
/// Returns `NotAuthenticated` if the request carries no acceptable identity.
#[tracing::instrument(skip(req, store, config))]
pub async fn authenticate<S>(
    req: &salvo::Request,
    store: Arc<S>,
    config: &Settings,
) -> ServiceResult<Account>
where
    S: AccountStore + TaskStore + ?Sized + 'static,
{
    tracing::trace!(auth_method = ?config.auth.method, "Authenticating request");

    match config.auth.method {
        AuthMethod::SingleUser => authenticate_single_user(&*store, config),
        AuthMethod::BasicAuth => authenticate_basic(req, store).await,
        AuthMethod::Proxy => authenticate_proxy(req, &*store, config),
    }
}
