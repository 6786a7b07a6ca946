//! Depot helpers for reading the authenticated account in handlers.

use crate::error::{ServiceError, ServiceResult};
use crate::model::account::Account;

pub mod depot_keys {
    pub const AUTHENTICATED_ACCOUNT: &str = "__authenticated_account";
}

/// Get the authenticated account from the depot.
///
/// ## Errors
///
/// Returns `NotAuthenticated` if the auth middleware did not store one.
pub fn get_account_from_depot(depot: &salvo::Depot) -> ServiceResult<&Account> {
    depot
        .get::<Account>(depot_keys::AUTHENTICATED_ACCOUNT)
        .map_err(|_missing| ServiceError::NotAuthenticated)
}

#[must_use]
pub fn is_authenticated(depot: &salvo::Depot) -> bool {
    depot.get::<Account>(depot_keys::AUTHENTICATED_ACCOUNT).is_ok()
}
