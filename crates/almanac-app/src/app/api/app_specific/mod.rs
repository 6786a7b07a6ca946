// App-specific API handlers: health, identity and account creation.

use salvo::Router;

use almanac_core::constants::APP_ROUTE_COMPONENT;

mod auth;
mod healthcheck;
mod whoami;

/// Routes reachable without an account.
#[must_use]
pub fn public_routes() -> Router {
    Router::with_path(APP_ROUTE_COMPONENT)
        .push(healthcheck::routes())
        .push(auth::routes())
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(APP_ROUTE_COMPONENT).push(whoami::routes())
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod auth_tests;
