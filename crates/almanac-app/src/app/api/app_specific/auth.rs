use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::Serialize;

use almanac_service::auth::password::run_blocking;
use almanac_service::auth::{login, register};
use almanac_service::model::account::{AccountView, Credentials, Registration};

use crate::app::api::extract::json_body;
use crate::error::AppResult;
use crate::store_handler::get_store_from_depot;

/// ## Summary
/// Login response payload
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub account: AccountView,
    pub message: String,
}

/// ## Summary
/// POST /app/auth/register - Register a new account with email and password
///
/// ## Side Effects
/// - Creates the account with an Argon2 password hash, hashed on the blocking pool
/// - Seeds the account's default task lists
///
/// ## Errors
/// Returns HTTP 400 for invalid input, 409 if the email is already registered.
#[handler]
#[tracing::instrument(skip_all)]
async fn register_handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<AccountView>> {
    tracing::debug!("Processing account registration request");

    let registration: Registration = json_body(req).await?;
    let store = get_store_from_depot(depot)?;
    let account = run_blocking(move || register(&*store, &registration)).await?;

    tracing::info!(account_id = %account.id, "Account registered");
    res.status_code(StatusCode::CREATED);
    Ok(Json(AccountView::from(&account)))
}

/// ## Summary
/// POST /app/auth/login - Verify credentials
///
/// ## Errors
/// Returns HTTP 401 for unknown email or wrong password.
#[handler]
#[tracing::instrument(skip_all)]
async fn login_handler(req: &mut Request, depot: &mut Depot) -> AppResult<Json<LoginResponse>> {
    let credentials: Credentials = json_body(req).await?;
    let store = get_store_from_depot(depot)?;
    let account = run_blocking(move || login(&*store, &credentials)).await?;

    Ok(Json(LoginResponse {
        success: true,
        account: AccountView::from(&account),
        message: "Login successful".to_string(),
    }))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("auth")
        .push(Router::with_path("register").post(register_handler))
        .push(Router::with_path("login").post(login_handler))
}
