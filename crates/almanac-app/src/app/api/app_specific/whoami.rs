use salvo::prelude::Json;
use salvo::{Depot, Router, handler};

use almanac_service::auth::get_account_from_depot;
use almanac_service::model::account::AccountView;

use crate::error::AppResult;

/// ## Summary
/// Returns the authenticated account as JSON.
/// The account is retrieved from the depot set by the `AuthMiddleware`.
#[handler]
async fn whoami(depot: &Depot) -> AppResult<Json<AccountView>> {
    let account = get_account_from_depot(depot)?;
    Ok(Json(AccountView::from(account)))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("whoami").get(whoami)
}
