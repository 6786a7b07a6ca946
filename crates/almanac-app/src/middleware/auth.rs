use salvo::Depot;
use salvo::writing::Scribe;
use tracing::error;

use almanac_core::config::AuthMethod;
use almanac_service::auth::{authenticate, depot::depot_keys};
use almanac_service::error::ServiceError;

use crate::config::get_config_from_depot;
use crate::error::AppError;
use crate::store_handler::get_store_from_depot;

/// ## Summary
/// Authenticates the request and stores the account in the depot.
///
/// ## Side Effects
/// Inserts the authenticated account under
/// [`depot_keys::AUTHENTICATED_ACCOUNT`] for downstream handlers.
///
/// ## Errors
/// Responds 401 when the request carries no acceptable identity, 500 when the
/// config or store is missing.
#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Authenticating request");

        let config = match get_config_from_depot(depot) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(error = ?e, "Failed to get config from depot");
                e.render(res);
                ctrl.skip_rest();
                return;
            }
        };

        let store = match get_store_from_depot(depot) {
            Ok(store) => store,
            Err(e) => {
                error!(error = ?e, "Failed to get store from depot");
                e.render(res);
                ctrl.skip_rest();
                return;
            }
        };

        match authenticate(req, store, &config).await {
            Ok(account) => {
                tracing::debug!(account_email = %account.email, "Account authenticated");
                depot.insert(depot_keys::AUTHENTICATED_ACCOUNT, account);
            }
            Err(ServiceError::NotAuthenticated) => {
                tracing::debug!("Request not authenticated");
                if matches!(config.auth.method, AuthMethod::BasicAuth) {
                    if let Err(e) =
                        res.add_header("WWW-Authenticate", r#"Basic realm="almanac""#, true)
                    {
                        tracing::warn!(error = %e, "Failed to set WWW-Authenticate header");
                    }
                }
                AppError::from(ServiceError::NotAuthenticated).render(res);
                ctrl.skip_rest();
            }
            Err(service_err) => {
                error!(error = ?service_err, "Authentication failed with error");
                AppError::from(service_err).render(res);
                ctrl.skip_rest();
            }
        }
    }
}

/// ## Summary
/// Middleware handler for authentication.
/// Use this as a hoop on routes that need an account.
pub struct AuthMiddleware;
