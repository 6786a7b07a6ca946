use salvo::async_trait;
use std::sync::Arc;

use crate::error::AppResult;
use almanac_core::error::CoreError;
use almanac_service::store::CalendarStore;

/// Makes the shared store available to every handler below it.
pub struct StoreHandler {
    pub store: Arc<dyn CalendarStore>,
}

impl StoreHandler {
    #[must_use]
    pub fn new(store: impl CalendarStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

#[async_trait]
impl salvo::Handler for StoreHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.store));
    }
}

/// ## Summary
/// Retrieves the store from the depot.
///
/// ## Errors
/// Returns an error if the store is not found in the depot.
pub fn get_store_from_depot(depot: &salvo::Depot) -> AppResult<Arc<dyn CalendarStore>> {
    depot
        .obtain::<Arc<dyn CalendarStore>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Store not found in depot").into())
}
