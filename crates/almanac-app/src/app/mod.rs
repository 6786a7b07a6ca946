pub mod api;

use salvo::Router;

use almanac_core::config::Settings;
use almanac_service::store::CalendarStore;

use crate::config::ConfigHandler;
use crate::store_handler::StoreHandler;

/// ## Summary
/// The complete service: config and store injection in front of the API routes.
#[must_use]
pub fn service_router(settings: Settings, store: impl CalendarStore + 'static) -> Router {
    Router::new()
        .hoop(ConfigHandler::new(settings))
        .hoop(StoreHandler::new(store))
        .push(api::routes())
}
