mod app_specific;
mod calendar;
mod events;
pub(crate) mod extract;
mod task_lists;
mod tasks;

#[cfg(test)]
pub(crate) mod test_support;

use salvo::Router;

use crate::middleware::auth::AuthMiddleware;

// Re-export route constants from core
pub use almanac_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, APP_ROUTE_PREFIX, CALENDAR_ROUTE_PREFIX,
    EVENTS_ROUTE_PREFIX, TASK_LISTS_ROUTE_PREFIX, TASKS_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the API router. Health and account creation are public;
/// everything else sits behind [`AuthMiddleware`].
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(app_specific::public_routes())
        .push(
            Router::new()
                .hoop(AuthMiddleware)
                .push(app_specific::routes())
                .push(calendar::routes())
                .push(events::routes())
                .push(tasks::routes())
                .push(task_lists::routes()),
        )
}
