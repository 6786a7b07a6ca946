//! Read-only calendar views: grids, layout, occurrences, agendas, digests.

use salvo::Router;

use almanac_core::constants::CALENDAR_ROUTE_COMPONENT;

mod agenda;
mod digest;
mod grid;
mod layout;
mod occurrences;
mod view;

#[must_use]
pub fn routes() -> Router {
    Router::with_path(CALENDAR_ROUTE_COMPONENT)
        .push(grid::routes())
        .push(layout::routes())
        .push(occurrences::routes())
        .push(agenda::routes())
        .push(digest::routes())
}

#[cfg(test)]
#[path = "calendar_tests.rs"]
mod tests;
