use salvo::prelude::Json;
use salvo::{Depot, Request, Router, handler};

use almanac_service::calendar::occurrences_in_range;

use super::view::{OccurrenceView, OccurrencesResponse};
use crate::app::api::extract::{date_or_today, optional_date, owner_id};
use crate::config::get_config_from_depot;
use crate::error::AppResult;
use crate::store_handler::get_store_from_depot;

/// ## Summary
/// GET /calendar/occurrences?from&to - every occurrence overlapping the
/// inclusive range. `from` defaults to today, `to` to `from`.
///
/// ## Errors
/// Returns HTTP 400 when `from` is after `to`.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn occurrences(req: &mut Request, depot: &mut Depot) -> AppResult<Json<OccurrencesResponse>> {
    let owner = owner_id(depot)?;
    let settings = get_config_from_depot(depot)?;
    let store = get_store_from_depot(depot)?;

    let from = date_or_today(req, "from", &settings)?;
    let to = optional_date(req, "to")?.unwrap_or(from);
    let query = occurrences_in_range(&*store, owner, from, to)?;

    Ok(Json(OccurrencesResponse {
        from,
        to,
        occurrences: OccurrenceView::all(query.occurrences, &settings.categories),
        skipped: query.skipped,
    }))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("occurrences").get(occurrences)
}
