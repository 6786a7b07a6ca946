use salvo::prelude::Json;
use salvo::{Depot, Request, Router, handler};

use almanac_engine::LayoutOptions;
use almanac_service::calendar::{month_agenda, week_agenda};

use super::view::AgendaView;
use crate::app::api::extract::{date_or_today, owner_id, week_start};
use crate::config::get_config_from_depot;
use crate::error::AppResult;
use crate::store_handler::get_store_from_depot;

/// ## Summary
/// GET /calendar/agenda/month?date&week_start
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn month(req: &mut Request, depot: &mut Depot) -> AppResult<Json<AgendaView>> {
    let owner = owner_id(depot)?;
    let settings = get_config_from_depot(depot)?;
    let store = get_store_from_depot(depot)?;

    let reference = date_or_today(req, "date", &settings)?;
    let agenda = month_agenda(&*store, owner, reference, week_start(req, &settings)?)?;
    Ok(Json(AgendaView::new(agenda, &settings.categories)))
}

/// ## Summary
/// GET /calendar/agenda/week?date&week_start - the week with per-day layout.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn week(req: &mut Request, depot: &mut Depot) -> AppResult<Json<AgendaView>> {
    let owner = owner_id(depot)?;
    let settings = get_config_from_depot(depot)?;
    let store = get_store_from_depot(depot)?;

    let reference = date_or_today(req, "date", &settings)?;
    let options = LayoutOptions::new(
        settings.calendar.pixels_per_hour,
        settings.calendar.min_event_height,
    )?;
    let agenda = week_agenda(&*store, owner, reference, week_start(req, &settings)?, &options)?;
    Ok(Json(AgendaView::new(agenda, &settings.categories)))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("agenda")
        .push(Router::with_path("month").get(month))
        .push(Router::with_path("week").get(week))
}
