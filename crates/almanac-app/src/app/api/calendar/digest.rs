use salvo::prelude::Json;
use salvo::{Depot, Request, Router, handler};

use almanac_service::calendar::{daily_digest, weekly_digest};

use super::view::{DailyDigestView, WeeklyDigestView};
use crate::app::api::extract::{date_or_today, owner_id, week_start};
use crate::config::get_config_from_depot;
use crate::error::AppResult;
use crate::store_handler::get_store_from_depot;

/// ## Summary
/// GET /calendar/digest/daily?date - what the day after `date` holds.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn daily(req: &mut Request, depot: &mut Depot) -> AppResult<Json<DailyDigestView>> {
    let owner = owner_id(depot)?;
    let settings = get_config_from_depot(depot)?;
    let store = get_store_from_depot(depot)?;

    let today = date_or_today(req, "date", &settings)?;
    let digest = daily_digest(&*store, owner, today)?;
    Ok(Json(DailyDigestView::new(digest, &settings.categories)))
}

/// ## Summary
/// GET /calendar/digest/weekly?date&week_start
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn weekly(req: &mut Request, depot: &mut Depot) -> AppResult<Json<WeeklyDigestView>> {
    let owner = owner_id(depot)?;
    let settings = get_config_from_depot(depot)?;
    let store = get_store_from_depot(depot)?;

    let date = date_or_today(req, "date", &settings)?;
    let digest = weekly_digest(&*store, owner, date, week_start(req, &settings)?)?;
    Ok(Json(WeeklyDigestView::new(digest, &settings.categories)))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("digest")
        .push(Router::with_path("daily").get(daily))
        .push(Router::with_path("weekly").get(weekly))
}
