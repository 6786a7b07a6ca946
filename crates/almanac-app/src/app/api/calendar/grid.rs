use chrono::NaiveDate;
use salvo::prelude::Json;
use salvo::{Depot, Request, Router, handler};
use serde::Serialize;

use almanac_core::types::WeekStart;
use almanac_engine::date::{day_hour_labels, week_number};
use almanac_engine::grid::rows;
use almanac_engine::{GridCell, build_month_grid, build_week_grid};

use crate::app::api::extract::{date_or_today, week_start};
use crate::config::get_config_from_depot;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
pub struct GridResponse {
    pub reference: NaiveDate,
    pub week_start: WeekStart,
    pub cells: Vec<GridCell>,
    pub week_numbers: Vec<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hour_labels: Vec<String>,
}

impl GridResponse {
    fn new(reference: NaiveDate, week_start: WeekStart, cells: Vec<GridCell>) -> Self {
        Self {
            reference,
            week_start,
            week_numbers: rows(&cells).map(|row| week_number(row[0].date)).collect(),
            cells,
            hour_labels: Vec::new(),
        }
    }
}

/// ## Summary
/// GET /calendar/grid/month?date&week_start
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn month_grid(req: &mut Request, depot: &mut Depot) -> AppResult<Json<GridResponse>> {
    let settings = get_config_from_depot(depot)?;
    let reference = date_or_today(req, "date", &settings)?;
    let week_start = week_start(req, &settings)?;

    let cells = build_month_grid(reference, week_start);
    Ok(Json(GridResponse::new(reference, week_start, cells)))
}

/// ## Summary
/// GET /calendar/grid/week?date&week_start
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn week_grid(req: &mut Request, depot: &mut Depot) -> AppResult<Json<GridResponse>> {
    let settings = get_config_from_depot(depot)?;
    let reference = date_or_today(req, "date", &settings)?;
    let week_start = week_start(req, &settings)?;

    let mut response = GridResponse::new(reference, week_start, build_week_grid(reference, week_start));
    response.hour_labels = day_hour_labels();
    Ok(Json(response))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("grid")
        .push(Router::with_path("month").get(month_grid))
        .push(Router::with_path("week").get(week_grid))
}
