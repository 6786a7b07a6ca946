use std::collections::BTreeMap;

use salvo::prelude::Json;
use salvo::{Depot, Request, Router, handler};
use serde::Deserialize;

use almanac_engine::{EventBox, LayoutOptions, TimedEntry, layout_timed_events};

use crate::app::api::extract::json_body;
use crate::config::get_config_from_depot;
use crate::error::AppResult;

#[derive(Debug, Deserialize)]
struct LayoutRequest {
    #[serde(default)]
    pixels_per_hour: Option<f64>,
    #[serde(default)]
    min_height: Option<f64>,
    entries: Vec<TimedEntry>,
}

/// ## Summary
/// POST /calendar/layout - boxes for arbitrary timed entries. Scale values
/// fall back to the configured ones.
///
/// ## Errors
/// Returns HTTP 400 for a non-positive scale or a malformed entry.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn layout(req: &mut Request, depot: &mut Depot) -> AppResult<Json<BTreeMap<String, EventBox>>> {
    let settings = get_config_from_depot(depot)?;
    let body: LayoutRequest = json_body(req).await?;

    let options = LayoutOptions::new(
        body.pixels_per_hour.unwrap_or(settings.calendar.pixels_per_hour),
        body.min_height.unwrap_or(settings.calendar.min_event_height),
    )?;
    tracing::debug!(entries = body.entries.len(), "Laying out timed entries");
    Ok(Json(layout_timed_events(&body.entries, &options)))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("layout").post(layout)
}
