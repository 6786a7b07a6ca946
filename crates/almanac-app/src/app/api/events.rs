use salvo::http::StatusCode;
use salvo::prelude::Json;
use salvo::{Depot, Request, Response, Router, handler};

use almanac_core::constants::EVENTS_ROUTE_COMPONENT;
use almanac_service::calendar::events::{
    create_event, delete_event, get_event, list_events, update_event,
};
use almanac_service::model::event::{EventPatch, NewEvent, StoredEvent};

use super::extract::{id_param, json_body, owner_id};
use crate::error::AppResult;
use crate::store_handler::get_store_from_depot;

#[handler]
#[tracing::instrument(skip_all)]
async fn list(depot: &mut Depot) -> AppResult<Json<Vec<StoredEvent>>> {
    let owner = owner_id(depot)?;
    let store = get_store_from_depot(depot)?;
    Ok(Json(list_events(&*store, owner)?))
}

/// ## Summary
/// POST /events - `end_date` defaults to `start_date`.
///
/// ## Errors
/// Returns HTTP 400 for an empty title, reversed dates or a malformed rule.
#[handler]
#[tracing::instrument(skip_all)]
async fn create(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<StoredEvent>> {
    let owner = owner_id(depot)?;
    let store = get_store_from_depot(depot)?;
    let input: NewEvent = json_body(req).await?;

    let stored = create_event(&*store, owner, input)?;
    res.status_code(StatusCode::CREATED);
    Ok(Json(stored))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn show(req: &mut Request, depot: &mut Depot) -> AppResult<Json<StoredEvent>> {
    let owner = owner_id(depot)?;
    let store = get_store_from_depot(depot)?;
    Ok(Json(get_event(&*store, owner, id_param(req)?)?))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn update(req: &mut Request, depot: &mut Depot) -> AppResult<Json<StoredEvent>> {
    let owner = owner_id(depot)?;
    let store = get_store_from_depot(depot)?;
    let id = id_param(req)?;
    let patch: EventPatch = json_body(req).await?;

    Ok(Json(update_event(&*store, owner, id, patch)?))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn remove(req: &mut Request, depot: &mut Depot) -> AppResult<StatusCode> {
    let owner = owner_id(depot)?;
    let store = get_store_from_depot(depot)?;
    delete_event(&*store, owner, id_param(req)?)?;
    Ok(StatusCode::NO_CONTENT)
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(EVENTS_ROUTE_COMPONENT)
        .get(list)
        .post(create)
        .push(
            Router::with_path("{id}")
                .get(show)
                .put(update)
                .delete(remove),
        )
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
