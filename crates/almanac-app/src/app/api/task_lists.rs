use salvo::http::StatusCode;
use salvo::prelude::Json;
use salvo::{Depot, Request, Response, Router, handler};

use almanac_core::constants::TASK_LISTS_ROUTE_COMPONENT;
use almanac_service::calendar::tasks::{
    create_task_list, delete_task_list, list_task_lists, update_task_list,
};
use almanac_service::model::task::{NewTaskList, TaskList, TaskListPatch};

use super::extract::{id_param, json_body, owner_id};
use crate::error::AppResult;
use crate::store_handler::get_store_from_depot;

#[handler]
#[tracing::instrument(skip_all)]
async fn list(depot: &mut Depot) -> AppResult<Json<Vec<TaskList>>> {
    let owner = owner_id(depot)?;
    let store = get_store_from_depot(depot)?;
    Ok(Json(list_task_lists(&*store, owner)?))
}

/// ## Errors
/// Returns HTTP 409 when the owner already has a list with this name.
#[handler]
#[tracing::instrument(skip_all)]
async fn create(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<TaskList>> {
    let owner = owner_id(depot)?;
    let store = get_store_from_depot(depot)?;
    let input: NewTaskList = json_body(req).await?;

    let created = create_task_list(&*store, owner, input)?;
    res.status_code(StatusCode::CREATED);
    Ok(Json(created))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn update(req: &mut Request, depot: &mut Depot) -> AppResult<Json<TaskList>> {
    let owner = owner_id(depot)?;
    let store = get_store_from_depot(depot)?;
    let id = id_param(req)?;
    let patch: TaskListPatch = json_body(req).await?;

    Ok(Json(update_task_list(&*store, owner, id, patch)?))
}

/// ## Errors
/// Returns HTTP 409 for the default list.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn remove(req: &mut Request, depot: &mut Depot) -> AppResult<StatusCode> {
    let owner = owner_id(depot)?;
    let store = get_store_from_depot(depot)?;
    delete_task_list(&*store, owner, id_param(req)?)?;
    Ok(StatusCode::NO_CONTENT)
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(TASK_LISTS_ROUTE_COMPONENT)
        .get(list)
        .post(create)
        .push(Router::with_path("{id}").put(update).delete(remove))
}
