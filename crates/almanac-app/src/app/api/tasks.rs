use salvo::http::StatusCode;
use salvo::prelude::Json;
use salvo::{Depot, Request, Response, Router, handler};

use almanac_core::constants::TASKS_ROUTE_COMPONENT;
use almanac_service::calendar::tasks::{
    create_task, delete_task, get_task, list_tasks, tasks_due_on, toggle_task, update_task,
};
use almanac_service::model::task::{NewTask, Task, TaskFilter, TaskPatch, TaskStatus};

use super::extract::{id_param, json_body, optional_date, optional_string, owner_id};
use crate::error::{AppError, AppResult};
use crate::store_handler::get_store_from_depot;

/// ## Summary
/// GET /tasks?list&status&due - `due` selects the tasks due on one date and
/// takes precedence over the other filters.
///
/// ## Errors
/// Returns HTTP 400 for an unknown status or malformed date.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn list(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<Task>>> {
    let owner = owner_id(depot)?;
    let store = get_store_from_depot(depot)?;

    if let Some(due) = optional_date(req, "due")? {
        return Ok(Json(tasks_due_on(&*store, owner, due)?));
    }

    let status = optional_string(req, "status")
        .map(|raw| raw.parse::<TaskStatus>())
        .transpose()
        .map_err(AppError::BadRequest)?;
    let filter = TaskFilter {
        list: optional_string(req, "list"),
        status,
    };
    Ok(Json(list_tasks(&*store, owner, &filter)?))
}

#[handler]
#[tracing::instrument(skip_all)]
async fn create(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<Json<Task>> {
    let owner = owner_id(depot)?;
    let store = get_store_from_depot(depot)?;
    let input: NewTask = json_body(req).await?;

    let task = create_task(&*store, owner, input)?;
    res.status_code(StatusCode::CREATED);
    Ok(Json(task))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn show(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Task>> {
    let owner = owner_id(depot)?;
    let store = get_store_from_depot(depot)?;
    Ok(Json(get_task(&*store, owner, id_param(req)?)?))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn update(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Task>> {
    let owner = owner_id(depot)?;
    let store = get_store_from_depot(depot)?;
    let id = id_param(req)?;
    let patch: TaskPatch = json_body(req).await?;

    Ok(Json(update_task(&*store, owner, id, patch)?))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn toggle(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Task>> {
    let owner = owner_id(depot)?;
    let store = get_store_from_depot(depot)?;
    Ok(Json(toggle_task(&*store, owner, id_param(req)?)?))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn remove(req: &mut Request, depot: &mut Depot) -> AppResult<StatusCode> {
    let owner = owner_id(depot)?;
    let store = get_store_from_depot(depot)?;
    delete_task(&*store, owner, id_param(req)?)?;
    Ok(StatusCode::NO_CONTENT)
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(TASKS_ROUTE_COMPONENT)
        .get(list)
        .post(create)
        .push(
            Router::with_path("{id}")
                .get(show)
                .put(update)
                .delete(remove)
                .push(Router::with_path("toggle").post(toggle)),
        )
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
