use std::cmp::Reverse;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::model::task::{
    DEFAULT_TASK_LISTS, NewTask, NewTaskList, Task, TaskFilter, TaskList, TaskListPatch, TaskPatch,
};
use crate::store::TaskStore;

/// ## Summary
/// Returns the owner's task lists, seeding the defaults the first time.
///
/// ## Errors
/// Storage errors only.
pub fn ensure_default_lists<S: TaskStore + ?Sized>(
    store: &S,
    owner: Uuid,
) -> ServiceResult<Vec<TaskList>> {
    let existing = store.task_lists(owner)?;
    if !existing.is_empty() {
        return Ok(existing);
    }

    let now = Utc::now();
    let seeded: Vec<TaskList> = DEFAULT_TASK_LISTS
        .iter()
        .map(|&(name, color, is_default)| TaskList {
            id: Uuid::now_v7(),
            owner_id: owner,
            name: name.to_string(),
            color: color.to_string(),
            is_default,
            created_at: now,
        })
        .collect();
    for list in &seeded {
        store.insert_task_list(list.clone())?;
    }

    tracing::debug!(%owner, "Seeded default task lists");
    Ok(seeded)
}

/// ## Summary
/// The owner's lists, default list first, then by creation.
///
/// ## Errors
/// Storage errors only.
pub fn list_task_lists<S: TaskStore + ?Sized>(
    store: &S,
    owner: Uuid,
) -> ServiceResult<Vec<TaskList>> {
    let mut lists = ensure_default_lists(store, owner)?;
    lists.sort_by_key(|list| (!list.is_default, list.created_at, list.id));
    Ok(lists)
}

fn find_list<S: TaskStore + ?Sized>(store: &S, owner: Uuid, name: &str) -> ServiceResult<TaskList> {
    ensure_default_lists(store, owner)?
        .into_iter()
        .find(|list| list.name == name)
        .ok_or_else(|| ServiceError::ValidationError(format!("unknown task list '{name}'")))
}

fn default_list<S: TaskStore + ?Sized>(store: &S, owner: Uuid) -> ServiceResult<TaskList> {
    ensure_default_lists(store, owner)?
        .into_iter()
        .find(|list| list.is_default)
        .ok_or(ServiceError::InvariantViolation("owner has no default task list"))
}

fn require_title(title: &str) -> ServiceResult<()> {
    if title.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "title must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// ## Summary
/// Stores a new task in the named list, or the default list when none is given.
///
/// ## Errors
/// `ValidationError` for an empty title or an unknown list.
#[tracing::instrument(skip(store, input), fields(title = %input.title))]
pub fn create_task<S: TaskStore + ?Sized>(
    store: &S,
    owner: Uuid,
    input: NewTask,
) -> ServiceResult<Task> {
    require_title(&input.title)?;
    let list = match input.list.as_deref() {
        Some(name) => find_list(store, owner, name)?,
        None => default_list(store, owner)?,
    };

    let task = input.into_task(owner, list.name);
    store.insert_task(task.clone())?;

    tracing::info!(task_id = %task.id, list = %task.list, "Task created");
    Ok(task)
}

/// ## Errors
/// `NotFound` unless the owner has this task.
pub fn get_task<S: TaskStore + ?Sized>(store: &S, owner: Uuid, id: Uuid) -> ServiceResult<Task> {
    store.get_task(owner, id)
}

/// ## Summary
/// Tasks matching `filter`: pending before completed, then by due date (undated
/// last), higher priority first, then oldest first.
///
/// ## Errors
/// Storage errors only.
pub fn list_tasks<S: TaskStore + ?Sized>(
    store: &S,
    owner: Uuid,
    filter: &TaskFilter,
) -> ServiceResult<Vec<Task>> {
    let mut tasks: Vec<Task> = store
        .list_tasks(owner)?
        .into_iter()
        .filter(|task| filter.matches(task))
        .collect();
    sort_tasks(&mut tasks);
    Ok(tasks)
}

pub(crate) fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| {
        (
            task.completed,
            task.due_date.is_none(),
            task.due_date,
            task.due_time,
            Reverse(task.priority),
            task.created_at,
        )
    });
}

/// ## Errors
/// Storage errors only.
pub fn tasks_due_on<S: TaskStore + ?Sized>(
    store: &S,
    owner: Uuid,
    date: NaiveDate,
) -> ServiceResult<Vec<Task>> {
    let mut tasks: Vec<Task> = store
        .list_tasks(owner)?
        .into_iter()
        .filter(|task| task.is_due_on(date))
        .collect();
    sort_tasks(&mut tasks);
    Ok(tasks)
}

/// Tasks due in the inclusive range, optionally only the pending ones.
///
/// ## Errors
/// Storage errors only.
pub fn tasks_due_between<S: TaskStore + ?Sized>(
    store: &S,
    owner: Uuid,
    from: NaiveDate,
    to: NaiveDate,
    pending_only: bool,
) -> ServiceResult<Vec<Task>> {
    let mut tasks: Vec<Task> = store
        .list_tasks(owner)?
        .into_iter()
        .filter(|task| !(pending_only && task.completed))
        .filter(|task| task.due_date.is_some_and(|due| from <= due && due <= to))
        .collect();
    sort_tasks(&mut tasks);
    Ok(tasks)
}

/// ## Errors
/// `NotFound`, or `ValidationError` for an empty title or unknown list.
#[tracing::instrument(skip(store, patch))]
pub fn update_task<S: TaskStore + ?Sized>(
    store: &S,
    owner: Uuid,
    id: Uuid,
    patch: TaskPatch,
) -> ServiceResult<Task> {
    let mut task = store.get_task(owner, id)?;
    if let Some(title) = &patch.title {
        require_title(title)?;
    }
    if let Some(list) = &patch.list {
        find_list(store, owner, list)?;
    }

    patch.apply(&mut task, Utc::now());
    store.replace_task(task.clone())?;

    tracing::info!(task_id = %id, "Task updated");
    Ok(task)
}

/// ## Errors
/// `NotFound` unless the owner has this task.
#[tracing::instrument(skip(store))]
pub fn toggle_task<S: TaskStore + ?Sized>(store: &S, owner: Uuid, id: Uuid) -> ServiceResult<Task> {
    let mut task = store.get_task(owner, id)?;
    task.toggle(Utc::now());
    store.replace_task(task.clone())?;

    tracing::info!(task_id = %id, completed = task.completed, "Task toggled");
    Ok(task)
}

/// ## Errors
/// `NotFound` unless the owner has this task.
#[tracing::instrument(skip(store))]
pub fn delete_task<S: TaskStore + ?Sized>(store: &S, owner: Uuid, id: Uuid) -> ServiceResult<()> {
    store.delete_task(owner, id)?;
    tracing::info!(task_id = %id, "Task deleted");
    Ok(())
}

/// ## Errors
/// `ValidationError` for an empty name, `Conflict` for a duplicate one.
#[tracing::instrument(skip(store, input), fields(name = %input.name))]
pub fn create_task_list<S: TaskStore + ?Sized>(
    store: &S,
    owner: Uuid,
    input: NewTaskList,
) -> ServiceResult<TaskList> {
    require_title(&input.name)?;
    ensure_default_lists(store, owner)?;

    let list = input.into_list(owner);
    store.insert_task_list(list.clone())?;

    tracing::info!(list_id = %list.id, "Task list created");
    Ok(list)
}

/// ## Summary
/// Renames and/or recolours a list. Renaming moves the list's tasks along.
///
/// ## Errors
/// `NotFound`, `ValidationError` for an empty name, `Conflict` for a taken one.
#[tracing::instrument(skip(store, patch))]
pub fn update_task_list<S: TaskStore + ?Sized>(
    store: &S,
    owner: Uuid,
    id: Uuid,
    patch: TaskListPatch,
) -> ServiceResult<TaskList> {
    let mut list = ensure_default_lists(store, owner)?
        .into_iter()
        .find(|list| list.id == id)
        .ok_or_else(|| ServiceError::NotFound(format!("task list {id}")))?;
    let old_name = list.name.clone();

    if let Some(name) = patch.name {
        require_title(&name)?;
        list.name = name.trim().to_string();
    }
    if let Some(color) = patch.color {
        list.color = color;
    }
    store.replace_task_list(list.clone())?;

    if list.name != old_name {
        let moved = store.reassign_tasks(owner, &old_name, &list.name)?;
        tracing::info!(list_id = %id, moved, "Task list renamed");
    }
    Ok(list)
}

/// ## Summary
/// Deletes a list together with its tasks.
///
/// ## Errors
/// `NotFound`, or `Conflict` for the default list.
#[tracing::instrument(skip(store))]
pub fn delete_task_list<S: TaskStore + ?Sized>(store: &S, owner: Uuid, id: Uuid) -> ServiceResult<()> {
    let list = ensure_default_lists(store, owner)?
        .into_iter()
        .find(|list| list.id == id)
        .ok_or_else(|| ServiceError::NotFound(format!("task list {id}")))?;
    if list.is_default {
        return Err(ServiceError::Conflict(
            "the default task list cannot be deleted".to_string(),
        ));
    }

    let removed = store.delete_tasks_in_list(owner, &list.name)?;
    store.delete_task_list(owner, id)?;

    tracing::info!(list_id = %id, removed, "Task list deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Priority, TaskStatus};
    use crate::store::InMemoryStore;

    fn new_task(json: &str) -> NewTask {
        serde_json::from_str(json).expect("new task")
    }

    #[test]
    fn test_default_lists_are_seeded_once() {
        let store = InMemoryStore::new();
        let owner = Uuid::now_v7();

        let lists = list_task_lists(&store, owner).expect("lists");
        let names: Vec<_> = lists.iter().map(|list| list.name.as_str()).collect();
        assert_eq!(names, ["My Tasks", "Work", "Personal"]);
        assert!(lists[0].is_default);

        assert_eq!(list_task_lists(&store, owner).expect("lists").len(), 3);
    }

    #[test]
    fn test_create_task_defaults_and_unknown_list() {
        let store = InMemoryStore::new();
        let owner = Uuid::now_v7();

        let task = create_task(&store, owner, new_task(r#"{"title": "Milk"}"#)).expect("task");
        assert_eq!(task.list, "My Tasks");
        assert_eq!(task.priority, Priority::Medium);

        assert!(matches!(
            create_task(&store, owner, new_task(r#"{"title": "X", "list": "Nope"}"#)),
            Err(ServiceError::ValidationError(_))
        ));
        assert!(matches!(
            create_task(&store, owner, new_task(r#"{"title": ""}"#)),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn test_list_tasks_filters_and_orders() {
        let store = InMemoryStore::new();
        let owner = Uuid::now_v7();

        let undated = create_task(&store, owner, new_task(r#"{"title": "Someday"}"#)).expect("task");
        let later = create_task(
            &store,
            owner,
            new_task(r#"{"title": "Later", "due_date": "2024-12-20", "list": "Work"}"#),
        )
        .expect("task");
        let urgent = create_task(
            &store,
            owner,
            new_task(r#"{"title": "Urgent", "due_date": "2024-12-16", "priority": "high"}"#),
        )
        .expect("task");
        let done = create_task(
            &store,
            owner,
            new_task(r#"{"title": "Done", "due_date": "2024-12-01", "completed": true}"#),
        )
        .expect("task");

        let ids: Vec<_> = list_tasks(&store, owner, &TaskFilter::default())
            .expect("tasks")
            .into_iter()
            .map(|task| task.id)
            .collect();
        assert_eq!(ids, [urgent.id, later.id, undated.id, done.id]);

        let work = TaskFilter {
            list: Some("Work".to_string()),
            status: None,
        };
        assert_eq!(list_tasks(&store, owner, &work).expect("tasks").len(), 1);

        let completed = TaskFilter {
            list: None,
            status: Some(TaskStatus::Completed),
        };
        assert_eq!(
            list_tasks(&store, owner, &completed).expect("tasks")[0].id,
            done.id
        );

        let due = tasks_due_on(&store, owner, NaiveDate::from_ymd_opt(2024, 12, 16).expect("date"))
            .expect("due");
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, urgent.id);
    }

    #[test]
    fn test_toggle_task() {
        let store = InMemoryStore::new();
        let owner = Uuid::now_v7();
        let task = create_task(&store, owner, new_task(r#"{"title": "Call"}"#)).expect("task");

        let toggled = toggle_task(&store, owner, task.id).expect("toggle");
        assert!(toggled.completed);
        assert!(toggled.completed_at.is_some());
        assert!(get_task(&store, owner, task.id).expect("get").completed);

        let toggled = toggle_task(&store, owner, task.id).expect("toggle");
        assert!(!toggled.completed);
        assert!(toggled.completed_at.is_none());
    }

    #[test_log::test]
    fn test_rename_list_moves_tasks() {
        let store = InMemoryStore::new();
        let owner = Uuid::now_v7();
        let task =
            create_task(&store, owner, new_task(r#"{"title": "Report", "list": "Work"}"#)).expect("task");
        let work = find_list(&store, owner, "Work").expect("work");

        let renamed = update_task_list(
            &store,
            owner,
            work.id,
            TaskListPatch {
                name: Some("Office".to_string()),
                color: None,
            },
        )
        .expect("rename");
        assert_eq!(renamed.name, "Office");
        assert_eq!(get_task(&store, owner, task.id).expect("task").list, "Office");

        assert!(matches!(
            update_task_list(
                &store,
                owner,
                work.id,
                TaskListPatch {
                    name: Some("personal".to_string()),
                    color: None,
                },
            ),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn test_delete_list_rules() {
        let store = InMemoryStore::new();
        let owner = Uuid::now_v7();
        create_task(&store, owner, new_task(r#"{"title": "Gym", "list": "Personal"}"#)).expect("task");
        create_task(&store, owner, new_task(r#"{"title": "Milk"}"#)).expect("task");

        let lists = list_task_lists(&store, owner).expect("lists");
        let default = lists.iter().find(|list| list.is_default).expect("default");
        let personal = lists.iter().find(|list| list.name == "Personal").expect("personal");

        assert!(matches!(
            delete_task_list(&store, owner, default.id),
            Err(ServiceError::Conflict(_))
        ));

        delete_task_list(&store, owner, personal.id).expect("delete");
        let remaining = list_tasks(&store, owner, &TaskFilter::default()).expect("tasks");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Milk");
        assert_eq!(list_task_lists(&store, owner).expect("lists").len(), 2);
    }
}
