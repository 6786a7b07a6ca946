//! The repository interface the query path reads through, plus the
//! in-memory implementation the server runs on.
//!
//! Every method is scoped to an owner; a record owned by someone else is
//! reported as `NotFound`.

mod memory;

use chrono::{Days, NaiveDate};
use uuid::Uuid;

use almanac_engine::BaseEvent;

use crate::error::ServiceResult;
use crate::model::account::Account;
use crate::model::event::StoredEvent;
use crate::model::task::{Task, TaskList};

pub use memory::InMemoryStore;

pub trait EventStore: Send + Sync {
    /// ## Errors
    /// `Conflict` if the id is taken; `Storage` if persisting fails.
    fn insert_event(&self, event: StoredEvent) -> ServiceResult<()>;

    /// ## Errors
    /// `NotFound` unless `owner` has an event with this id.
    fn get_event(&self, owner: Uuid, id: Uuid) -> ServiceResult<StoredEvent>;

    /// ## Errors
    /// `NotFound` unless the event already exists for its owner.
    fn replace_event(&self, event: StoredEvent) -> ServiceResult<()>;

    /// ## Errors
    /// `NotFound` unless `owner` has an event with this id.
    fn delete_event(&self, owner: Uuid, id: Uuid) -> ServiceResult<()>;

    /// ## Errors
    /// `Storage` if the backing store cannot be read.
    fn list_events(&self, owner: Uuid) -> ServiceResult<Vec<StoredEvent>>;

    /// ## Summary
    /// Events that can contribute an occurrence to `[from, to]`: one-off
    /// events overlapping the range, and series that start before it ends and
    /// are not over before it begins.
    ///
    /// ## Errors
    /// Propagates errors from [`EventStore::list_events`].
    fn events_in_range(
        &self,
        owner: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ServiceResult<Vec<StoredEvent>> {
        Ok(self
            .list_events(owner)?
            .into_iter()
            .filter(|stored| may_reach(&stored.event, from, to))
            .collect())
    }
}

fn may_reach(event: &BaseEvent, from: NaiveDate, to: NaiveDate) -> bool {
    if event.start_date > to {
        return false;
    }
    match &event.recurrence {
        None => event.end_date >= from,
        Some(rule) => rule.until.is_none_or(|until| {
            // The last instance may start on `until` and still span into the range.
            until
                .checked_add_days(Days::new(event.span_days()))
                .is_none_or(|last_end| last_end >= from)
        }),
    }
}

pub trait TaskStore: Send + Sync {
    /// ## Errors
    /// `Conflict` if the id is taken.
    fn insert_task(&self, task: Task) -> ServiceResult<()>;

    /// ## Errors
    /// `NotFound` unless `owner` has a task with this id.
    fn get_task(&self, owner: Uuid, id: Uuid) -> ServiceResult<Task>;

    /// ## Errors
    /// `NotFound` unless the task already exists for its owner.
    fn replace_task(&self, task: Task) -> ServiceResult<()>;

    /// ## Errors
    /// `NotFound` unless `owner` has a task with this id.
    fn delete_task(&self, owner: Uuid, id: Uuid) -> ServiceResult<()>;

    /// ## Errors
    /// `Storage` if the backing store cannot be read.
    fn list_tasks(&self, owner: Uuid) -> ServiceResult<Vec<Task>>;

    /// Moves every task in list `from` to list `to`; returns how many moved.
    ///
    /// ## Errors
    /// `Storage` if persisting fails.
    fn reassign_tasks(&self, owner: Uuid, from: &str, to: &str) -> ServiceResult<usize>;

    /// Removes every task in `list`; returns how many were removed.
    ///
    /// ## Errors
    /// `Storage` if persisting fails.
    fn delete_tasks_in_list(&self, owner: Uuid, list: &str) -> ServiceResult<usize>;

    /// ## Errors
    /// `Storage` if the backing store cannot be read.
    fn task_lists(&self, owner: Uuid) -> ServiceResult<Vec<TaskList>>;

    /// ## Errors
    /// `Conflict` if the owner already has a list with this name.
    fn insert_task_list(&self, list: TaskList) -> ServiceResult<()>;

    /// ## Errors
    /// `NotFound` unless the list exists; `Conflict` on a name clash.
    fn replace_task_list(&self, list: TaskList) -> ServiceResult<()>;

    /// ## Errors
    /// `NotFound` unless `owner` has a list with this id.
    fn delete_task_list(&self, owner: Uuid, id: Uuid) -> ServiceResult<()>;
}

pub trait AccountStore: Send + Sync {
    /// ## Errors
    /// `Conflict` if an account already uses the email.
    fn insert_account(&self, account: Account) -> ServiceResult<()>;

    /// ## Errors
    /// `Storage` if the backing store cannot be read.
    fn account_by_email(&self, email: &str) -> ServiceResult<Option<Account>>;

    /// ## Errors
    /// `NotFound` if there is no such account.
    fn account_by_id(&self, id: Uuid) -> ServiceResult<Account>;
}

/// Everything the application needs from persistence.
pub trait CalendarStore: EventStore + TaskStore + AccountStore {}

impl<T: EventStore + TaskStore + AccountStore> CalendarStore for T {}
