use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use uuid::Uuid;

use almanac_core::config::StorageConfig;

use super::{AccountStore, EventStore, TaskStore};
use crate::error::{ServiceError, ServiceResult};
use crate::model::account::{Account, normalize_email};
use crate::model::event::StoredEvent;
use crate::model::task::{Task, TaskList};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct StoreState {
    #[serde(default)]
    accounts: BTreeMap<Uuid, Account>,
    #[serde(default)]
    events: BTreeMap<Uuid, StoredEvent>,
    #[serde(default)]
    tasks: BTreeMap<Uuid, Task>,
    #[serde(default)]
    task_lists: BTreeMap<Uuid, TaskList>,
}

impl StoreState {
    fn list_name_taken(&self, owner: Uuid, name: &str, except: Option<Uuid>) -> bool {
        self.task_lists.values().any(|list| {
            list.owner_id == owner
                && Some(list.id) != except
                && list.name.eq_ignore_ascii_case(name.trim())
        })
    }
}

/// `RwLock`-guarded maps, optionally mirrored to a JSON snapshot file that is
/// rewritten after every mutation.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryStore {
    /// A store that lives only as long as the process.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Opens a store backed by the snapshot at `path`, loading it if present.
    ///
    /// ## Errors
    /// Returns `Storage` if the file exists but cannot be read or parsed.
    #[tracing::instrument]
    pub fn with_snapshot(path: PathBuf) -> ServiceResult<Self> {
        let state = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|e| {
                ServiceError::Storage(format!("failed to read {}: {e}", path.display()))
            })?;
            let state: StoreState = serde_json::from_str(&raw).map_err(|e| {
                ServiceError::Storage(format!("failed to parse {}: {e}", path.display()))
            })?;
            tracing::info!(
                accounts = state.accounts.len(),
                events = state.events.len(),
                tasks = state.tasks.len(),
                "Loaded store snapshot"
            );
            state
        } else {
            tracing::info!("No snapshot yet; starting empty");
            StoreState::default()
        };

        Ok(Self {
            state: RwLock::new(state),
            snapshot_path: Some(path),
        })
    }

    /// ## Errors
    /// See [`InMemoryStore::with_snapshot`].
    pub fn from_config(config: &StorageConfig) -> ServiceResult<Self> {
        match &config.snapshot_path {
            Some(path) => Self::with_snapshot(path.clone()),
            None => Ok(Self::new()),
        }
    }

    /// Locks for reading and recovers from poisoning.
    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.state.clear_poison();
                poisoned.into_inner()
            }
        }
    }

    /// Locks for writing and recovers from poisoning.
    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.state.clear_poison();
                poisoned.into_inner()
            }
        }
    }

    /// Runs `change` under the write lock and persists the result.
    ///
    /// With a snapshot configured the change is applied to a copy, and the
    /// copy only replaces the live state once it has been written to disk.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut StoreState) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let mut state = self.write();
        let Some(path) = &self.snapshot_path else {
            return change(&mut *state);
        };

        let mut candidate = state.clone();
        let out = change(&mut candidate)?;
        save_snapshot(path, &candidate)?;
        *state = candidate;
        Ok(out)
    }
}

#[tracing::instrument(skip(state))]
fn save_snapshot(path: &Path, state: &StoreState) -> ServiceResult<()> {
    let storage_err = |e: &dyn std::fmt::Display| {
        ServiceError::Storage(format!("failed to write {}: {e}", path.display()))
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| storage_err(&e))?;
    serde_json::to_writer(&mut temp, state).map_err(|e| storage_err(&e))?;
    temp.flush().map_err(|e| storage_err(&e))?;
    temp.persist(path).map_err(|e| storage_err(&e))?;

    tracing::trace!("Snapshot written");
    Ok(())
}

fn not_found(kind: &str, id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("{kind} {id}"))
}

impl EventStore for InMemoryStore {
    fn insert_event(&self, event: StoredEvent) -> ServiceResult<()> {
        self.mutate(|state| {
            let id = event.event.id;
            if state.events.contains_key(&id) {
                return Err(ServiceError::Conflict(format!("event {id} already exists")));
            }
            state.events.insert(id, event);
            Ok(())
        })
    }

    fn get_event(&self, owner: Uuid, id: Uuid) -> ServiceResult<StoredEvent> {
        self.read()
            .events
            .get(&id)
            .filter(|stored| stored.owner_id == owner)
            .cloned()
            .ok_or_else(|| not_found("event", id))
    }

    fn replace_event(&self, event: StoredEvent) -> ServiceResult<()> {
        self.mutate(|state| {
            let id = event.event.id;
            let slot = state
                .events
                .get_mut(&id)
                .filter(|stored| stored.owner_id == event.owner_id)
                .ok_or_else(|| not_found("event", id))?;
            *slot = event;
            Ok(())
        })
    }

    fn delete_event(&self, owner: Uuid, id: Uuid) -> ServiceResult<()> {
        self.mutate(|state| {
            if !state.events.get(&id).is_some_and(|stored| stored.owner_id == owner) {
                return Err(not_found("event", id));
            }
            state.events.remove(&id);
            Ok(())
        })
    }

    fn list_events(&self, owner: Uuid) -> ServiceResult<Vec<StoredEvent>> {
        Ok(self
            .read()
            .events
            .values()
            .filter(|stored| stored.owner_id == owner)
            .cloned()
            .collect())
    }
}

impl TaskStore for InMemoryStore {
    fn insert_task(&self, task: Task) -> ServiceResult<()> {
        self.mutate(|state| {
            if state.tasks.contains_key(&task.id) {
                return Err(ServiceError::Conflict(format!("task {} already exists", task.id)));
            }
            state.tasks.insert(task.id, task);
            Ok(())
        })
    }

    fn get_task(&self, owner: Uuid, id: Uuid) -> ServiceResult<Task> {
        self.read()
            .tasks
            .get(&id)
            .filter(|task| task.owner_id == owner)
            .cloned()
            .ok_or_else(|| not_found("task", id))
    }

    fn replace_task(&self, task: Task) -> ServiceResult<()> {
        self.mutate(|state| {
            let slot = state
                .tasks
                .get_mut(&task.id)
                .filter(|existing| existing.owner_id == task.owner_id)
                .ok_or_else(|| not_found("task", task.id))?;
            *slot = task;
            Ok(())
        })
    }

    fn delete_task(&self, owner: Uuid, id: Uuid) -> ServiceResult<()> {
        self.mutate(|state| {
            if !state.tasks.get(&id).is_some_and(|task| task.owner_id == owner) {
                return Err(not_found("task", id));
            }
            state.tasks.remove(&id);
            Ok(())
        })
    }

    fn list_tasks(&self, owner: Uuid) -> ServiceResult<Vec<Task>> {
        Ok(self
            .read()
            .tasks
            .values()
            .filter(|task| task.owner_id == owner)
            .cloned()
            .collect())
    }

    fn reassign_tasks(&self, owner: Uuid, from: &str, to: &str) -> ServiceResult<usize> {
        self.mutate(|state| {
            let mut moved = 0;
            for task in state
                .tasks
                .values_mut()
                .filter(|task| task.owner_id == owner && task.list == from)
            {
                to.clone_into(&mut task.list);
                moved += 1;
            }
            Ok(moved)
        })
    }

    fn delete_tasks_in_list(&self, owner: Uuid, list: &str) -> ServiceResult<usize> {
        self.mutate(|state| {
            let before = state.tasks.len();
            state
                .tasks
                .retain(|_, task| !(task.owner_id == owner && task.list == list));
            Ok(before - state.tasks.len())
        })
    }

    fn task_lists(&self, owner: Uuid) -> ServiceResult<Vec<TaskList>> {
        Ok(self
            .read()
            .task_lists
            .values()
            .filter(|list| list.owner_id == owner)
            .cloned()
            .collect())
    }

    fn insert_task_list(&self, list: TaskList) -> ServiceResult<()> {
        self.mutate(|state| {
            if state.list_name_taken(list.owner_id, &list.name, None) {
                return Err(ServiceError::Conflict(format!(
                    "task list '{}' already exists",
                    list.name
                )));
            }
            state.task_lists.insert(list.id, list);
            Ok(())
        })
    }

    fn replace_task_list(&self, list: TaskList) -> ServiceResult<()> {
        self.mutate(|state| {
            if state.list_name_taken(list.owner_id, &list.name, Some(list.id)) {
                return Err(ServiceError::Conflict(format!(
                    "task list '{}' already exists",
                    list.name
                )));
            }
            let slot = state
                .task_lists
                .get_mut(&list.id)
                .filter(|existing| existing.owner_id == list.owner_id)
                .ok_or_else(|| not_found("task list", list.id))?;
            *slot = list;
            Ok(())
        })
    }

    fn delete_task_list(&self, owner: Uuid, id: Uuid) -> ServiceResult<()> {
        self.mutate(|state| {
            if !state.task_lists.get(&id).is_some_and(|list| list.owner_id == owner) {
                return Err(not_found("task list", id));
            }
            state.task_lists.remove(&id);
            Ok(())
        })
    }
}

impl AccountStore for InMemoryStore {
    fn insert_account(&self, account: Account) -> ServiceResult<()> {
        self.mutate(|state| {
            let email = normalize_email(&account.email);
            if state
                .accounts
                .values()
                .any(|existing| normalize_email(&existing.email) == email)
            {
                return Err(ServiceError::Conflict(format!(
                    "an account for {email} already exists"
                )));
            }
            state.accounts.insert(account.id, account);
            Ok(())
        })
    }

    fn account_by_email(&self, email: &str) -> ServiceResult<Option<Account>> {
        let email = normalize_email(email);
        Ok(self
            .read()
            .accounts
            .values()
            .find(|account| normalize_email(&account.email) == email)
            .cloned())
    }

    fn account_by_id(&self, id: Uuid) -> ServiceResult<Account> {
        self.read()
            .accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("account", id))
    }
}
