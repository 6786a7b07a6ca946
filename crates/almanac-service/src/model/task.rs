use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use almanac_engine::event::wall_clock;

use super::deserialize_some;

/// Lists every owner starts with: name, colour, default flag.
pub const DEFAULT_TASK_LISTS: [(&str, &str, bool); 3] = [
    ("My Tasks", "#039be5", true),
    ("Work", "#7986cb", false),
    ("Personal", "#33b679", false),
];

pub const DEFAULT_LIST_COLOR: &str = "#039be5";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(format!("status must be pending or completed, got '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, with = "wall_clock::option", skip_serializing_if = "Option::is_none")]
    pub due_time: Option<NaiveTime>,
    pub priority: Priority,
    /// Name of the owning task list.
    pub list: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    #[must_use]
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.due_date == Some(date)
    }

    /// Flips completion, stamping or clearing `completed_at`.
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.completed_at = self.completed.then_some(now);
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default, with = "wall_clock::option")]
    pub due_time: Option<NaiveTime>,
    #[serde(default)]
    pub priority: Priority,
    /// Defaults to the owner's default list.
    #[serde(default)]
    pub list: Option<String>,
}

impl NewTask {
    #[must_use]
    pub fn into_task(self, owner_id: Uuid, list: String) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::now_v7(),
            owner_id,
            title: self.title.trim().to_string(),
            description: self.description,
            completed: self.completed,
            due_date: self.due_date,
            due_time: self.due_time,
            priority: self.priority,
            list,
            created_at: now,
            updated_at: now,
            completed_at: self.completed.then_some(now),
        }
    }
}

fn deserialize_patch_time<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Option<NaiveTime>>, D::Error> {
    wall_clock::option::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "deserialize_patch_time")]
    pub due_time: Option<Option<NaiveTime>>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub list: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn apply(self, task: &mut Task, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(due_time) = self.due_time {
            task.due_time = due_time;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(list) = self.list {
            task.list = list;
        }
        if let Some(completed) = self.completed {
            if completed != task.completed {
                task.toggle(now);
            }
        }
        task.updated_at = now;
    }
}

/// Narrowing applied when listing tasks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    #[serde(default)]
    pub list: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.list.as_ref().is_none_or(|list| &task.list == list)
            && self.status.is_none_or(|status| match status {
                TaskStatus::Pending => !task.completed,
                TaskStatus::Completed => task.completed,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub color: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTaskList {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl NewTaskList {
    #[must_use]
    pub fn into_list(self, owner_id: Uuid) -> TaskList {
        TaskList {
            id: Uuid::now_v7(),
            owner_id,
            name: self.name.trim().to_string(),
            color: self.color.unwrap_or_else(|| DEFAULT_LIST_COLOR.to_string()),
            is_default: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskListPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        serde_json::from_str::<NewTask>(r#"{"title": "Report", "due_date": "2024-12-20", "due_time": "18:00", "priority": "high"}"#)
            .expect("new task")
            .into_task(Uuid::nil(), "Work".to_string())
    }

    #[test]
    fn test_toggle_stamps_completion() {
        let mut task = task();
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);

        let now = Utc::now();
        task.toggle(now);
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(now));

        task.toggle(now);
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_patch_clears_due_time() {
        let mut task = task();
        assert_eq!(task.due_time, NaiveTime::from_hms_opt(18, 0, 0));

        let patch: TaskPatch =
            serde_json::from_str(r#"{"due_time": null, "completed": true}"#).expect("patch");
        patch.apply(&mut task, Utc::now());
        assert_eq!(task.due_time, None);
        assert!(task.completed);
        assert!(task.completed_at.is_some());
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn test_filter() {
        let task = task();
        let by_list = TaskFilter {
            list: Some("Work".to_string()),
            status: None,
        };
        let completed = TaskFilter {
            list: None,
            status: Some(TaskStatus::Completed),
        };
        assert!(by_list.matches(&task));
        assert!(!completed.matches(&task));
        assert!(TaskFilter::default().matches(&task));
        assert_eq!("Pending".parse::<TaskStatus>(), Ok(TaskStatus::Pending));
    }
}
