//! Target domain types for the Vectors task database.
//!
//! These are the entities the import pipeline creates: boards, tags,
//! tasks, subtasks, and the import-history records used to flag boards
//! that were already brought over.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::None => "none",
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Priority::None),
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in_progress",
            Status::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(Status::Todo),
            "in_progress" => Some(Status::InProgress),
            "done" => Some(Status::Done),
            _ => None,
        }
    }
}

/// Recurrence schedule of a task.
///
/// Imported tasks are always `None`; the other variants exist because
/// the host app supports recurring tasks through its editing flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Recurrence::None),
            "daily" => Some(Recurrence::Daily),
            "weekly" => Some(Recurrence::Weekly),
            "monthly" => Some(Recurrence::Monthly),
            _ => None,
        }
    }
}

/// A board in the task database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub sort_order: i64,
    pub created_at: i64,
}

/// Insert shape for a board.
#[derive(Debug, Clone)]
pub struct NewBoard {
    pub user_id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub sort_order: i64,
}

/// A tag. Tag names are unique per user, case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub color: String,
}

/// Insert shape for a tag.
#[derive(Debug, Clone)]
pub struct NewTag {
    pub user_id: String,
    pub name: String,
    pub color: String,
}

/// A task in the task database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub board_id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub assigned_to: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub status: Status,
    /// Tag ids. An empty set is stored as "no tags" rather than an
    /// empty list.
    pub tags: Vec<String>,
    pub recurring: Recurrence,
    pub sort_order: i64,
    pub created_at: i64,
}

/// Insert shape for a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub user_id: String,
    pub board_id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub assigned_to: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub status: Status,
    pub tags: Vec<String>,
    pub recurring: Recurrence,
    pub sort_order: i64,
}

/// A subtask belonging to one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub task_id: String,
    pub title: String,
    pub completed: bool,
    pub sort_order: f64,
}

/// Insert shape for a subtask.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubtask {
    pub task_id: String,
    pub title: String,
    pub completed: bool,
    /// Copied from the Trello check-item position so source order is
    /// preserved within the task.
    pub sort_order: f64,
}

/// One row of import history.
///
/// Existence of a record for a (user, Trello board) pair is the only
/// signal used to flag a board as already imported. It is advisory:
/// nothing at the data layer blocks a re-import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRecord {
    pub id: String,
    pub user_id: String,
    pub trello_board_id: String,
    pub trello_board_name: String,
    pub board_id: String,
    pub tasks_imported: i64,
    pub imported_at: i64,
}

/// Insert shape for an import record.
#[derive(Debug, Clone)]
pub struct NewImportRecord {
    pub user_id: String,
    pub trello_board_id: String,
    pub trello_board_name: String,
    pub board_id: String,
    pub tasks_imported: i64,
}

/// Get the current timestamp in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
