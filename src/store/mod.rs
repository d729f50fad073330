//! Persistence layer for the task database.
//!
//! The pipeline talks to the store through the [`Store`] trait: plain
//! insert/select operations over five logical tables with no ordering
//! or transaction guarantee across calls. [`SqliteStore`] is the
//! bundled implementation; tests substitute their own.

pub mod sqlite;

pub use sqlite::SqliteStore;

use crate::types::{
    Board, ImportRecord, NewBoard, NewImportRecord, NewSubtask, NewTag, NewTask, Tag, Task,
};
use anyhow::Result;
use async_trait::async_trait;

/// Generic operations against the task database.
///
/// Task inserts are one row at a time so a per-card failure can be
/// isolated; subtask inserts take a whole batch to bound round trips.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a board and return the stored row.
    async fn create_board(&self, board: NewBoard) -> Result<Board>;

    /// All tags belonging to a user.
    async fn list_tags(&self, user_id: &str) -> Result<Vec<Tag>>;

    /// Insert a tag and return the stored row.
    async fn create_tag(&self, tag: NewTag) -> Result<Tag>;

    /// Insert a single task and return the stored row.
    async fn create_task(&self, task: NewTask) -> Result<Task>;

    /// Insert a batch of subtasks.
    async fn insert_subtasks(&self, subtasks: &[NewSubtask]) -> Result<()>;

    /// Append one row of import history.
    async fn record_import(&self, record: NewImportRecord) -> Result<ImportRecord>;

    /// Find the import record for a (user, Trello board) pair, if any.
    async fn find_import(
        &self,
        user_id: &str,
        trello_board_id: &str,
    ) -> Result<Option<ImportRecord>>;

    /// All import records for a user, most recent first.
    async fn list_imports(&self, user_id: &str) -> Result<Vec<ImportRecord>>;
}
