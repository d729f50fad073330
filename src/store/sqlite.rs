//! SQLite-backed [`Store`] implementation.

use super::Store;
use crate::types::{
    Board, ImportRecord, NewBoard, NewImportRecord, NewSubtask, NewTag, NewTask, Priority,
    Recurrence, Status, Subtask, Tag, Task, now_ms,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Database handle wrapping a SQLite connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Enable WAL mode for concurrent access
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;",
        )?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.run_migrations()?;

        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.run_migrations()?;

        Ok(store)
    }

    /// Run database migrations.
    fn run_migrations(&self) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        embedded::migrations::runner().run(&mut *conn)?;
        Ok(())
    }

    /// Execute a function with exclusive access to the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().unwrap();
        f(&conn)
    }
}

fn parse_board_row(row: &Row) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        color: row.get("color")?,
        icon: row.get("icon")?,
        sort_order: row.get("sort_order")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_tag_row(row: &Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        color: row.get("color")?,
    })
}

fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let due_date: Option<String> = row.get("due_date")?;
    let priority: String = row.get("priority")?;
    let status: String = row.get("status")?;
    let recurring: String = row.get("recurring")?;
    let tags_json: Option<String> = row.get("tags")?;

    Ok(Task {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        board_id: row.get("board_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        completed: row.get("completed")?,
        assigned_to: row.get("assigned_to")?,
        due_date: due_date.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }),
        priority: Priority::from_str(&priority).unwrap_or_default(),
        status: Status::from_str(&status).unwrap_or_default(),
        tags: tags_json
            .map(|s| serde_json::from_str(&s).unwrap_or_default())
            .unwrap_or_default(),
        recurring: Recurrence::from_str(&recurring).unwrap_or_default(),
        sort_order: row.get("sort_order")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_import_row(row: &Row) -> rusqlite::Result<ImportRecord> {
    Ok(ImportRecord {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        trello_board_id: row.get("trello_board_id")?,
        trello_board_name: row.get("trello_board_name")?,
        board_id: row.get("board_id")?,
        tasks_imported: row.get("tasks_imported")?,
        imported_at: row.get("imported_at")?,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn create_board(&self, board: NewBoard) -> Result<Board> {
        self.with_conn(|conn| {
            let id = Uuid::new_v4().to_string();
            let now = now_ms();
            conn.execute(
                "INSERT INTO boards (id, user_id, name, color, icon, sort_order, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    board.user_id,
                    board.name,
                    board.color,
                    board.icon,
                    board.sort_order,
                    now
                ],
            )
            .context("insert board")?;

            Ok(Board {
                id,
                user_id: board.user_id,
                name: board.name,
                color: board.color,
                icon: board.icon,
                sort_order: board.sort_order,
                created_at: now,
            })
        })
    }

    async fn list_tags(&self, user_id: &str) -> Result<Vec<Tag>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM tags WHERE user_id = ?1 ORDER BY name")?;
            let tags = stmt
                .query_map(params![user_id], parse_tag_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tags)
        })
    }

    async fn create_tag(&self, tag: NewTag) -> Result<Tag> {
        self.with_conn(|conn| {
            let id = Uuid::new_v4().to_string();
            conn.execute(
                "INSERT INTO tags (id, user_id, name, color) VALUES (?1, ?2, ?3, ?4)",
                params![id, tag.user_id, tag.name, tag.color],
            )
            .context("insert tag")?;

            Ok(Tag {
                id,
                user_id: tag.user_id,
                name: tag.name,
                color: tag.color,
            })
        })
    }

    async fn create_task(&self, task: NewTask) -> Result<Task> {
        self.with_conn(|conn| {
            let id = Uuid::new_v4().to_string();
            let now = now_ms();
            // Empty tag sets are stored as NULL, not as "[]".
            let tags_json = if task.tags.is_empty() {
                None
            } else {
                Some(serde_json::to_string(&task.tags)?)
            };
            conn.execute(
                "INSERT INTO tasks (id, user_id, board_id, title, description, completed,
                                    assigned_to, due_date, priority, status, tags, recurring,
                                    sort_order, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    id,
                    task.user_id,
                    task.board_id,
                    task.title,
                    task.description,
                    task.completed,
                    task.assigned_to,
                    task.due_date.map(|dt| dt.to_rfc3339()),
                    task.priority.as_str(),
                    task.status.as_str(),
                    tags_json,
                    task.recurring.as_str(),
                    task.sort_order,
                    now
                ],
            )
            .context("insert task")?;

            Ok(Task {
                id,
                user_id: task.user_id,
                board_id: task.board_id,
                title: task.title,
                description: task.description,
                completed: task.completed,
                assigned_to: task.assigned_to,
                due_date: task.due_date,
                priority: task.priority,
                status: task.status,
                tags: task.tags,
                recurring: task.recurring,
                sort_order: task.sort_order,
                created_at: now,
            })
        })
    }

    async fn insert_subtasks(&self, subtasks: &[NewSubtask]) -> Result<()> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "INSERT INTO subtasks (id, task_id, title, completed, sort_order)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for subtask in subtasks {
                stmt.execute(params![
                    Uuid::new_v4().to_string(),
                    subtask.task_id,
                    subtask.title,
                    subtask.completed,
                    subtask.sort_order
                ])
                .context("insert subtask")?;
            }
            Ok(())
        })
    }

    async fn record_import(&self, record: NewImportRecord) -> Result<ImportRecord> {
        self.with_conn(|conn| {
            let id = Uuid::new_v4().to_string();
            let now = now_ms();
            conn.execute(
                "INSERT INTO trello_imports (id, user_id, trello_board_id, trello_board_name,
                                             board_id, tasks_imported, imported_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    record.user_id,
                    record.trello_board_id,
                    record.trello_board_name,
                    record.board_id,
                    record.tasks_imported,
                    now
                ],
            )
            .context("insert import record")?;

            Ok(ImportRecord {
                id,
                user_id: record.user_id,
                trello_board_id: record.trello_board_id,
                trello_board_name: record.trello_board_name,
                board_id: record.board_id,
                tasks_imported: record.tasks_imported,
                imported_at: now,
            })
        })
    }

    async fn find_import(
        &self,
        user_id: &str,
        trello_board_id: &str,
    ) -> Result<Option<ImportRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM trello_imports
                 WHERE user_id = ?1 AND trello_board_id = ?2
                 ORDER BY imported_at DESC LIMIT 1",
            )?;
            let result = stmt.query_row(params![user_id, trello_board_id], parse_import_row);
            match result {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    async fn list_imports(&self, user_id: &str) -> Result<Vec<ImportRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM trello_imports WHERE user_id = ?1
                 ORDER BY imported_at DESC, rowid DESC",
            )?;
            let records = stmt
                .query_map(params![user_id], parse_import_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
    }
}

impl SqliteStore {
    /// Tasks on a board in sort order. Used by the CLI and tests.
    pub fn tasks_for_board(&self, board_id: &str) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM tasks WHERE board_id = ?1 ORDER BY sort_order")?;
            let tasks = stmt
                .query_map(params![board_id], parse_task_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }

    /// Subtasks of a task in sort order. Used by the CLI and tests.
    pub fn subtasks_for_task(&self, task_id: &str) -> Result<Vec<Subtask>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM subtasks WHERE task_id = ?1 ORDER BY sort_order")?;
            let subtasks = stmt
                .query_map(params![task_id], |row| {
                    Ok(Subtask {
                        id: row.get("id")?,
                        task_id: row.get("task_id")?,
                        title: row.get("title")?,
                        completed: row.get("completed")?,
                        sort_order: row.get("sort_order")?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(subtasks)
        })
    }

    /// Board lookup by id. Used by tests.
    pub fn get_board(&self, board_id: &str) -> Result<Option<Board>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM boards WHERE id = ?1")?;
            let result = stmt.query_row(params![board_id], parse_board_row);
            match result {
                Ok(board) => Ok(Some(board)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }
}
