use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;
use tracing::debug;

use super::types::{parse_due_date, NewTask, Task, TaskPriority, TaskStatus};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    dueDate TEXT,
    priority TEXT DEFAULT 'normal',
    status TEXT DEFAULT 'pending',
    createdAt DATETIME DEFAULT CURRENT_TIMESTAMP
)";

const SELECT_COLUMNS: &str = "SELECT id, title, dueDate, priority, status, createdAt FROM tasks";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("task store lock poisoned")]
    Lock,
}

/// SQLite-backed task table. Calls are synchronous; run them on a blocking
/// thread when inside the async runtime.
pub struct TaskStore {
    conn: Mutex<Connection>,
}

impl TaskStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// All tasks, newest first, optionally restricted to one status value.
    pub fn list(&self, status: Option<&str>) -> Result<Vec<Task>, StoreError> {
        let conn = self.lock()?;
        let mut sql = SELECT_COLUMNS.to_string();
        if status.is_some() {
            sql.push_str(" WHERE status = ?1");
        }
        // julianday() compares RFC 3339 and SQLite's CURRENT_TIMESTAMP text alike.
        sql.push_str(" ORDER BY julianday(createdAt) DESC, id DESC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = match status {
            Some(status) => stmt.query_map(params![status], row_to_task)?,
            None => stmt.query_map([], row_to_task)?,
        };
        let tasks = rows.collect::<Result<Vec<_>, _>>()?;
        debug!(count = tasks.len(), ?status, "listed tasks");
        Ok(tasks)
    }

    pub fn create(&self, new_task: &NewTask) -> Result<Task, StoreError> {
        let conn = self.lock()?;
        let created_at = Utc::now().trunc_subsecs(3);
        conn.execute(
            "INSERT INTO tasks (title, dueDate, priority, status, createdAt) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new_task.title,
                new_task.due_date.as_ref().map(format_timestamp),
                new_task.priority.as_str(),
                TaskStatus::Pending.as_str(),
                format_timestamp(&created_at),
            ],
        )?;
        Ok(Task {
            id: conn.last_insert_rowid(),
            title: new_task.title.clone(),
            due_date: new_task.due_date,
            priority: new_task.priority,
            status: TaskStatus::Pending,
            created_at,
        })
    }

    /// Sets the status text of one row. Returns the number of rows touched,
    /// which is zero for an unknown id.
    pub fn update_status(&self, id: i64, status: &str) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE tasks SET status = ?1 WHERE id = ?2",
            params![status, id],
        )?;
        Ok(changed)
    }

    pub fn get(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let conn = self.lock()?;
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let task = conn
            .query_row(&sql, params![id], row_to_task)
            .optional()?;
        Ok(task)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Lock)
    }
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    // Older rows may hold whatever text the LLM returned; unreadable means unset.
    let due_date = row
        .get::<_, Option<String>>(2)?
        .as_deref()
        .and_then(parse_due_date);
    let priority = row
        .get::<_, Option<String>>(3)?
        .and_then(|raw| TaskPriority::parse(&raw))
        .unwrap_or_default();
    let status = row
        .get::<_, Option<String>>(4)?
        .map(TaskStatus::from)
        .unwrap_or_default();
    let created_at = parse_timestamp(5, &row.get::<_, String>(5)?)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        due_date,
        priority,
        status,
        created_at,
    })
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// Rows written by SQLite's CURRENT_TIMESTAMP default use "YYYY-MM-DD HH:MM:SS".
fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    parse_due_date(raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unreadable timestamp: {}", raw).into(),
        )
    })
}
