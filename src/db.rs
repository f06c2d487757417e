use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use tracing::debug;

use crate::error::StorageError;
use crate::models::{DeleteOutcome, Todo, TodoChanges};

const SELECT_TODOS: &str =
    "SELECT id, title, content, completed, create_time, finish_time FROM todos";

/// One open session against the todo store. The connection is closed when
/// the value is dropped.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StorageError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { conn })
    }

    pub fn create_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT,
                completed INTEGER NOT NULL DEFAULT 0,
                create_time TEXT NOT NULL,
                finish_time TEXT
            );
            "#,
        )?;
        Ok(())
    }

    pub fn add_todo(&self, title: &str, content: Option<&str>) -> Result<Todo, StorageError> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO todos (title, content, completed, create_time) VALUES (?1, ?2, 0, ?3)",
            params![title, content, now.to_rfc3339()],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, "todo added");
        Ok(Todo {
            id,
            title: title.to_string(),
            content: content.map(str::to_string),
            completed: false,
            create_time: now,
            finish_time: None,
        })
    }

    pub fn get_todos(&self) -> Result<Vec<Todo>, StorageError> {
        self.select(&format!("{SELECT_TODOS} ORDER BY id"), [])
    }

    /// Case-sensitive substring match on title or content. `instr` keeps
    /// `%` and `_` literal, and an empty keyword matches every row.
    pub fn search_todos(&self, keyword: &str) -> Result<Vec<Todo>, StorageError> {
        self.select(
            &format!(
                "{SELECT_TODOS} WHERE instr(title, ?1) > 0 OR instr(content, ?1) > 0 ORDER BY id"
            ),
            params![keyword],
        )
    }

    pub fn filter_todos_by_status(&self, completed: bool) -> Result<Vec<Todo>, StorageError> {
        self.select(
            &format!("{SELECT_TODOS} WHERE completed = ?1 ORDER BY id"),
            params![completed],
        )
    }

    pub fn get_todo(&self, id: i64) -> Result<Option<Todo>, StorageError> {
        let raw = self
            .conn
            .query_row(
                &format!("{SELECT_TODOS} WHERE id = ?1"),
                params![id],
                RawTodo::from_row,
            )
            .optional()?;
        raw.map(RawTodo::into_todo).transpose()
    }

    /// Applies the supplied fields to the stored record. Returns `None`, and
    /// writes nothing, when no record has this id.
    pub fn update_todo(&self, id: i64, changes: &TodoChanges) -> Result<Option<Todo>, StorageError> {
        let Some(mut todo) = self.get_todo(id)? else {
            debug!(id, "update skipped, todo not found");
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            todo.title = title.clone();
        }
        if let Some(content) = &changes.content {
            todo.content = Some(content.clone());
        }
        if let Some(completed) = changes.completed {
            todo.set_completed(completed, Utc::now());
        }

        self.conn.execute(
            "UPDATE todos SET title = ?1, content = ?2, completed = ?3, finish_time = ?4 WHERE id = ?5",
            params![
                todo.title,
                todo.content,
                todo.completed,
                todo.finish_time.map(|at| at.to_rfc3339()),
                id
            ],
        )?;
        debug!(id, completed = todo.completed, "todo updated");
        Ok(Some(todo))
    }

    pub fn delete_todo(&self, id: i64) -> Result<DeleteOutcome, StorageError> {
        let deleted = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1", params![id])?;
        debug!(id, deleted, "todo delete");
        if deleted == 0 {
            return Ok(DeleteOutcome::not_found(id));
        }
        Ok(DeleteOutcome::deleted(id))
    }

    pub fn count_todos(&self) -> Result<i64, StorageError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM todos", [], |row| row.get(0))?;
        Ok(count)
    }

    fn select<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Todo>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, RawTodo::from_row)?;

        let mut todos = Vec::new();
        for raw in rows {
            todos.push(raw?.into_todo()?);
        }
        debug!(count = todos.len(), "todos selected");
        Ok(todos)
    }
}

/// A row as stored, before the timestamp columns are parsed.
struct RawTodo {
    id: i64,
    title: String,
    content: Option<String>,
    completed: bool,
    create_time: String,
    finish_time: Option<String>,
}

impl RawTodo {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            completed: row.get(3)?,
            create_time: row.get(4)?,
            finish_time: row.get(5)?,
        })
    }

    fn into_todo(self) -> Result<Todo, StorageError> {
        Ok(Todo {
            id: self.id,
            title: self.title,
            content: self.content,
            completed: self.completed,
            create_time: parse_datetime("create_time", &self.create_time)?,
            finish_time: self
                .finish_time
                .map(|value| parse_datetime("finish_time", &value))
                .transpose()?,
        })
    }
}

fn parse_datetime(column: &'static str, value: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StorageError::Timestamp {
            column,
            value: value.to_string(),
        })
}
