use std::path::{Path, PathBuf};

use crate::db::Database;
use crate::error::StorageError;
use crate::models::{DeleteOutcome, Todo, TodoChanges};

/// Operations the HTTP layer needs from a todo backend.
pub trait TodoService: Send + Sync + 'static {
    fn add_todo(&self, title: &str, content: Option<&str>) -> Result<Todo, StorageError>;
    fn get_todos(&self) -> Result<Vec<Todo>, StorageError>;
    fn search_todos(&self, keyword: &str) -> Result<Vec<Todo>, StorageError>;
    fn filter_todos_by_status(&self, completed: bool) -> Result<Vec<Todo>, StorageError>;
    fn update_todo(&self, id: i64, changes: &TodoChanges) -> Result<Option<Todo>, StorageError>;
    fn delete_todo(&self, id: i64) -> Result<DeleteOutcome, StorageError>;
}

/// Opens a fresh SQLite session for every call and drops it before
/// returning.
#[derive(Debug, Clone)]
pub struct SqliteTodoService {
    db_path: PathBuf,
}

impl SqliteTodoService {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn session(&self) -> Result<Database, StorageError> {
        Database::open(&self.db_path)
    }
}

impl TodoService for SqliteTodoService {
    fn add_todo(&self, title: &str, content: Option<&str>) -> Result<Todo, StorageError> {
        self.session()?.add_todo(title, content)
    }

    fn get_todos(&self) -> Result<Vec<Todo>, StorageError> {
        self.session()?.get_todos()
    }

    fn search_todos(&self, keyword: &str) -> Result<Vec<Todo>, StorageError> {
        self.session()?.search_todos(keyword)
    }

    fn filter_todos_by_status(&self, completed: bool) -> Result<Vec<Todo>, StorageError> {
        self.session()?.filter_todos_by_status(completed)
    }

    fn update_todo(&self, id: i64, changes: &TodoChanges) -> Result<Option<Todo>, StorageError> {
        self.session()?.update_todo(id, changes)
    }

    fn delete_todo(&self, id: i64) -> Result<DeleteOutcome, StorageError> {
        self.session()?.delete_todo(id)
    }
}
