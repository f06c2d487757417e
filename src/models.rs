use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub completed: bool,
    pub create_time: DateTime<Utc>,
    pub finish_time: Option<DateTime<Utc>>,
}

impl Todo {
    /// Sets `completed`, stamping or clearing `finish_time` only when the
    /// value actually flips.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        match (self.completed, completed) {
            (false, true) => self.finish_time = Some(now),
            (true, false) => self.finish_time = None,
            _ => {}
        }
        self.completed = completed;
    }
}

/// Body of `POST /todos`.
#[derive(Debug, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Body of `PUT /todos/{id}`. A field that is omitted (or null) is left
/// untouched; an empty string is applied as-is.
#[derive(Debug, Default, Deserialize)]
pub struct TodoChanges {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    #[serde(skip)]
    pub deleted: bool,
    pub message: String,
}

impl DeleteOutcome {
    pub fn deleted(id: i64) -> Self {
        Self {
            deleted: true,
            message: format!("Todo {id} deleted"),
        }
    }

    pub fn not_found(id: i64) -> Self {
        Self {
            deleted: false,
            message: format!("Todo {id} not found"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn todo(completed: bool, finish_time: Option<DateTime<Utc>>) -> Todo {
        Todo {
            id: 1,
            title: "write report".to_string(),
            content: None,
            completed,
            create_time: Utc::now(),
            finish_time,
        }
    }

    #[test]
    fn completing_stamps_finish_time() {
        let mut todo = todo(false, None);
        let now = todo.create_time + Duration::seconds(5);
        todo.set_completed(true, now);
        assert!(todo.completed);
        assert_eq!(todo.finish_time, Some(now));
    }

    #[test]
    fn reopening_clears_finish_time() {
        let mut todo = todo(true, Some(Utc::now()));
        todo.set_completed(false, Utc::now());
        assert!(!todo.completed);
        assert_eq!(todo.finish_time, None);
    }

    #[test]
    fn same_value_keeps_finish_time() {
        let stamped = Utc::now() - Duration::hours(1);
        let mut done = todo(true, Some(stamped));
        done.set_completed(true, Utc::now());
        assert_eq!(done.finish_time, Some(stamped));

        let mut open = todo(false, None);
        open.set_completed(false, Utc::now());
        assert_eq!(open.finish_time, None);
    }

    #[test]
    fn changes_distinguish_empty_from_missing() {
        let changes: TodoChanges = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert_eq!(changes.title.as_deref(), Some(""));
        assert_eq!(changes.content, None);
        assert_eq!(changes.completed, None);
    }

    #[test]
    fn delete_outcome_serializes_message_only() {
        let value = serde_json::to_value(DeleteOutcome::deleted(7)).unwrap();
        assert_eq!(value, serde_json::json!({ "message": "Todo 7 deleted" }));
    }
}
