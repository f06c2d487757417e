use tracing::info;

use crate::db::Database;
use crate::error::StorageError;
use crate::models::TodoChanges;

const SAMPLES: [(&str, &str, bool); 3] = [
    ("Learn axum", "Work through the axum examples", false),
    ("Learn Vue", "Get comfortable with Vue 3 basics", true),
    ("Finish the project", "Ship the todo list application", false),
];

/// Fills an empty store with a few sample todos. Returns how many were
/// inserted; a store that already holds records is left alone.
pub fn seed(db: &Database) -> Result<usize, StorageError> {
    let existing = db.count_todos()?;
    if existing > 0 {
        info!(existing, "database already has todos, skipping sample data");
        return Ok(0);
    }

    for (title, content, completed) in SAMPLES {
        let todo = db.add_todo(title, Some(content))?;
        if completed {
            let changes = TodoChanges {
                completed: Some(true),
                ..TodoChanges::default()
            };
            db.update_todo(todo.id, &changes)?;
        }
    }
    info!(count = SAMPLES.len(), "sample todos added");
    Ok(SAMPLES.len())
}
