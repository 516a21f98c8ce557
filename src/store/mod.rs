//! Record Store
//!
//! Durable CRUD primitives for todo records. The store assigns ids and is the
//! only writer of `created_at` and `updated_at`.

mod memory;
mod mysql;

pub use memory::MemoryTodoStore;
pub use mysql::MySqlTodoStore;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use thiserror::Error;

use crate::models::todo::now_timestamp;
use crate::models::{NewTodo, Todo, TodoChanges};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence adapter used by the todo service.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Creates the backing table if it does not exist yet.
    async fn init_schema(&self) -> StoreResult<()>;

    /// Inserts a record, stamping `created_at == updated_at == now`.
    async fn insert(&self, new: NewTodo) -> StoreResult<Todo>;

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Todo>>;

    /// All records, newest `created_at` first (ties: highest id first).
    async fn list_all(&self) -> StoreResult<Vec<Todo>>;

    /// Applies `changes` and refreshes `updated_at`. `None` if `id` is unknown.
    async fn update(&self, id: i64, changes: TodoChanges) -> StoreResult<Option<Todo>>;

    /// Returns whether a record was removed.
    async fn delete_by_id(&self, id: i64) -> StoreResult<bool>;
}

/// Next `updated_at` for a record: now, but never at or before the previous
/// stamp or `created_at`.
pub(crate) fn next_updated_at(todo: &Todo) -> NaiveDateTime {
    let now = now_timestamp();
    match todo.updated_at.max(todo.created_at) {
        Some(floor) if now <= floor => floor + Duration::microseconds(1),
        _ => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_updated_at_moves_past_future_stamp() {
        let later = now_timestamp() + Duration::seconds(5);
        let todo = Todo {
            id: 1,
            title: "t".into(),
            description: None,
            completed: false,
            created_at: Some(later),
            updated_at: Some(later),
        };
        assert_eq!(next_updated_at(&todo), later + Duration::microseconds(1));
    }

    #[test]
    fn test_next_updated_at_uses_now_for_past_stamp() {
        let earlier = now_timestamp() - Duration::seconds(5);
        let todo = Todo {
            id: 1,
            title: "t".into(),
            description: None,
            completed: false,
            created_at: Some(earlier),
            updated_at: Some(earlier),
        };
        assert!(next_updated_at(&todo) > earlier + Duration::seconds(4));
    }
}
