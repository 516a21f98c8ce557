//! In-process [`TodoStore`] with the same id and timestamp rules as MySQL.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{next_updated_at, StoreResult, TodoStore};
use crate::models::todo::now_timestamp;
use crate::models::{NewTodo, Todo, TodoChanges};

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Todo>,
}

#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    table: RwLock<Table>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn init_schema(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert(&self, new: NewTodo) -> StoreResult<Todo> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let now = now_timestamp();
        let todo = Todo {
            id: table.next_id,
            title: new.title,
            description: new.description,
            completed: new.completed,
            created_at: Some(now),
            updated_at: Some(now),
        };
        table.rows.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Todo>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn list_all(&self) -> StoreResult<Vec<Todo>> {
        let mut todos: Vec<Todo> = self.table.read().await.rows.values().cloned().collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(todos)
    }

    async fn update(&self, id: i64, changes: TodoChanges) -> StoreResult<Option<Todo>> {
        let mut table = self.table.write().await;
        let Some(todo) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(todo);
        todo.updated_at = Some(next_updated_at(todo));
        Ok(Some(todo.clone()))
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
