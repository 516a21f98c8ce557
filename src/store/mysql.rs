//! MySQL-backed [`TodoStore`].

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{debug, info};

use super::{next_updated_at, StoreResult, TodoStore};
use crate::models::todo::now_timestamp;
use crate::models::{NewTodo, Todo, TodoChanges};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS todo (
    id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
    title VARCHAR(200) NOT NULL,
    description TEXT NULL,
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at DATETIME(6) NULL,
    updated_at DATETIME(6) NULL,
    INDEX idx_todo_created_at (created_at)
) DEFAULT CHARSET = utf8mb4";

const SELECT_COLUMNS: &str = "SELECT id, title, description, completed, created_at, updated_at FROM todo";

#[derive(Clone)]
pub struct MySqlTodoStore {
    pool: MySqlPool,
}

impl MySqlTodoStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Opens a pool and checks out one connection, so an unreachable server
    /// fails here rather than on the first request.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl TodoStore for MySqlTodoStore {
    async fn init_schema(&self) -> StoreResult<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        info!("todo table ready");
        Ok(())
    }

    async fn insert(&self, new: NewTodo) -> StoreResult<Todo> {
        let now = now_timestamp();
        let result = sqlx::query(
            "INSERT INTO todo (title, description, completed, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.completed)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        debug!(id, "inserted todo");

        Ok(Todo {
            id,
            title: new.title,
            description: new.description,
            completed: new.completed,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn list_all(&self) -> StoreResult<Vec<Todo>> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(todos)
    }

    async fn update(&self, id: i64, changes: TodoChanges) -> StoreResult<Option<Todo>> {
        let mut tx = self.pool.begin().await?;

        let Some(mut todo) =
            sqlx::query_as::<_, Todo>(&format!("{SELECT_COLUMNS} WHERE id = ? FOR UPDATE"))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
        else {
            return Ok(None);
        };

        changes.apply_to(&mut todo);
        todo.updated_at = Some(next_updated_at(&todo));

        sqlx::query(
            "UPDATE todo SET title = ?, description = ?, completed = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(id, "updated todo");
        Ok(Some(todo))
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM todo WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
