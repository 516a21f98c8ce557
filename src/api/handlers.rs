//! API Handlers
//!
//! HTTP request handlers for each todo endpoint. Handlers only translate
//! between HTTP and [`TodoService`]; cache policy lives in the service.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use crate::cache::TodoCache;
use crate::error::{Result, TodoError};
use crate::models::{
    CreateTodoRequest, DeleteResponse, HealthResponse, Todo, UpdateTodoRequest,
};
use crate::service::TodoService;
use crate::store::TodoStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub todos: TodoService,
}

impl AppState {
    pub fn new(todos: TodoService) -> Self {
        Self { todos }
    }

    /// Builds the service over the given store and optional cache.
    pub fn with_backends(store: Arc<dyn TodoStore>, cache: Option<Arc<dyn TodoCache>>) -> Self {
        Self::new(TodoService::new(store, cache))
    }
}

fn todo_id(path: std::result::Result<Path<i64>, PathRejection>) -> Result<i64> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => Err(TodoError::InvalidId(rejection.body_text())),
    }
}

fn json_body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(TodoError::Validation(rejection.body_text())),
    }
}

/// Handler for GET /api/health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.todos.cache_available()))
}

/// Handler for GET /api/todos
pub async fn list_todos_handler(State(state): State<AppState>) -> Result<Json<Vec<Todo>>> {
    Ok(Json(state.todos.list_all().await?))
}

/// Handler for GET /api/todos/:id
pub async fn get_todo_handler(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Todo>> {
    let id = todo_id(path)?;
    Ok(Json(state.todos.get_by_id(id).await?))
}

/// Handler for POST /api/todos
///
/// Responds 201 with the created record.
pub async fn create_todo_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>)> {
    let request = json_body(body)?;
    let todo = state.todos.create(request).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Handler for PUT /api/todos/:id
///
/// An unknown id is a 404 even when the body is malformed.
pub async fn update_todo_handler(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
    body: std::result::Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<Todo>> {
    let id = todo_id(path)?;
    state.todos.ensure_exists(id).await?;
    let request = json_body(body)?;
    Ok(Json(state.todos.update(id, request).await?))
}

/// Handler for DELETE /api/todos/:id
pub async fn delete_todo_handler(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>> {
    let id = todo_id(path)?;
    state.todos.delete(id).await?;
    Ok(Json(DeleteResponse::new(id)))
}

/// Handler for OPTIONS on every route
///
/// Preflights carrying `Access-Control-Request-Method` are answered by the
/// CORS layer; a bare OPTIONS lands here.
pub async fn options_handler() -> StatusCode {
    StatusCode::OK
}
