//! API Routes
//!
//! Configures the Axum router with all todo endpoints.

use std::time::Duration;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_todo_handler, delete_todo_handler, get_todo_handler, health_handler,
    list_todos_handler, options_handler, update_todo_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/health` - Health check, reports cache availability
/// - `GET /api/todos` - List all todos, newest first
/// - `POST /api/todos` - Create a todo
/// - `GET /api/todos/:id` - Fetch one todo
/// - `PUT /api/todos/:id` - Partially update a todo
/// - `DELETE /api/todos/:id` - Delete a todo
///
/// # Middleware
/// - CORS: Mirrors any origin; preflights are answered here, any other
///   OPTIONS gets an empty 200
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler).options(options_handler))
        .route(
            "/api/todos",
            get(list_todos_handler)
                .post(create_todo_handler)
                .options(options_handler),
        )
        .route(
            "/api/todos/:id",
            get(get_todo_handler)
                .put(update_todo_handler)
                .delete(delete_todo_handler)
                .options(options_handler),
        )
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
            ACCEPT,
        ])
        .max_age(Duration::from_secs(86400))
}
