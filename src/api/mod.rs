//! API Module
//!
//! HTTP handlers and routing for the todo REST API.
//!
//! # Endpoints
//! - `GET /api/health` - Health check endpoint
//! - `GET /api/todos` - List all todos
//! - `POST /api/todos` - Create a todo
//! - `GET /api/todos/:id` - Fetch one todo
//! - `PUT /api/todos/:id` - Update a todo
//! - `DELETE /api/todos/:id` - Delete a todo

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
