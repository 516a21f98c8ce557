//! Todo record and the DTOs used for HTTP request and response bodies.

pub mod requests;
pub mod responses;
pub mod todo;

// Re-export commonly used types
pub use requests::{CreateTodoRequest, UpdateTodoRequest};
pub use responses::{DeleteResponse, ErrorResponse, HealthResponse};
pub use todo::{NewTodo, Todo, TodoChanges, MAX_TITLE_LENGTH};
