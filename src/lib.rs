//! Todo API - a todo-tracking HTTP service
//!
//! Records live in MySQL; reads go through a short-lived Redis cache that is
//! invalidated after every write and skipped entirely when unavailable.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod startup;
pub mod store;

pub use api::AppState;
pub use config::Config;
pub use service::TodoService;
