//! Todo Service
//!
//! Orchestrates reads (cache, then store, populate on miss) and writes
//! (store, then invalidate) over a [`TodoStore`](crate::store::TodoStore)
//! and an optional [`TodoCache`](crate::cache::TodoCache).

mod todos;

#[cfg(test)]
mod property_tests;

pub use todos::TodoService;
