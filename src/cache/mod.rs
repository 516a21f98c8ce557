//! Cache Module
//!
//! Best-effort expiring key-value overlay in front of the store. Entries are
//! JSON snapshots of query results; the store stays authoritative.

mod entry;
mod memory;
mod redis_backend;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

// Re-export public types
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use redis_backend::RedisCache;

// == Public Constants ==
/// Lifetime of every cache entry.
pub const CACHE_TTL: Duration = Duration::from_secs(60);

// == Cache Key ==
/// Keys the todo service reads and invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The full, ordered record list
    AllTodos,
    /// A single record
    Todo(i64),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::AllTodos => write!(f, "todos:all"),
            CacheKey::Todo(id) => write!(f, "todos:{}", id),
        }
    }
}

// == Cache Error ==
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("cache did not answer within {0:?}")]
    Timeout(Duration),
    #[error("unexpected PING reply: {0}")]
    UnexpectedReply(String),
}

pub type CacheResult<T> = std::result::Result<T, CacheError>;

// == Todo Cache ==
/// Expiring string store keyed by [`CacheKey`].
#[async_trait]
pub trait TodoCache: Send + Sync {
    /// Returns the live value for `key`, or `None` if absent or expired.
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &CacheKey, value: String, ttl: Duration) -> CacheResult<()>;

    /// Removes every key in `keys`; missing keys are not an error.
    async fn delete(&self, keys: &[CacheKey]) -> CacheResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_format() {
        assert_eq!(CacheKey::AllTodos.to_string(), "todos:all");
        assert_eq!(CacheKey::Todo(42).to_string(), "todos:42");
    }
}
