//! Startup Module
//!
//! One-time work done before the server accepts traffic: connecting to the
//! store with a bounded retry loop, and deciding whether a cache is usable.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::cache::{CacheError, RedisCache, TodoCache};
use crate::config::Config;
use crate::error::StartupError;
use crate::store::{MySqlTodoStore, TodoStore};

/// Fixed-attempt, fixed-delay retry used for store connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.db_max_retries.max(1),
            delay: config.db_retry_delay(),
        }
    }
}

/// Runs `attempt` until it succeeds or the policy is exhausted.
///
/// Sleeps `policy.delay` between attempts, not after the last one.
pub async fn retry_startup<T, E, F, Fut>(
    policy: RetryPolicy,
    mut attempt: F,
) -> Result<T, StartupError>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut last_error = String::new();
    for n in 1..=policy.max_attempts {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                last_error = err.to_string();
                if n < policy.max_attempts {
                    warn!(
                        "Database connection attempt {}/{} failed: {}",
                        n, policy.max_attempts, last_error
                    );
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    error!(
        "Could not connect to the database after {} attempts: {}",
        policy.max_attempts, last_error
    );
    Err(StartupError::StoreUnavailable {
        attempts: policy.max_attempts,
        last_error,
    })
}

/// Connects to MySQL and creates the schema, retrying per `config`.
pub async fn init_store(config: &Config) -> Result<MySqlTodoStore, StartupError> {
    let url = config.database_url();
    let url = url.as_str();
    let max_connections = config.db_max_connections;
    let store = retry_startup(RetryPolicy::from_config(config), move || async move {
        let store = MySqlTodoStore::connect(url, max_connections).await?;
        store.init_schema().await?;
        Ok::<_, crate::store::StoreError>(store)
    })
    .await?;
    info!("Database initialized");
    Ok(store)
}

// == Cache Probe ==
/// Outcome of the one-shot startup cache check.
pub enum CacheProbe {
    Connected(Arc<dyn TodoCache>),
    Unavailable(CacheError),
}

impl CacheProbe {
    pub fn is_connected(&self) -> bool {
        matches!(self, CacheProbe::Connected(_))
    }

    /// The cache capability to inject into the service. Logs the decision.
    pub fn into_cache(self) -> Option<Arc<dyn TodoCache>> {
        match self {
            CacheProbe::Connected(cache) => {
                info!("Cache available");
                Some(cache)
            }
            CacheProbe::Unavailable(err) => {
                warn!("Cache unavailable, running without cache: {}", err);
                None
            }
        }
    }
}

/// Connects to Redis and sends `PING`, giving up after `timeout`.
///
/// Never retried: an unavailable cache stays unavailable for the process.
pub async fn probe_cache(url: &str, timeout: Duration) -> CacheProbe {
    let connect = async {
        let cache = RedisCache::connect(url).await?;
        cache.ping().await?;
        Ok::<_, CacheError>(cache)
    };

    match tokio::time::timeout(timeout, connect).await {
        Ok(Ok(cache)) => CacheProbe::Connected(Arc::new(cache)),
        Ok(Err(err)) => CacheProbe::Unavailable(err),
        Err(_) => CacheProbe::Unavailable(CacheError::Timeout(timeout)),
    }
}
