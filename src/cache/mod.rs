//! Read-through cache for per-user task lists.
//!
//! `TaskCache` is what the task service holds. It is either `Connected` to a
//! `CacheBackend` or `Unavailable`, and every operation on it is infallible:
//! backend errors are logged and turned into "miss" or "nothing to do". The
//! cache can therefore go away at any time without failing a request.

pub mod memory;
pub mod redis;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::Task;

pub use memory::MemoryCache;
pub use self::redis::RedisCache;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
    #[error("cached value could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Minimal string key/value store with per-key expiry.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

#[derive(Clone)]
pub enum TaskCache {
    Connected {
        backend: Arc<dyn CacheBackend>,
        ttl: Duration,
    },
    Unavailable,
}

impl TaskCache {
    /// Uses `backend` with entries expiring after `ttl`. A zero TTL disables caching.
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        if ttl.is_zero() {
            return TaskCache::Unavailable;
        }
        TaskCache::Connected { backend, ttl }
    }

    /// Connects to Redis once. Any failure, including a missing URL, degrades
    /// to `Unavailable` and is logged.
    pub async fn connect(redis_url: Option<&str>, ttl: Duration) -> Self {
        let Some(url) = redis_url else {
            log::info!("Task cache disabled by configuration");
            return TaskCache::Unavailable;
        };
        if ttl.is_zero() {
            log::info!("Task cache disabled: CACHE_TTL_SECONDS is 0");
            return TaskCache::Unavailable;
        }

        match RedisCache::connect(url).await {
            Ok(redis) => {
                log::info!("Task cache connected (ttl {}s)", ttl.as_secs());
                TaskCache::new(Arc::new(redis), ttl)
            }
            Err(e) => {
                log::warn!("Redis unavailable, continuing without cache: {}", e);
                TaskCache::Unavailable
            }
        }
    }

    /// An in-process cache, for single-instance runs and tests.
    pub fn memory(ttl: Duration) -> Self {
        TaskCache::new(Arc::new(MemoryCache::new()), ttl)
    }

    pub fn is_available(&self) -> bool {
        matches!(self, TaskCache::Connected { .. })
    }

    /// The cached list for `owner`, or `None` on a miss, a backend error or an
    /// undecodable entry.
    pub async fn get_tasks(&self, owner: Uuid) -> Option<Vec<Task>> {
        let TaskCache::Connected { backend, .. } = self else {
            return None;
        };

        let key = tasks_key(owner);
        let raw = match backend.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(tasks) => Some(tasks),
            Err(e) => {
                log::warn!("discarding undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Stores the list for `owner`. Failures are logged and ignored.
    pub async fn put_tasks(&self, owner: Uuid, tasks: &[Task]) {
        let TaskCache::Connected { backend, ttl } = self else {
            return;
        };

        let key = tasks_key(owner);
        let result = match serde_json::to_string(tasks) {
            Ok(raw) => backend.set(&key, raw, *ttl).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            log::warn!("cache write failed for {}: {}", key, e);
        }
    }

    /// Drops the list for `owner`. Failures are logged and ignored.
    pub async fn invalidate(&self, owner: Uuid) {
        let TaskCache::Connected { backend, .. } = self else {
            return;
        };

        let key = tasks_key(owner);
        if let Err(e) = backend.delete(&key).await {
            log::warn!("cache invalidation failed for {}: {}", key, e);
        }
    }
}

pub fn tasks_key(owner: Uuid) -> String {
    format!("tasks:{}", owner)
}
