//! Redis cache for rate limiting and distributed locks.

use std::sync::Arc;

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Cache key prefix for rate limiting
const CACHE_PREFIX_RATE_LIMIT: &str = "withaeng:rate_limit:";

/// Cache key prefix for distributed locks
const CACHE_PREFIX_LOCK: &str = "withaeng:lock:";

/// Redis wrapper sharing one multiplexed connection.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis.
    pub async fn connect(url: &str) -> Result<Self, RedisError> {
        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;
        tracing::info!("Redis cache connected");

        Ok(Self { connection })
    }

    /// Round-trip a PING.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    // =========================================================================
    // Rate Limiting
    // =========================================================================

    /// Increment the counter for `identifier` in the current window.
    /// Returns (current_count, allowed).
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier);
        let mut conn = self.connection.clone();

        let count: u64 = conn.incr(&key, 1u64).await?;
        if count == 1 {
            let _: () = conn.expire(&key, window_seconds as i64).await?;
        }

        Ok((count, count <= max_requests))
    }

    // =========================================================================
    // Distributed Lock
    // =========================================================================

    /// Try to take the lock on `resource` without waiting.
    /// Returns `None` if another holder owns it.
    pub async fn try_acquire_lock(
        &self,
        resource: &str,
        ttl_seconds: u64,
    ) -> AppResult<Option<LockGuard>> {
        let key = format!("{}{}", CACHE_PREFIX_LOCK, resource);
        let lock_id = Uuid::new_v4().to_string();
        let mut conn = self.connection.clone();

        let acquired: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(&lock_id)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await?;

        if acquired.is_none() {
            return Ok(None);
        }

        tracing::debug!(resource = %resource, lock_id = %lock_id, "Lock acquired");
        Ok(Some(LockGuard {
            cache: Arc::new(self.clone()),
            key,
            lock_id,
            released: false,
        }))
    }

    /// Reset the expiry of the lock only if `lock_id` still owns it.
    async fn extend_lock(&self, key: &str, lock_id: &str, ttl_seconds: u64) -> AppResult<bool> {
        let mut conn = self.connection.clone();

        let script = r#"
            if redis.call("GET", KEYS[1]) == ARGV[1] then
                return redis.call("EXPIRE", KEYS[1], ARGV[2])
            else
                return 0
            end
        "#;

        let extended: i32 = redis::cmd("EVAL")
            .arg(script)
            .arg(1)
            .arg(key)
            .arg(lock_id)
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok(extended == 1)
    }

    /// Delete the lock only if `lock_id` still owns it.
    async fn release_lock(&self, key: &str, lock_id: &str) -> AppResult<bool> {
        let mut conn = self.connection.clone();

        let script = r#"
            if redis.call("GET", KEYS[1]) == ARGV[1] then
                return redis.call("DEL", KEYS[1])
            else
                return 0
            end
        "#;

        let released: i32 = redis::cmd("EVAL")
            .arg(script)
            .arg(1)
            .arg(key)
            .arg(lock_id)
            .query_async(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok(released == 1)
    }
}

// =============================================================================
// Lock Guard (RAII)
// =============================================================================

/// Releases the distributed lock when dropped.
pub struct LockGuard {
    cache: Arc<Cache>,
    key: String,
    lock_id: String,
    released: bool,
}

impl LockGuard {
    /// Keep the lock for another `ttl_seconds`. `false` means it already
    /// expired and may belong to someone else.
    pub async fn extend(&self, ttl_seconds: u64) -> AppResult<bool> {
        self.cache
            .extend_lock(&self.key, &self.lock_id, ttl_seconds)
            .await
    }

    /// Release the lock now instead of on drop.
    pub async fn release(mut self) -> AppResult<()> {
        self.released = true;
        if self.cache.release_lock(&self.key, &self.lock_id).await? {
            tracing::debug!(key = %self.key, "Lock released");
        }
        Ok(())
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let cache = self.cache.clone();
        let key = std::mem::take(&mut self.key);
        let lock_id = std::mem::take(&mut self.lock_id);

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(e) = cache.release_lock(&key, &lock_id).await {
                    tracing::error!(key = %key, error = %e, "Failed to release lock on drop");
                }
            });
        }
    }
}
