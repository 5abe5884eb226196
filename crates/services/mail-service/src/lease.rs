//! Single-flight lease for dispatch runs.
//!
//! A run holds the lease for its whole duration and renews it before every
//! send. A run that cannot take the lease is skipped rather than queued; a
//! run whose renewal fails stops sending.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use common::{AppResult, Cache, LockGuard};

/// Redis key suffix for the dispatch lock
const DISPATCH_LOCK_RESOURCE: &str = "verification_dispatch";

/// Proof of holding the lease.
#[async_trait]
pub trait LeaseGuard: Send {
    /// Hold the lease for another `ttl`; `false` once it has been lost.
    async fn renew(&mut self, ttl: Duration) -> AppResult<bool>;

    /// Give the lease back now instead of on drop.
    async fn release(&mut self) -> AppResult<()>;
}

#[async_trait]
pub trait DispatchLease: Send + Sync {
    /// Take the lease without waiting; `None` when another run holds it.
    async fn try_acquire(&self) -> AppResult<Option<Box<dyn LeaseGuard>>>;
}

// =============================================================================
// In-process
// =============================================================================

/// In-process lease. Enough when a single instance runs the scheduler.
#[derive(Clone, Default)]
pub struct LocalLease {
    lock: Arc<Mutex<()>>,
}

impl LocalLease {
    pub fn new() -> Self {
        Self::default()
    }
}

struct LocalLeaseGuard(Option<OwnedMutexGuard<()>>);

#[async_trait]
impl LeaseGuard for LocalLeaseGuard {
    async fn renew(&mut self, _ttl: Duration) -> AppResult<bool> {
        Ok(self.0.is_some())
    }

    async fn release(&mut self) -> AppResult<()> {
        self.0.take();
        Ok(())
    }
}

#[async_trait]
impl DispatchLease for LocalLease {
    async fn try_acquire(&self) -> AppResult<Option<Box<dyn LeaseGuard>>> {
        Ok(self
            .lock
            .clone()
            .try_lock_owned()
            .ok()
            .map(|guard| Box::new(LocalLeaseGuard(Some(guard))) as Box<dyn LeaseGuard>))
    }
}

// =============================================================================
// Redis
// =============================================================================

/// Redis-backed lease shared by every instance pointing at the same cache.
///
/// Use [`RedisLease::layered`] in a server process so that a lapsed Redis key
/// never lets two runs of the same process overlap.
pub struct RedisLease {
    cache: Arc<Cache>,
    ttl: Duration,
}

impl RedisLease {
    pub fn new(cache: Arc<Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Redis lease held under an in-process one.
    pub fn layered(cache: Arc<Cache>, ttl: Duration) -> LayeredLease {
        LayeredLease::new(Arc::new(Self::new(cache, ttl)))
    }
}

struct RedisLeaseGuard(Option<LockGuard>);

#[async_trait]
impl LeaseGuard for RedisLeaseGuard {
    async fn renew(&mut self, ttl: Duration) -> AppResult<bool> {
        match &self.0 {
            Some(lock) => lock.extend(ttl.as_secs().max(1)).await,
            None => Ok(false),
        }
    }

    async fn release(&mut self) -> AppResult<()> {
        match self.0.take() {
            Some(lock) => lock.release().await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DispatchLease for RedisLease {
    async fn try_acquire(&self) -> AppResult<Option<Box<dyn LeaseGuard>>> {
        let lock = self
            .cache
            .try_acquire_lock(DISPATCH_LOCK_RESOURCE, self.ttl.as_secs().max(1))
            .await?;
        Ok(lock.map(|lock| Box::new(RedisLeaseGuard(Some(lock))) as Box<dyn LeaseGuard>))
    }
}

// =============================================================================
// Layered
// =============================================================================

/// A shared lease taken only while an in-process lease is held.
pub struct LayeredLease {
    local: LocalLease,
    shared: Arc<dyn DispatchLease>,
}

impl LayeredLease {
    pub fn new(shared: Arc<dyn DispatchLease>) -> Self {
        Self {
            local: LocalLease::new(),
            shared,
        }
    }
}

struct LayeredLeaseGuard {
    local: Box<dyn LeaseGuard>,
    shared: Box<dyn LeaseGuard>,
}

#[async_trait]
impl LeaseGuard for LayeredLeaseGuard {
    async fn renew(&mut self, ttl: Duration) -> AppResult<bool> {
        self.shared.renew(ttl).await
    }

    async fn release(&mut self) -> AppResult<()> {
        let shared = self.shared.release().await;
        self.local.release().await?;
        shared
    }
}

#[async_trait]
impl DispatchLease for LayeredLease {
    async fn try_acquire(&self) -> AppResult<Option<Box<dyn LeaseGuard>>> {
        let Some(local) = self.local.try_acquire().await? else {
            return Ok(None);
        };
        // Dropping `local` on the early returns frees the in-process lease.
        let Some(shared) = self.shared.try_acquire().await? else {
            return Ok(None);
        };
        Ok(Some(Box::new(LayeredLeaseGuard { local, shared })))
    }
}
