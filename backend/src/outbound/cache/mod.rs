//! In-process isochrone response cache.
//!
//! Entries expire `ttl` after insertion and are dropped lazily on lookup.
//! When an insert would exceed `max_entries`, expired entries are purged
//! first and then the oldest entries are evicted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::debug;

use crate::domain::IsochroneResponse;
use crate::domain::ports::{IsochroneCache, IsochroneCacheError, IsochroneCacheKey};

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Default capacity.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Retention policy for [`InMemoryIsochroneCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    ttl: Duration,
    max_entries: usize,
}

impl CachePolicy {
    /// Build a policy. A capacity of zero is raised to one.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use isochrone_backend::outbound::cache::CachePolicy;
    ///
    /// let policy = CachePolicy::new(Duration::from_secs(60), 0);
    /// assert_eq!(policy.max_entries(), 1);
    /// ```
    #[must_use]
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    /// Entry lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub const fn max_entries(&self) -> usize {
        self.max_entries
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_MAX_ENTRIES)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    response: IsochroneResponse,
    created_at: DateTime<Utc>,
}

/// Mutex-guarded map implementing the [`IsochroneCache`] port.
pub struct InMemoryIsochroneCache {
    entries: Mutex<HashMap<IsochroneCacheKey, CacheEntry>>,
    policy: CachePolicy,
    clock: Arc<dyn Clock>,
}

impl InMemoryIsochroneCache {
    /// Create an empty cache reading time from `clock`.
    pub fn new(policy: CachePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            policy,
            clock,
        }
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> Result<usize, IsochroneCacheError> {
        Ok(self.lock()?.len())
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> Result<bool, IsochroneCacheError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<IsochroneCacheKey, CacheEntry>>, IsochroneCacheError> {
        self.entries
            .lock()
            .map_err(|_| IsochroneCacheError::backend("isochrone cache lock poisoned"))
    }

    fn is_expired(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        let age = now
            .signed_duration_since(entry.created_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        age >= self.policy.ttl
    }

    fn make_room(&self, entries: &mut HashMap<IsochroneCacheKey, CacheEntry>, now: DateTime<Utc>) {
        let limit = self.policy.max_entries;
        if entries.len() < limit {
            return;
        }
        entries.retain(|_, entry| !self.is_expired(entry, now));
        while entries.len() >= limit {
            let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.created_at)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            debug!(key = %oldest, "evicting oldest isochrone cache entry");
            entries.remove(&oldest);
        }
    }
}

#[async_trait]
impl IsochroneCache for InMemoryIsochroneCache {
    async fn get(
        &self,
        key: &IsochroneCacheKey,
    ) -> Result<Option<IsochroneResponse>, IsochroneCacheError> {
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        let Some(entry) = entries.get(key) else {
            return Ok(None);
        };
        if !self.is_expired(entry, now) {
            return Ok(Some(entry.response.clone()));
        }
        debug!(%key, "dropping expired isochrone cache entry");
        entries.remove(key);
        Ok(None)
    }

    async fn put(
        &self,
        key: &IsochroneCacheKey,
        response: &IsochroneResponse,
    ) -> Result<(), IsochroneCacheError> {
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        if !entries.contains_key(key) {
            self.make_room(&mut entries, now);
        }
        entries.insert(
            key.clone(),
            CacheEntry {
                response: response.clone(),
                created_at: now,
            },
        );
        Ok(())
    }
}
