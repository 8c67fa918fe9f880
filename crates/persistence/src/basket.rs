//! The TTL-bounded key-value basket store.
//!
//! Baskets are serialized to their JSON wire form and kept under their own
//! ID with an absolute expiration; the serialized form is the sole durable
//! representation and lookup is exclusively by key. The store is independent
//! of the relational components - basket, order, and payment operations use
//! it directly, never through the unit of work.
//!
//! Writes are last-writer-wins at the granularity of a single key. Sequences
//! that read a basket, amend it, and write it back (re-pricing items before
//! payment, for instance) must go through [`BasketStore::modify`], which
//! serializes them behind a per-key lock so a concurrent update is never
//! silently overwritten.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;
use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use orchard_core::models::basket::CustomerBasket;

use crate::error::BasketError;

/// How long a basket lives when the caller does not say otherwise.
pub const DEFAULT_BASKET_TTL: Duration = Duration::from_secs(5 * 60 * 60);

const MAX_BASKETS: u64 = 100_000;

/// A stored basket: its JSON wire form plus the TTL it was written with.
#[derive(Clone)]
struct CachedBasket {
    json: String,
    ttl: Duration,
}

/// Per-entry expiration: every write restarts the entry's own TTL window.
struct BasketExpiry;

impl Expiry<String, CachedBasket> for BasketExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedBasket,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedBasket,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Key-value store for customer baskets with per-entry TTLs.
///
/// Cheaply cloneable; clones share the same entries and per-key locks.
#[derive(Clone)]
pub struct BasketStore {
    cache: Cache<String, CachedBasket>,
    locks: Arc<StdMutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl BasketStore {
    /// Create an empty basket store.
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_BASKETS)
            .expire_after(BasketExpiry)
            .build();

        Self {
            cache,
            locks: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    /// Serialize `basket` and store it under its own ID.
    ///
    /// Every write restarts the TTL window; `None` means the 5-hour default.
    /// The write is confirmed by an immediate read-back so a silently dropped
    /// write surfaces here rather than at checkout, and the stored basket is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `BasketError::Serialization` if the basket cannot be
    /// serialized, or `BasketError::WriteNotVisible` if the read-back finds
    /// nothing.
    pub async fn create_or_update(
        &self,
        basket: &CustomerBasket,
        ttl: Option<Duration>,
    ) -> Result<CustomerBasket, BasketError> {
        let ttl = ttl.unwrap_or(DEFAULT_BASKET_TTL);
        let json = serde_json::to_string(basket)?;

        debug!(key = %basket.id, ttl_secs = ttl.as_secs(), "storing basket");
        self.cache
            .insert(basket.id.clone(), CachedBasket { json, ttl })
            .await;

        self.get(&basket.id)
            .await?
            .ok_or_else(|| BasketError::WriteNotVisible(basket.id.clone()))
    }

    /// The basket stored under `key`.
    ///
    /// A missing or expired key is `Ok(None)`, never an error.
    ///
    /// # Errors
    ///
    /// Returns `BasketError::Serialization` if the stored value does not
    /// deserialize.
    pub async fn get(&self, key: &str) -> Result<Option<CustomerBasket>, BasketError> {
        match self.cache.get(key).await {
            Some(cached) => Ok(Some(serde_json::from_str(&cached.json)?)),
            None => Ok(None),
        }
    }

    /// Remove `key`, reporting whether a live basket was actually present.
    ///
    /// An entry past its TTL counts as absent.
    pub async fn delete(&self, key: &str) -> bool {
        // `get` applies the expiry check; `invalidate` alone would report
        // expired-but-unevicted entries as present.
        let present = self.cache.get(key).await.is_some();
        self.cache.invalidate(key).await;
        if present {
            debug!(key, "basket deleted");
        }
        present
    }

    /// Read-modify-write under a per-key lock.
    ///
    /// Loads the basket under `key`, applies `mutate`, and writes the result
    /// back with a fresh TTL window. Concurrent calls for the same key
    /// serialize, so neither update is lost. Returns `Ok(None)` when there is
    /// no basket to modify.
    ///
    /// # Errors
    ///
    /// Propagates serialization and read-back failures from the underlying
    /// read and write.
    pub async fn modify<F>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        mutate: F,
    ) -> Result<Option<CustomerBasket>, BasketError>
    where
        F: FnOnce(&mut CustomerBasket),
    {
        let lock = self.key_lock(key);
        let _guard = lock.lock().await;

        let Some(mut basket) = self.get(key).await? else {
            return Ok(None);
        };
        mutate(&mut basket);
        self.create_or_update(&basket, ttl).await.map(Some)
    }

    /// The lock for `key`, created on first use.
    ///
    /// Lock entries live for the lifetime of the store; the set of keys is
    /// bounded by the set of customers, so the map stays small.
    fn key_lock(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            locks
                .entry(key.to_owned())
                .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
        )
    }
}

impl Default for BasketStore {
    fn default() -> Self {
        Self::new()
    }
}
