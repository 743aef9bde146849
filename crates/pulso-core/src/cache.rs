//! TTL memoization at the provider boundary.
//!
//! [`CachedSource`] wraps any provider and keys entries by endpoint plus
//! arguments. Values are stored as JSON text so one store can hold every
//! endpoint's payload type. Errors are never cached.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data_source::{
    DailyClosesRequest, HeadlineRequest, HeadlineSource, Lookback, MarketDataSource, SourceError,
    SourceFuture,
};
use crate::{CorporateAction, FundamentalsSnapshot, HeadlineRecord, PriceSeries, Symbol};

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    expires_at: Instant,
}

/// Thread-safe in-memory TTL store.
#[derive(Debug, Clone, Default)]
pub struct CacheStore {
    entries: Arc<tokio::sync::RwLock<HashMap<String, CacheEntry>>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body stored under `key` if present and not expired.
    pub async fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        let body = entries
            .get(key)
            .filter(|entry| Instant::now() <= entry.expires_at)
            .map(|entry| entry.body.clone());

        let counter = if body.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        body
    }

    /// Stores `body` for `ttl`; a zero TTL stores nothing. Expired entries
    /// are evicted on every write.
    pub async fn put(&self, key: String, body: String, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key,
            CacheEntry {
                body,
                expires_at: now + ttl,
            },
        );
    }

    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let body = self.get(key).await?;
        match serde_json::from_str(&body) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(key, %error, "discarding undecodable cache entry");
                None
            }
        }
    }

    pub async fn put_json<T: Serialize>(&self, key: String, value: &T, ttl: Duration) {
        match serde_json::to_string(value) {
            Ok(body) => self.put(key, body, ttl).await,
            Err(error) => warn!(key = %key, %error, "skipping cache write"),
        }
    }

    /// Number of entries, including expired ones not yet cleared.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Time-to-live per endpoint family, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheTtls {
    /// Two-session basket used for the mover board.
    pub market_secs: u64,
    pub headlines_secs: u64,
    /// Corporate actions, last price and fundamentals.
    pub fundamentals_secs: u64,
    /// Long daily history.
    pub history_secs: u64,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            market_secs: 300,
            headlines_secs: 600,
            fundamentals_secs: 4 * 60 * 60,
            history_secs: 12 * 60 * 60,
        }
    }
}

impl CacheTtls {
    /// All zero; every call goes to the provider.
    pub const fn disabled() -> Self {
        Self {
            market_secs: 0,
            headlines_secs: 0,
            fundamentals_secs: 0,
            history_secs: 0,
        }
    }
}

/// Provider wrapper that memoizes successful responses.
pub struct CachedSource<S> {
    inner: S,
    store: CacheStore,
    ttls: CacheTtls,
}

impl<S> CachedSource<S> {
    pub fn new(inner: S, ttls: CacheTtls) -> Self {
        Self {
            inner,
            store: CacheStore::new(),
            ttls,
        }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn memoize<T, F, Fut>(&self, key: String, ttl_secs: u64, fetch: F) -> Result<T, SourceError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, SourceError>>,
    {
        if let Some(value) = self.store.get_json::<T>(&key).await {
            debug!(key = %key, "cache hit");
            return Ok(value);
        }

        let value = fetch().await?;
        self.store
            .put_json(key, &value, Duration::from_secs(ttl_secs))
            .await;
        Ok(value)
    }
}

impl<S: MarketDataSource> MarketDataSource for CachedSource<S> {
    fn daily_closes<'a>(&'a self, req: DailyClosesRequest) -> SourceFuture<'a, Vec<PriceSeries>> {
        Box::pin(async move {
            let symbols = req
                .symbols
                .iter()
                .map(Symbol::as_str)
                .collect::<Vec<_>>()
                .join(",");
            let key = format!("closes:{}:{}", req.lookback.as_key(), symbols);
            let ttl = match req.lookback {
                Lookback::TwoDays => self.ttls.market_secs,
                _ => self.ttls.history_secs,
            };
            self.memoize(key, ttl, || self.inner.daily_closes(req)).await
        })
    }

    fn corporate_actions<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Vec<CorporateAction>> {
        Box::pin(async move {
            let key = format!("actions:{symbol}");
            self.memoize(key, self.ttls.fundamentals_secs, || self.inner.corporate_actions(symbol))
                .await
        })
    }

    fn fundamentals<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, FundamentalsSnapshot> {
        Box::pin(async move {
            let key = format!("fundamentals:{symbol}");
            self.memoize(key, self.ttls.fundamentals_secs, || self.inner.fundamentals(symbol))
                .await
        })
    }

    fn last_price<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Option<f64>> {
        Box::pin(async move {
            let key = format!("last_price:{symbol}");
            self.memoize(key, self.ttls.fundamentals_secs, || self.inner.last_price(symbol))
                .await
        })
    }
}

impl<S: HeadlineSource> HeadlineSource for CachedSource<S> {
    fn headlines<'a>(&'a self, req: HeadlineRequest) -> SourceFuture<'a, Vec<HeadlineRecord>> {
        Box::pin(async move {
            let key = format!("headlines:{}:{}", req.limit, req.query);
            self.memoize(key, self.ttls.headlines_secs, || self.inner.headlines(req))
                .await
        })
    }
}
