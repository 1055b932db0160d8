//! TTL-cached configuration loading.
//!
//! # Design Decisions
//! - One cache slot guarded by a mutex; concurrent requests share the same
//!   `Arc<GatewayConfiguration>` until the TTL lapses
//! - A failed reload empties the slot and surfaces as `None`; the
//!   dispatcher turns that into a 500

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::schema::GatewayConfiguration;
use crate::config::store::SecretStore;
use crate::error::ConfigError;

/// How long a fetched configuration stays valid.
pub const CONFIG_TTL: Duration = Duration::from_secs(300);

struct CacheEntry {
    config: Arc<GatewayConfiguration>,
    fetched_at: Instant,
}

/// Caching loader in front of the secret store.
pub struct ConfigCache {
    store: Arc<dyn SecretStore>,
    path: String,
    ttl: Duration,
    slot: Mutex<Option<CacheEntry>>,
}

impl ConfigCache {
    pub fn new(store: Arc<dyn SecretStore>, path: impl Into<String>) -> Self {
        Self {
            store,
            path: path.into(),
            ttl: CONFIG_TTL,
            slot: Mutex::new(None),
        }
    }

    /// Fetch the configuration from the store, bypassing the cache.
    pub fn load(&self) -> Result<GatewayConfiguration, ConfigError> {
        let params = self.store.fetch(&self.path)?;
        GatewayConfiguration::from_params(&params)
    }

    /// Return the cached configuration, reloading it when stale.
    ///
    /// `None` means the reload failed and the request cannot proceed.
    pub fn cached_load(&self) -> Option<Arc<GatewayConfiguration>> {
        self.cached_load_at(Instant::now())
    }

    fn cached_load_at(&self, now: Instant) -> Option<Arc<GatewayConfiguration>> {
        let mut slot = self.slot.lock().expect("config cache mutex poisoned");

        if let Some(entry) = slot.as_ref() {
            if now.duration_since(entry.fetched_at) < self.ttl {
                return Some(entry.config.clone());
            }
        }

        match self.load() {
            Ok(config) => {
                let config = Arc::new(config);
                *slot = Some(CacheEntry {
                    config: config.clone(),
                    fetched_at: now,
                });
                Some(config)
            }
            Err(e) => {
                tracing::error!(path = %self.path, error = %e, "Configuration reload failed");
                *slot = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{
        KEY_ALEXA_SECRET, KEY_CF_CLIENT_ID, KEY_CF_CLIENT_SECRET, KEY_HA_BASE_URL,
    };
    use crate::config::store::MemoryStore;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStore {
        inner: MemoryStore,
        fetches: AtomicUsize,
    }

    impl SecretStore for CountingStore {
        fn fetch(&self, path: &str) -> Result<BTreeMap<String, String>, ConfigError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch(path)
        }
    }

    fn valid_params() -> BTreeMap<String, String> {
        BTreeMap::from([
            (KEY_HA_BASE_URL.to_string(), "https://ha.example.com".to_string()),
            (KEY_ALEXA_SECRET.to_string(), "s".to_string()),
            (KEY_CF_CLIENT_ID.to_string(), "id".to_string()),
            (KEY_CF_CLIENT_SECRET.to_string(), "cs".to_string()),
        ])
    }

    #[test]
    fn test_cached_load_serves_from_cache_within_ttl() {
        let store = Arc::new(CountingStore {
            inner: MemoryStore::new(valid_params()),
            fetches: AtomicUsize::new(0),
        });
        let cache = ConfigCache::new(store.clone(), "/app/config");

        let first = cache.cached_load().expect("load");
        let second = cache.cached_load().expect("load");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cached_load_refreshes_after_ttl() {
        let store = Arc::new(CountingStore {
            inner: MemoryStore::new(valid_params()),
            fetches: AtomicUsize::new(0),
        });
        let cache = ConfigCache::new(store.clone(), "/app/config");

        let start = Instant::now();
        cache.cached_load_at(start).expect("load");
        cache.cached_load_at(start + Duration::from_secs(299)).expect("load");
        assert_eq!(store.fetches.load(Ordering::SeqCst), 1);

        cache.cached_load_at(start + Duration::from_secs(301)).expect("load");
        assert_eq!(store.fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cached_load_returns_none_on_invalid_config() {
        let mut params = valid_params();
        params.remove(KEY_CF_CLIENT_ID);
        let cache = ConfigCache::new(Arc::new(MemoryStore::new(params)), "/app/config");
        assert!(cache.cached_load().is_none());
    }
}
