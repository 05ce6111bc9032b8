//! Response cache shared by the storefront calls.
//!
//! Mirrors the aggregator-side caching contract: entries are keyed by HTTP
//! method plus URL, expire after one day, and only allow-listed status codes
//! and methods are stored. 400 is deliberately on the allow list, so a failed
//! search or cart-add is replayed on retry within the window instead of
//! re-querying the vendor.

use crate::gobilda::models::StoreResponse;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Which responses may be stored, and for how long.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    pub expire_after: Duration,
    pub allowable_codes: Vec<u16>,
    pub allowable_methods: Vec<&'static str>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            expire_after: Duration::from_secs(24 * 60 * 60),
            allowable_codes: vec![200, 400],
            allowable_methods: vec!["GET", "POST"],
        }
    }
}

impl CachePolicy {
    /// True when a response with this method and status may be stored.
    pub fn cacheable(&self, method: &str, status: u16) -> bool {
        self.allowable_methods.iter().any(|m| *m == method)
            && self.allowable_codes.contains(&status)
    }
}

struct Entry {
    response: StoreResponse,
    stored_at: Instant,
}

/// In-memory response cache. One per client; no persistence.
pub struct ResponseCache {
    policy: CachePolicy,
    entries: Mutex<HashMap<(String, String), Entry>>,
}

impl ResponseCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self { policy, entries: Mutex::new(HashMap::new()) }
    }

    /// Returns the cached response for this method+URL, evicting it first
    /// if it has outlived the expiry window.
    pub fn get(&self, method: &str, url: &str) -> Option<StoreResponse> {
        let key = (method.to_string(), url.to_string());
        let mut entries = self.entries.lock().unwrap();

        match entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() < self.policy.expire_after => {
                debug!("cache hit: {} {}", method, url);
                Some(entry.response.clone())
            }
            Some(_) => {
                debug!("cache expired: {} {}", method, url);
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Stores the response if the policy allows its method and status.
    pub fn store(&self, method: &str, url: &str, response: &StoreResponse) {
        if !self.policy.cacheable(method, response.status) {
            return;
        }
        debug!("cache store: {} {} ({})", method, url, response.status);
        let key = (method.to_string(), url.to_string());
        self.entries
            .lock()
            .unwrap()
            .insert(key, Entry { response: response.clone(), stored_at: Instant::now() });
    }
}
