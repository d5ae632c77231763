//! Fixed-window request limiting per client and endpoint kind.
//!
//! A [`RateLimitStore`] is a counter with a time-to-live per key; the
//! [`RateLimiter`] maps `(client, EndpointKind)` onto store keys and turns counts
//! into [`RateLimitDecision`]s. Callers [`check`](RateLimiter::check) before doing
//! the work and [`record`](RateLimiter::record) after it succeeded, so failed
//! requests do not use up the budget.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Entries are swept once the map grows past this size.
const SWEEP_THRESHOLD: usize = 4096;

/// Which budget a request draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    /// Article fetch + structure
    Parse,
    /// Word gloss or sentence translation
    Lookup,
}

impl EndpointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::Parse => "parse",
            EndpointKind::Lookup => "lookup",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `max_requests` per `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimit {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self { max_requests, window }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub parse: RateLimit,
    pub lookup: RateLimit,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            parse: RateLimit::new(10, Duration::from_secs(60)),
            lookup: RateLimit::new(60, Duration::from_secs(60)),
        }
    }
}

impl RateLimitConfig {
    pub fn limit_for(&self, kind: EndpointKind) -> RateLimit {
        match kind {
            EndpointKind::Parse => self.parse,
            EndpointKind::Lookup => self.lookup,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the current window.
    pub remaining: u32,
}

/// Counter with time-to-live, keyed by string.
///
/// Implementations must make `hit` atomic: concurrent hits on one key never
/// lose an increment.
pub trait RateLimitStore: Send + Sync {
    /// Increment the counter for `key` and return the new count. A key with no
    /// live window starts a fresh one that expires after `ttl`.
    fn hit(&self, key: &str, ttl: Duration) -> u32;

    /// Count in the live window for `key`, 0 when there is none.
    fn peek(&self, key: &str) -> u32;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    expires_at: Instant,
}

/// In-process [`RateLimitStore`] behind a mutex.
#[derive(Debug, Default)]
pub struct MemoryRateLimitStore {
    windows: Mutex<HashMap<String, Window>>,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn hit_at(&self, key: &str, ttl: Duration, now: Instant) -> u32 {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if windows.len() > SWEEP_THRESHOLD {
            windows.retain(|_, window| window.expires_at > now);
        }

        let window = windows.entry(key.to_string()).or_insert(Window { count: 0, expires_at: now + ttl });
        if window.expires_at <= now {
            *window = Window { count: 0, expires_at: now + ttl };
        }
        window.count = window.count.saturating_add(1);
        window.count
    }

    fn peek_at(&self, key: &str, now: Instant) -> u32 {
        let windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        windows.get(key).filter(|window| window.expires_at > now).map_or(0, |window| window.count)
    }
}

impl RateLimitStore for MemoryRateLimitStore {
    fn hit(&self, key: &str, ttl: Duration) -> u32 {
        self.hit_at(key, ttl, Instant::now())
    }

    fn peek(&self, key: &str) -> u32 {
        self.peek_at(key, Instant::now())
    }
}

/// Applies [`RateLimitConfig`] on top of a store.
#[derive(Debug, Default)]
pub struct RateLimiter<S = MemoryRateLimitStore> {
    store: S,
    config: RateLimitConfig,
}

impl<S: RateLimitStore> RateLimiter<S> {
    pub fn new(store: S, config: RateLimitConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Would one more request from `client` be allowed? Does not count it.
    pub fn check(&self, client: &str, kind: EndpointKind) -> RateLimitDecision {
        let limit = self.config.limit_for(kind);
        let used = self.store.peek(&key(client, kind));
        RateLimitDecision { allowed: used < limit.max_requests, remaining: limit.max_requests.saturating_sub(used) }
    }

    /// Count one request from `client`.
    pub fn record(&self, client: &str, kind: EndpointKind) -> RateLimitDecision {
        let limit = self.config.limit_for(kind);
        let used = self.store.hit(&key(client, kind), limit.window);
        let decision =
            RateLimitDecision { allowed: used <= limit.max_requests, remaining: limit.max_requests.saturating_sub(used) };
        tracing::trace!(client, kind = %kind, used, remaining = decision.remaining, "recorded request");
        decision
    }
}

fn key(client: &str, kind: EndpointKind) -> String {
    format!("ratelimit:{}:{}", kind, client)
}
