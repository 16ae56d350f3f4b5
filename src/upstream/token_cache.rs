// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! TTL-based access token caching
//!
//! The cache is a plain object owned by the client that uses it. Time comes
//! from an injected [`Clock`] so expiry can be driven explicitly in tests.

use std::sync::{Mutex, RwLock};
use std::time::{Duration, Instant};

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by `Instant::now`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.lock().map(|now| *now).unwrap_or_else(|e| *e.into_inner())
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Cache for a single upstream access token
pub struct AccessTokenCache<C: Clock = SystemClock> {
    clock: C,
    ttl: Duration,
    entry: RwLock<Option<CachedToken>>,
}

impl<C: Clock> AccessTokenCache<C> {
    /// Create a cache on an explicit clock
    pub fn with_clock(clock: C, ttl: Duration) -> Self {
        Self {
            clock,
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Cached token, if present and unexpired
    pub fn get(&self) -> Option<String> {
        let entry = self.entry.read().ok()?;
        let cached = entry.as_ref()?;

        if self.clock.now() >= cached.expires_at {
            return None; // Expired
        }

        Some(cached.token.clone())
    }

    /// Store a token, expiring `ttl` from now
    pub fn insert(&self, token: String) {
        let expires_at = self.clock.now() + self.ttl;
        if let Ok(mut entry) = self.entry.write() {
            *entry = Some(CachedToken { token, expires_at });
        }
    }

    /// Return the cached token or fetch, store and return a fresh one
    pub fn get_or_refresh<E, F>(&self, refresh: F) -> Result<String, E>
    where
        F: FnOnce() -> Result<String, E>,
    {
        if let Some(token) = self.get() {
            return Ok(token);
        }

        let token = refresh()?;
        self.insert(token.clone());
        tracing::debug!(ttl_secs = self.ttl.as_secs(), "🔑 Upstream access token refreshed");
        Ok(token)
    }

    /// Drop the cached token (e.g. after the upstream rejects it)
    pub fn invalidate(&self) {
        if let Ok(mut entry) = self.entry.write() {
            *entry = None;
        }
    }
}
