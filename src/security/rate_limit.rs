//! Fixed-window rate limiting.
//!
//! One counter per identifier (`"auth:<ip>"`, `"chat:<ip>"`). Bursts at window
//! boundaries are possible; each check is O(1).
//!
//! Counters live in this process only. Horizontal scaling gives every
//! instance its own budget.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;

use crate::auth::now_ms;
use crate::config::RatePolicy;
use crate::observability::metrics;

/// Counter state for one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    /// Epoch milliseconds after which the window is over.
    pub window_reset_at: u64,
}

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_in_secs: u64,
}

/// Process-wide store of rate-limit counters.
///
/// Constructed once at startup and shared through `Arc`. Each check holds the
/// entry's shard lock for the whole read-modify-write, so concurrent requests
/// for one identifier cannot lose updates.
#[derive(Debug, Default)]
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check and count a request against the current time.
    pub fn check(&self, identifier: &str, policy: RatePolicy) -> RateLimitDecision {
        self.check_at(identifier, policy, now_ms())
    }

    /// Check and count a request at `now_ms`.
    pub fn check_at(&self, identifier: &str, policy: RatePolicy, now_ms: u64) -> RateLimitDecision {
        let fresh_window = RateLimitEntry {
            count: 1,
            window_reset_at: now_ms.saturating_add(policy.window_ms),
        };
        let fresh_decision = RateLimitDecision {
            allowed: true,
            remaining: policy.max_requests.saturating_sub(1),
            reset_in_secs: ceil_secs(policy.window_ms),
        };

        match self.entries.entry(identifier.to_string()) {
            Entry::Vacant(vacant) => {
                vacant.insert(fresh_window);
                fresh_decision
            }
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if now_ms > entry.window_reset_at {
                    *entry = fresh_window;
                    return fresh_decision;
                }

                entry.count = entry.count.saturating_add(1);
                let reset_in_secs = ceil_secs(entry.window_reset_at - now_ms);

                if entry.count > policy.max_requests {
                    RateLimitDecision {
                        allowed: false,
                        remaining: 0,
                        reset_in_secs,
                    }
                } else {
                    RateLimitDecision {
                        allowed: true,
                        remaining: policy.max_requests - entry.count,
                        reset_in_secs,
                    }
                }
            }
        }
    }

    /// Snapshot of one identifier's counter.
    pub fn entry(&self, identifier: &str) -> Option<RateLimitEntry> {
        self.entries.get(identifier).map(|entry| *entry)
    }

    /// Number of tracked identifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries whose window ended before `now_ms`. Returns how many were removed.
    ///
    /// Locks one shard at a time.
    pub fn sweep_expired_at(&self, now_ms: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| now_ms <= entry.window_reset_at);
        before.saturating_sub(self.entries.len())
    }

    /// Spawn the periodic sweep. The task exits when `shutdown` fires.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        every: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            tracing::info!(interval_secs = every.as_secs(), "Rate limit sweeper starting");

            let mut ticker = time::interval(every);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = limiter.sweep_expired_at(now_ms());
                        metrics::record_rate_limit_entries(limiter.len());
                        tracing::debug!(removed, remaining = limiter.len(), "Swept expired rate limit entries");
                    }
                    _ = shutdown.recv() => {
                        tracing::info!("Rate limit sweeper received shutdown signal, exiting loop");
                        break;
                    }
                }
            }
        })
    }
}

fn ceil_secs(ms: u64) -> u64 {
    ms.div_ceil(1000)
}
