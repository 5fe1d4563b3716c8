//! Rate limiter orchestrator
//!
//! Per call the limiter is in one of four states:
//!
//! | State | Behaviour |
//! |---|---|
//! | disabled | admits without touching any counter |
//! | enabled, no backend | in-process counters only |
//! | enabled, backend | Redis counters |
//! | backend degraded | Redis failed for *this* call; in-process counters decide it |
//!
//! Degradation is not sticky. Every call tries the backend again, so the
//! limiter recovers on its own once Redis is reachable. While degraded each
//! process enforces its own quota, which lets the fleet admit up to
//! `processes x max_count` per window.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::error::RateLimitError;
use super::key::bucket_key;
use super::memory::MemoryCounterStore;
use super::policy::RateLimitPolicy;
use super::redis_store::{DEFAULT_BACKEND_TIMEOUT, RedisCounterStore, sanitize_url};
use super::{RateLimitDecision, RateLimitStore};

/// How often the background task sweeps expired in-process counters
pub const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Runtime switches of the limiter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitSettings {
    /// Global switch; when off, `enforce` is a no-op
    pub enabled: bool,
    /// Shared backend target (`redis://...`); `None` means in-process only
    pub backend_url: Option<String>,
    /// Bound on each backend round trip
    pub backend_timeout: Duration,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            backend_url: None,
            backend_timeout: DEFAULT_BACKEND_TIMEOUT,
        }
    }
}

impl RateLimitSettings {
    /// Enabled, in-process counters only
    pub fn local() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Enabled, counting in the backend at `url`
    pub fn with_backend(url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            backend_url: Some(url.into()),
            ..Self::default()
        }
    }

    fn backend_target(&self) -> Option<&str> {
        self.backend_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

struct LimiterState {
    settings: Arc<RateLimitSettings>,
    backend: Option<Arc<RedisCounterStore>>,
}

/// Process-wide rate limiter.
///
/// Built once by the composition root and shared with handlers through
/// `Arc`. The lock guards settings and the cached backend client only and
/// is never held across a network call.
pub struct RateLimiter {
    state: Mutex<LimiterState>,
    local: MemoryCounterStore,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: RateLimitSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(LimiterState {
                settings: Arc::new(settings),
                backend: None,
            }),
            local: MemoryCounterStore::new(),
            clock,
        }
    }

    pub fn settings(&self) -> Arc<RateLimitSettings> {
        Arc::clone(&self.state.lock().settings)
    }

    /// Replace the runtime settings. A cached backend client survives only
    /// if the new settings still point at the same target.
    pub fn update_settings(&self, settings: RateLimitSettings) {
        let mut state = self.state.lock();
        let keep_backend = match (&state.backend, settings.backend_target()) {
            (Some(store), Some(target)) => store.target() == target,
            _ => false,
        };
        if !keep_backend {
            state.backend = None;
        }
        state.settings = Arc::new(settings);
    }

    /// Return the cached backend client for `target`, building a new one if
    /// none is cached or the cached one points elsewhere.
    pub fn connect_or_reuse(
        &self,
        target: &str,
        timeout: Duration,
    ) -> Result<Arc<RedisCounterStore>, RateLimitError> {
        let mut state = self.state.lock();
        if let Some(store) = &state.backend {
            if store.target() == target {
                return Ok(Arc::clone(store));
            }
        }

        let store = Arc::new(RedisCounterStore::open(target, timeout)?);
        info!(
            target = %sanitize_url(target),
            "Rate limit backend client created"
        );
        state.backend = Some(Arc::clone(&store));
        Ok(store)
    }

    /// Count this request for `(endpoint, client)` under `policy`.
    ///
    /// ## Returns
    /// * `Ok(())` - the request may proceed
    /// * `Err(RateLimitError::Exceeded)` - the client is over its budget
    /// * `Err(RateLimitError::InvalidPolicy | InvalidBackendUrl)` - misconfiguration
    ///
    /// Backend outages never surface here; they degrade to in-process
    /// counting for the current call.
    pub async fn enforce(
        &self,
        endpoint: &str,
        client_identity: Option<&str>,
        policy: &str,
    ) -> Result<(), RateLimitError> {
        let settings = self.settings();
        if !settings.enabled {
            return Ok(());
        }

        let policy = RateLimitPolicy::parse(policy)?;
        let key = bucket_key(
            endpoint,
            client_identity,
            self.clock.now_ms(),
            policy.window_secs(),
        );

        let decision = self.count(&key, &policy, &settings).await?;
        if decision.allowed {
            Ok(())
        } else {
            debug!(
                endpoint,
                key = %key,
                count = decision.count,
                max = policy.max_requests(),
                "Rate limit exceeded"
            );
            Err(RateLimitError::Exceeded)
        }
    }

    async fn count(
        &self,
        key: &str,
        policy: &RateLimitPolicy,
        settings: &RateLimitSettings,
    ) -> Result<RateLimitDecision, RateLimitError> {
        let Some(target) = settings.backend_target() else {
            return Ok(self.count_locally(key, policy));
        };

        let store = self.connect_or_reuse(target, settings.backend_timeout)?;
        match store.increment_and_check(key, policy).await {
            Ok(decision) => Ok(decision),
            Err(e) => {
                warn!(
                    error = %e,
                    key,
                    "Rate limit backend unavailable, falling back to in-memory limiting"
                );
                Ok(self.count_locally(key, policy))
            }
        }
    }

    fn count_locally(&self, key: &str, policy: &RateLimitPolicy) -> RateLimitDecision {
        self.local
            .increment_and_check(key, policy, self.clock.now_ms())
    }

    /// Clear every in-process counter and forget the cached backend client.
    /// Settings are kept. Safe to call at any time.
    pub fn reset(&self) {
        self.state.lock().backend = None;
        self.local.clear();
    }

    /// Drop in-process counters whose window has ended.
    pub fn purge_expired(&self) -> usize {
        self.local.purge_expired(self.clock.now_ms())
    }

    /// Sweep expired in-process counters every `every`, off the request path.
    ///
    /// The task holds a weak reference and stops once the limiter is dropped.
    pub fn spawn_purge_task(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let limiter = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(limiter) = limiter.upgrade() else {
                    break;
                };
                let purged = limiter.purge_expired();
                if purged > 0 {
                    debug!(purged, "Purged expired rate limit counters");
                }
            }
        })
    }

    pub fn local_store(&self) -> &MemoryCounterStore {
        &self.local
    }

    pub fn has_cached_backend(&self) -> bool {
        self.state.lock().backend.is_some()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RateLimiter")
            .field("enabled", &state.settings.enabled)
            .field("backend", &state.backend)
            .field("local_entries", &self.local.len())
            .finish()
    }
}
