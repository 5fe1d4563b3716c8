//! In-process counter store
//!
//! Used when no shared backend is configured, and for any single call
//! whose shared backend request failed.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::RateLimitDecision;
use super::policy::RateLimitPolicy;

#[derive(Debug, Clone, Copy)]
struct CounterEntry {
    count: u64,
    expires_at_ms: i64,
}

/// Thread-safe map of fixed-window counters.
///
/// The bucket index is part of every key, so a key is never reused once its
/// window ends. Stale entries are not swept on the request path; the owner
/// must call [`MemoryCounterStore::purge_expired`] periodically (see
/// `RateLimiter::spawn_purge_task`) or the map grows with every window.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    entries: Mutex<HashMap<String, CounterEntry>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request against `key` at time `now_ms`.
    ///
    /// The expiry check, increment and write-back happen under one lock so
    /// concurrent callers can never both observe a stale count.
    pub fn increment_and_check(
        &self,
        key: &str,
        policy: &RateLimitPolicy,
        now_ms: i64,
    ) -> RateLimitDecision {
        let fresh = CounterEntry {
            count: 0,
            expires_at_ms: now_ms + policy.window_ms(),
        };

        let count = {
            let mut entries = self.entries.lock();
            let entry = entries.entry(key.to_owned()).or_insert(fresh);
            if entry.expires_at_ms <= now_ms {
                *entry = fresh;
            }
            entry.count += 1;
            entry.count
        };

        RateLimitDecision::from_count(count, policy)
    }

    /// Drop entries whose window has ended. Not used on the request path.
    pub fn purge_expired(&self, now_ms: i64) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at_ms > now_ms);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn policy(max: u32) -> RateLimitPolicy {
        RateLimitPolicy::new(max, 60).unwrap()
    }

    #[test]
    fn test_admits_up_to_max_then_denies() {
        let store = MemoryCounterStore::new();
        let policy = policy(3);

        for expected in 1..=3 {
            let decision = store.increment_and_check("k", &policy, 0);
            assert!(decision.allowed);
            assert_eq!(decision.count, expected);
        }

        let denied = store.increment_and_check("k", &policy, 0);
        assert!(!denied.allowed);
        assert_eq!(denied.count, 4);
    }

    #[test]
    fn test_expired_entry_restarts_at_one() {
        let store = MemoryCounterStore::new();
        let policy = policy(1);

        assert!(store.increment_and_check("k", &policy, 0).allowed);
        assert!(!store.increment_and_check("k", &policy, 59_999).allowed);

        // expires_at <= now counts as expired
        let decision = store.increment_and_check("k", &policy, 60_000);
        assert!(decision.allowed);
        assert_eq!(decision.count, 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let store = MemoryCounterStore::new();
        let policy = policy(1);

        assert!(store.increment_and_check("a", &policy, 0).allowed);
        assert!(store.increment_and_check("b", &policy, 0).allowed);
        assert!(!store.increment_and_check("a", &policy, 0).allowed);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_purge_and_clear() {
        let store = MemoryCounterStore::new();
        let short = RateLimitPolicy::new(5, 1).unwrap();
        let long = policy(5);

        store.increment_and_check("short", &short, 0);
        store.increment_and_check("long", &long, 0);

        assert_eq!(store.purge_expired(1_000), 1);
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_increments_admit_exactly_max() {
        const MAX: u32 = 5;
        const CALLERS: usize = 64;

        let store = Arc::new(MemoryCounterStore::new());
        let admitted = Arc::new(AtomicUsize::new(0));
        let denied = Arc::new(AtomicUsize::new(0));
        let policy = policy(MAX);

        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                let store = Arc::clone(&store);
                let admitted = Arc::clone(&admitted);
                let denied = Arc::clone(&denied);
                std::thread::spawn(move || {
                    if store.increment_and_check("shared", &policy, 0).allowed {
                        admitted.fetch_add(1, Ordering::SeqCst);
                    } else {
                        denied.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(admitted.load(Ordering::SeqCst), MAX as usize);
        assert_eq!(
            admitted.load(Ordering::SeqCst) + denied.load(Ordering::SeqCst),
            CALLERS
        );
    }
}
