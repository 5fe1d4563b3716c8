//! Redis counter store
//!
//! Counters live in Redis so that every process behind the load balancer
//! sees the same count. One pipelined `MULTI / INCR / EXPIRE / EXEC` round
//! trip per request keeps latency low and leaves no window between the
//! increment and the TTL refresh.

use std::fmt;
use std::time::Duration;

use parking_lot::Mutex;
use redis::aio::MultiplexedConnection;
use tokio::time::timeout;
use tracing::debug;

use super::error::RateLimitError;
use super::policy::RateLimitPolicy;
use super::{RateLimitDecision, RateLimitStore};

/// Upper bound on every backend round trip
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(1);

/// Redis-backed counter store.
///
/// The connection is opened lazily and dropped after any failure, so the
/// next request reconnects once the backend is back.
pub struct RedisCounterStore {
    target: String,
    client: redis::Client,
    connection: Mutex<Option<MultiplexedConnection>>,
    timeout: Duration,
}

impl RedisCounterStore {
    /// Validate `target` and build a client. Does not touch the network.
    pub fn open(target: &str, timeout: Duration) -> Result<Self, RateLimitError> {
        let client = redis::Client::open(target).map_err(|e| {
            RateLimitError::InvalidBackendUrl(format!("{} ({})", sanitize_url(target), e))
        })?;

        Ok(Self {
            target: target.to_string(),
            client,
            connection: Mutex::new(None),
            timeout,
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn connection(&self) -> Result<MultiplexedConnection, RateLimitError> {
        let cached = self.connection.lock().clone();
        if let Some(conn) = cached {
            return Ok(conn);
        }

        let conn = timeout(self.timeout, self.client.get_multiplexed_async_connection())
            .await
            .map_err(|_| RateLimitError::BackendUnavailable("connect timed out".into()))?
            .map_err(|e| RateLimitError::BackendUnavailable(e.to_string()))?;

        debug!(
            target = %sanitize_url(&self.target),
            "Connected to rate limit backend"
        );

        *self.connection.lock() = Some(conn.clone());
        Ok(conn)
    }

    fn drop_connection(&self) {
        self.connection.lock().take();
    }
}

impl RateLimitStore for RedisCounterStore {
    async fn increment_and_check(
        &self,
        key: &str,
        policy: &RateLimitPolicy,
    ) -> Result<RateLimitDecision, RateLimitError> {
        let mut conn = self.connection().await?;

        // One extra second so a counter started near a boundary outlives
        // the window it belongs to.
        let ttl_secs = policy.window_secs() as i64 + 1;

        let mut pipe = redis::pipe();
        pipe.atomic().incr(key, 1).expire(key, ttl_secs).ignore();

        let outcome: Result<redis::RedisResult<(u64,)>, _> =
            timeout(self.timeout, pipe.query_async(&mut conn)).await;

        let failure = match outcome {
            Ok(Ok((count,))) => return Ok(RateLimitDecision::from_count(count, policy)),
            Ok(Err(e)) => e.to_string(),
            Err(_) => "request timed out".to_string(),
        };

        self.drop_connection();
        Err(RateLimitError::BackendUnavailable(failure))
    }
}

impl fmt::Debug for RedisCounterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCounterStore")
            .field("target", &sanitize_url(&self.target))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Hide the password part of a backend URL before it reaches the logs
pub(crate) fn sanitize_url(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("***"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid_url".to_string(),
    }
}
