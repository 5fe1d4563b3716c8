//! Counter key derivation
//!
//! A key names one (endpoint, client, window) triple. The window index is a
//! pure function of wall-clock time, so processes sharing a backend must
//! keep their clocks in sync well within the shortest window.

/// Identity used when the caller could not determine one. All such clients
/// share a single counter.
pub const UNKNOWN_CLIENT: &str = "unknown";

const KEY_PREFIX: &str = "rate_limit";

/// Index of the fixed window containing `now_ms`
pub fn bucket_index(now_ms: i64, window_secs: u64) -> i64 {
    let window_ms = (window_secs.max(1) as i64).saturating_mul(1000);
    now_ms.div_euclid(window_ms)
}

/// Build `rate_limit:{endpoint}:{client}:{bucket}`
pub fn bucket_key(
    endpoint: &str,
    client_identity: Option<&str>,
    now_ms: i64,
    window_secs: u64,
) -> String {
    let client = client_identity
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(UNKNOWN_CLIENT);

    format!(
        "{}:{}:{}:{}",
        KEY_PREFIX,
        endpoint,
        client,
        bucket_index(now_ms, window_secs)
    )
}
