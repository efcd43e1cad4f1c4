//! Retry delays.

use std::time::Duration;

use rand::Rng;

use crate::config::ExecutionConfig;

/// Delay before retry number `retry` (1-based): `min_backoff * 2^(retry-1)`
/// capped at `max_backoff`, plus up to `jitter_ms` of random jitter.
pub fn backoff_delay(retry: u32, config: &ExecutionConfig) -> Duration {
    let exp = config
        .min_backoff_ms
        .saturating_mul(2u64.saturating_pow(retry.saturating_sub(1)));
    let capped = exp.min(config.max_backoff_ms);
    let jitter = if config.jitter_ms == 0 {
        0
    } else {
        rand::thread_rng().gen_range(0..=config.jitter_ms)
    };
    Duration::from_millis(capped.saturating_add(jitter))
}
