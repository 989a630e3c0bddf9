//! Busy-contention back-off.
//!
//! The retry wrapper sits outside the transaction: a rolled-back transaction
//! is retried whole, never half-replayed.

use std::thread;
use std::time::Duration;

use rand::Rng;

use engram_core::errors::{EngramError, EngramResult, StorageError};

/// Base back-off delay.
pub const BASE_DELAY_MS: u64 = 200;

/// Back-off cap.
pub const MAX_DELAY_MS: u64 = 5_000;

/// Attempts before the contention error propagates.
pub const MAX_ATTEMPTS: u32 = 10;

/// Exponential back-off for the given 1-based attempt, capped.
fn backoff_ms(attempt: u32) -> u64 {
    BASE_DELAY_MS
        .saturating_mul(1u64 << (attempt - 1).min(5))
        .min(MAX_DELAY_MS)
}

/// Run `f`, retrying with exponential back-off and jitter while it fails
/// with a busy/locked condition. Non-busy errors propagate immediately.
pub fn with_busy_retry<T, F>(f: F) -> EngramResult<T>
where
    F: FnMut() -> EngramResult<T>,
{
    with_busy_retry_inner(f, |delay| thread::sleep(delay))
}

fn with_busy_retry_inner<T, F, S>(mut f: F, mut sleep: S) -> EngramResult<T>
where
    F: FnMut() -> EngramResult<T>,
    S: FnMut(Duration),
{
    let mut attempt: u32 = 1;
    loop {
        match f() {
            Err(e) if e.is_busy() => {
                if attempt >= MAX_ATTEMPTS {
                    return Err(EngramError::Storage(StorageError::BusyExhausted {
                        attempts: attempt,
                        message: e.to_string(),
                    }));
                }
                let backoff = backoff_ms(attempt);
                let jitter = rand::thread_rng().gen_range(0..=backoff / 4);
                tracing::debug!(
                    attempt,
                    backoff_ms = backoff + jitter,
                    "database busy, backing off"
                );
                sleep(Duration::from_millis(backoff + jitter));
                attempt += 1;
            }
            other => return other,
        }
    }
}
