//! Per-IP failure counting with timed lockout.
//!
//! One tracker governs all three credential tiers: five failed attempts from
//! an address lock it out of every login-style endpoint for fifteen minutes.
//! State is in-memory only; restarting the process clears it.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const MAX_FAILURES: u32 = 5;
const LOCKOUT_DURATION: Duration = Duration::from_secs(15 * 60);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockoutDecision {
    Allowed,
    Locked { retry_after_minutes: u64 },
}

#[derive(Debug, Default)]
struct AttemptRecord {
    failures: u32,
    locked_until: Option<Instant>,
}

/// Shared failure counter keyed by client IP. All mutation goes through the
/// inner mutex so concurrent login attempts cannot lose updates.
#[derive(Debug, Default)]
pub struct LockoutTracker {
    attempts: Mutex<HashMap<String, AttemptRecord>>,
}

impl LockoutTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `ip` may attempt a credential check right now.
    pub async fn check(&self, ip: &str) -> LockoutDecision {
        self.check_at(ip, Instant::now()).await
    }

    pub(crate) async fn check_at(&self, ip: &str, now: Instant) -> LockoutDecision {
        let mut attempts = self.attempts.lock().await;
        let Some(record) = attempts.get(ip) else {
            return LockoutDecision::Allowed;
        };

        if let Some(locked_until) = record.locked_until {
            if now < locked_until {
                // Reported wait rounds up to the minute, never below one.
                let remaining = locked_until - now;
                let retry_after_minutes = remaining.as_secs().div_ceil(60).max(1);
                return LockoutDecision::Locked { retry_after_minutes };
            }
            // Lockout elapsed: reset the counter before granting access.
            attempts.remove(ip);
        }

        LockoutDecision::Allowed
    }

    /// Record a failed credential check; the fifth failure locks the address.
    pub async fn record_failure(&self, ip: &str) {
        self.record_failure_at(ip, Instant::now()).await;
    }

    pub(crate) async fn record_failure_at(&self, ip: &str, now: Instant) {
        let mut attempts = self.attempts.lock().await;
        let record = attempts.entry(ip.to_string()).or_default();
        record.failures += 1;
        if record.failures >= MAX_FAILURES {
            record.locked_until = Some(now + LOCKOUT_DURATION);
        }
    }

    /// A successful credential check clears any prior failures for `ip`.
    pub async fn record_success(&self, ip: &str) {
        self.attempts.lock().await.remove(ip);
    }
}
