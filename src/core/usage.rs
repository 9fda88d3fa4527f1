//! Daily/monthly usage quota tracking

use std::sync::Arc;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::core::models::UsageCounters;

/// Verdict from the quota gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaVerdict {
    pub allowed: bool,
    pub reason: String,
}

/// Usage limiter enforcing daily and monthly translation caps.
///
/// Counters live behind a single `Mutex`: the gate itself mutates (it rolls
/// stale periods over before evaluating), and `can_translate` followed by
/// `record_usage` is a check-then-act pair that must not interleave with
/// another writer.
#[derive(Debug, Clone)]
pub struct UsageLimiter {
    counters: Arc<Mutex<UsageCounters>>,
}

impl UsageLimiter {
    /// Create a limiter with fresh counters
    pub fn new(daily_limit: u32, monthly_limit: u32) -> Self {
        Self {
            counters: Arc::new(Mutex::new(UsageCounters::new(daily_limit, monthly_limit))),
        }
    }

    /// Check whether another translation is allowed.
    ///
    /// Rolls over stale periods first, so a check at the start of a new day
    /// never sees yesterday's count. Read-only apart from rollover: calling
    /// this any number of times without `record_usage` in between yields the
    /// same verdict. The daily check takes precedence when both limits are
    /// exceeded.
    pub async fn can_translate(&self) -> QuotaVerdict {
        let mut counters = self.counters.lock().await;
        counters.rollover(Utc::now());

        if counters.daily_count >= counters.daily_limit {
            return QuotaVerdict {
                allowed: false,
                reason: format!("Daily limit reached ({} translations)", counters.daily_limit),
            };
        }

        if counters.monthly_count >= counters.monthly_limit {
            return QuotaVerdict {
                allowed: false,
                reason: format!(
                    "Monthly limit reached ({} translations)",
                    counters.monthly_limit
                ),
            };
        }

        QuotaVerdict {
            allowed: true,
            reason: "OK".to_string(),
        }
    }

    /// Charge one translation against both periods.
    ///
    /// The caller is responsible for checking `can_translate` first; this
    /// does not re-evaluate limits.
    pub async fn record_usage(&self) {
        let mut counters = self.counters.lock().await;
        counters.charge();
        debug!(
            daily = counters.daily_count,
            monthly = counters.monthly_count,
            "Usage recorded"
        );
    }

    /// Current counters for display, rolled over so values are never stale
    pub async fn snapshot(&self) -> UsageCounters {
        let mut counters = self.counters.lock().await;
        counters.rollover(Utc::now());
        counters.clone()
    }

    /// Reset both counters (for testing or manual reset)
    pub async fn reset(&self) {
        let mut counters = self.counters.lock().await;
        counters.daily_count = 0;
        counters.monthly_count = 0;
        info!("Usage counters reset");
    }
}
