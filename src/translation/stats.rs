/*!
 * Run-wide translation counters.
 */

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters shared by every worker of a run
#[derive(Debug, Default)]
pub struct TranslationStats {
    cache_hits: AtomicUsize,
    net_calls: AtomicUsize,
    failed_calls: AtomicUsize,
    failed_attempts: AtomicUsize,
    deduplicated: AtomicUsize,
}

impl TranslationStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// A unit was answered from the cache
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// A unit was translated by the external translator
    pub fn record_net_call(&self) {
        self.net_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// A unit fell back to its original text after exhausting retries
    pub fn record_failed_call(&self) {
        self.failed_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// One attempt failed, whether or not a retry later succeeded
    pub fn record_failed_attempt(&self) {
        self.failed_attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// A unit reused the result of an identical request already in flight
    pub fn record_deduplicated(&self) {
        self.deduplicated.fetch_add(1, Ordering::Relaxed);
    }

    /// Current values
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            net_calls: self.net_calls.load(Ordering::Relaxed),
            failed_calls: self.failed_calls.load(Ordering::Relaxed),
            failed_attempts: self.failed_attempts.load(Ordering::Relaxed),
            deduplicated: self.deduplicated.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Units answered from the cache
    pub cache_hits: usize,
    /// Successful external translations
    pub net_calls: usize,
    /// Units that fell back to their original text
    pub failed_calls: usize,
    /// Individual failed attempts
    pub failed_attempts: usize,
    /// Units served by an identical in-flight request
    pub deduplicated: usize,
}

impl StatsSnapshot {
    /// Cache hits plus network calls
    pub fn total(&self) -> usize {
        self.cache_hits + self.net_calls
    }

    /// Share of cache hits in percent
    pub fn cache_hit_rate(&self) -> f64 {
        percent(self.cache_hits, self.total())
    }

    /// Share of network calls in percent
    pub fn net_rate(&self) -> f64 {
        percent(self.net_calls, self.total())
    }

    /// Counter increase between an earlier snapshot and this one
    pub fn since(&self, earlier: &StatsSnapshot) -> StatsSnapshot {
        StatsSnapshot {
            cache_hits: self.cache_hits.saturating_sub(earlier.cache_hits),
            net_calls: self.net_calls.saturating_sub(earlier.net_calls),
            failed_calls: self.failed_calls.saturating_sub(earlier.failed_calls),
            failed_attempts: self.failed_attempts.saturating_sub(earlier.failed_attempts),
            deduplicated: self.deduplicated.saturating_sub(earlier.deduplicated),
        }
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total > 0 {
        part as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cache: {} ({:.2}%) | Net: {} ({:.2}%) | Total: {}",
            self.cache_hits,
            self.cache_hit_rate(),
            self.net_calls,
            self.net_rate(),
            self.total()
        )?;
        if self.failed_calls > 0 {
            write!(f, " | Failed: {}", self.failed_calls)?;
        }
        Ok(())
    }
}
