//! Frequency-driven rule reordering.
//!
//! Every classification that is won by a rule sitting past the acceptable
//! position counts as a miss. Once misses reach the threshold, the rule list
//! is re-sorted by descending match count and published as a new snapshot.
//! Scans in flight keep the snapshot they loaded, so no reader ever sees a
//! half-sorted list.

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::rule::UaRule;

/// Ordered rule snapshot scanned by the parser.
pub type RuleList = Vec<Arc<UaRule>>;

/// Tracks late matches and re-sorts the rule list when they pile up.
#[derive(Debug)]
pub(crate) struct Reorderer {
    misses: AtomicU64,
    threshold: u64,
    sorting: Mutex<()>,
}

impl Reorderer {
    pub(crate) fn new(threshold: u64) -> Self {
        Self {
            misses: AtomicU64::new(0),
            threshold,
            sorting: Mutex::new(()),
        }
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub(crate) fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Re-sort `rules` if the miss threshold has been reached.
    ///
    /// Returns `true` if a new order was published. Only one caller sorts at
    /// a time; others return immediately.
    pub(crate) fn maybe_reorder(&self, rules: &ArcSwap<RuleList>) -> bool {
        if self.misses.load(Ordering::Acquire) < self.threshold {
            return false;
        }

        let Some(_guard) = self.sorting.try_lock() else {
            return false;
        };

        // Another caller may have sorted while we waited for the lock
        if self.misses.load(Ordering::Acquire) < self.threshold {
            return false;
        }
        self.misses.store(0, Ordering::Release);

        let current = rules.load_full();
        rules.store(Arc::new(sort_by_matches(&current)));
        true
    }
}

/// Stable sort by descending match count.
///
/// Counts are read once up front since other threads keep incrementing them.
pub(crate) fn sort_by_matches(rules: &[Arc<UaRule>]) -> RuleList {
    let mut counted: Vec<(u64, &Arc<UaRule>)> =
        rules.iter().map(|rule| (rule.matches(), rule)).collect();
    counted.sort_by(|a, b| b.0.cmp(&a.0));
    counted.into_iter().map(|(_, rule)| Arc::clone(rule)).collect()
}
