//! Parser configuration.

use std::fmt;
use std::sync::Arc;

use crate::cache::CacheConfig;
use crate::logger::{Logger, NoopLogger};

/// Smallest accepted reorder miss threshold (exclusive).
pub const MIN_MISSES_THRESHOLD: u64 = 100_000;

/// Default number of late matches before rules are reordered.
pub const DEFAULT_MISSES_THRESHOLD: u64 = 500_000;

/// Default last rule position that still counts as an early match.
pub const DEFAULT_MATCH_IDX_NOT_OK: usize = 20;

/// Configuration for a [`Parser`](super::Parser).
///
/// # Examples
/// ```
/// use uarule::ParserConfig;
///
/// let config = ParserConfig::default()
///     .with_use_sort(true)
///     .with_match_idx_not_ok(5)
///     .with_misses_threshold(200_000);
/// assert_eq!(config.misses_threshold, 200_000);
/// ```
#[derive(Clone)]
pub struct ParserConfig {
    /// Reorder rules by match frequency when too many matches land late
    pub use_sort: bool,
    /// Matches at a position greater than this count as misses
    pub match_idx_not_ok: usize,
    /// Misses needed before a reorder pass runs
    pub misses_threshold: u64,
    /// Emit match/no-match/reorder diagnostics through `logger`
    pub debug: bool,
    /// Diagnostics sink
    pub logger: Arc<dyn Logger>,
    /// Match cache configuration
    pub cache: CacheConfig,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            use_sort: false,
            match_idx_not_ok: DEFAULT_MATCH_IDX_NOT_OK,
            misses_threshold: DEFAULT_MISSES_THRESHOLD,
            debug: false,
            logger: Arc::new(NoopLogger),
            cache: CacheConfig::default(),
        }
    }
}

impl ParserConfig {
    /// Enable or disable adaptive rule reordering.
    pub fn with_use_sort(mut self, use_sort: bool) -> Self {
        self.use_sort = use_sort;
        self
    }

    /// Set the last rule position that still counts as an early match.
    pub fn with_match_idx_not_ok(mut self, idx: usize) -> Self {
        self.match_idx_not_ok = idx;
        self
    }

    /// Set the reorder miss threshold.
    ///
    /// Values not above [`MIN_MISSES_THRESHOLD`] are ignored.
    pub fn with_misses_threshold(mut self, threshold: u64) -> Self {
        if threshold > MIN_MISSES_THRESHOLD {
            self.misses_threshold = threshold;
        }
        self
    }

    /// Enable or disable debug diagnostics.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the diagnostics sink.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set the match cache configuration.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }
}

impl fmt::Debug for ParserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserConfig")
            .field("use_sort", &self.use_sort)
            .field("match_idx_not_ok", &self.match_idx_not_ok)
            .field("misses_threshold", &self.misses_threshold)
            .field("debug", &self.debug)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
