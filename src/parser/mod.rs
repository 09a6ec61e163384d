//! User agent parser: ordered rules, match cache and adaptive reordering.

mod config;
mod reorder;

pub use config::{
    ParserConfig, DEFAULT_MATCH_IDX_NOT_OK, DEFAULT_MISSES_THRESHOLD, MIN_MISSES_THRESHOLD,
};
pub use reorder::RuleList;

use arc_swap::ArcSwap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::cache::{CacheStats, MatchCache};
use crate::rule::{compile_all, RegexesDefinitions, RuleDefinition};
use crate::{Result, UserAgent};
use reorder::Reorderer;

/// Rule set shipped with the crate.
pub const EMBEDDED_REGEXES: &str = include_str!("../../assets/regexes.yaml");

/// Parser classifies user agent strings into a family and version.
///
/// Rules are tried in current scan order and the first match wins. Results
/// are memoized per input string. With `use_sort` enabled, rules that win
/// often drift to the front of the scan order, so common inputs are settled
/// after fewer regex evaluations. Rule sets meant for sorting should not
/// overlap: when two rules match the same input, whichever sits first in the
/// current order wins.
///
/// `Parser` is `Send + Sync` and meant to be shared across threads.
///
/// # Examples
/// ```
/// use uarule::{Parser, ParserConfig};
///
/// let parser = Parser::from_embedded(ParserConfig::default()).unwrap();
/// let ua = parser.parse(
///     "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
///      (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
/// );
/// assert_eq!(ua.family, "Chrome");
/// assert_eq!(ua.version, "91.0.4472.124");
/// ```
pub struct Parser {
    /// Current scan order, replaced wholesale on reorder
    rules: ArcSwap<RuleList>,
    cache: MatchCache,
    reorderer: Reorderer,
    config: ParserConfig,
}

impl Parser {
    /// Build a parser from rule definitions in scan order.
    pub fn new(defs: &[RuleDefinition], config: ParserConfig) -> Result<Self> {
        let rules: RuleList = compile_all(defs)?.into_iter().map(Arc::new).collect();
        log::debug!("Compiled {} user agent rules", rules.len());

        let threshold = config.misses_threshold.max(MIN_MISSES_THRESHOLD);
        Ok(Self {
            rules: ArcSwap::from_pointee(rules),
            cache: MatchCache::new(&config.cache),
            reorderer: Reorderer::new(threshold),
            config,
        })
    }

    /// Build a parser from a parsed definitions document.
    pub fn from_definitions(defs: &RegexesDefinitions, config: ParserConfig) -> Result<Self> {
        Self::new(&defs.user_agent_parsers, config)
    }

    /// Build a parser from a YAML definitions string.
    pub fn from_yaml(yaml: &str, config: ParserConfig) -> Result<Self> {
        Self::from_definitions(&RegexesDefinitions::from_yaml(yaml)?, config)
    }

    /// Build a parser from a reader containing YAML definitions.
    pub fn from_reader<R: Read>(reader: R, config: ParserConfig) -> Result<Self> {
        Self::from_definitions(&RegexesDefinitions::from_reader(reader)?, config)
    }

    /// Build a parser from a YAML definitions file.
    pub fn from_file(path: &Path, config: ParserConfig) -> Result<Self> {
        Self::from_definitions(&RegexesDefinitions::from_file(path)?, config)
    }

    /// Build a parser from the rule set shipped with the crate.
    pub fn from_embedded(config: ParserConfig) -> Result<Self> {
        Self::from_yaml(EMBEDDED_REGEXES, config)
    }

    /// Classify a user agent string.
    ///
    /// Never fails: inputs no rule recognizes yield family `Other` with an
    /// empty version.
    pub fn parse(&self, line: &str) -> Arc<UserAgent> {
        let ua = self.parse_user_agent(line);
        if self.config.use_sort {
            self.check_and_sort();
        }
        ua
    }

    fn parse_user_agent(&self, line: &str) -> Arc<UserAgent> {
        if let Some(ua) = self.cache.get(line) {
            return ua;
        }

        let rules = self.rules.load();
        let hit = rules
            .iter()
            .enumerate()
            .find_map(|(idx, rule)| rule.match_input(line).map(|ua| (idx, rule, ua)));

        let ua = match hit {
            Some((idx, rule, ua)) => {
                rule.record_match();
                if idx > self.config.match_idx_not_ok {
                    self.reorderer.record_miss();
                }
                if self.config.debug {
                    self.config.logger.info(format_args!(
                        "[match ua]\t{}\t{}\t[expr]\t{}",
                        line,
                        ua.family,
                        rule.expr()
                    ));
                }
                ua
            }
            None => {
                if self.config.debug {
                    self.config
                        .logger
                        .info(format_args!("[not match ua]\t{}", line));
                }
                UserAgent::other()
            }
        };

        let ua = Arc::new(ua);
        self.cache.put(line, Arc::clone(&ua));
        ua
    }

    /// Re-sort the rules by match count if enough late matches piled up.
    ///
    /// Called after every [`parse`](Self::parse) when `use_sort` is on.
    /// Returns `true` if a new order was published.
    pub fn check_and_sort(&self) -> bool {
        let sorted = self.reorderer.maybe_reorder(&self.rules);
        if sorted && self.config.debug {
            self.config
                .logger
                .info(format_args!("sorting user agent rules"));
        }
        sorted
    }

    /// Snapshot of the rules in current scan order.
    pub fn rules(&self) -> Arc<RuleList> {
        self.rules.load_full()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.load().len()
    }

    /// Check if the parser has no rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Late matches counted since the last reorder.
    pub fn misses(&self) -> u64 {
        self.reorderer.misses()
    }

    /// Get match cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Clear the match cache.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Get the configuration for this parser.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("rules", &self.len())
            .field("misses", &self.misses())
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use parking_lot::Mutex;

    const RULES: &str = r#"
user_agent_parsers:
  - regex: '(Edg)/(\d+(?:\.\d+)*)'
    family_replacement: 'Edge'
  - regex: '(Firefox)/(\d+(?:\.\d+)*)'
  - regex: '(Chrome)/(\d+(?:\.\d+)*)'
  - regex: '(curl)/(\S+)'
"#;

    const CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
    const EDGE: &str = "Mozilla/5.0 AppleWebKit/537.36 Chrome/128.0.0.0 Safari/537.36 Edg/128.0.0.0";

    fn parser(config: ParserConfig) -> Parser {
        Parser::from_yaml(RULES, config).unwrap()
    }

    fn order(parser: &Parser) -> Vec<String> {
        parser.rules().iter().map(|r| r.expr().to_string()).collect()
    }

    #[test]
    fn test_first_match_wins() {
        let parser = parser(ParserConfig::default());
        assert_eq!(*parser.parse(CHROME), UserAgent::new("Chrome", "91.0.4472.124"));
        assert_eq!(*parser.parse(EDGE), UserAgent::new("Edge", "128.0.0.0"));
        assert_eq!(*parser.parse("curl/8.4.0"), UserAgent::new("curl", "8.4.0"));
    }

    #[test]
    fn test_no_match_is_other() {
        let parser = parser(ParserConfig::default());
        let ua = parser.parse("totally unknown agent");
        assert!(ua.is_other());
        assert_eq!(ua.version, "");
        assert_eq!(parser.misses(), 0);
        assert!(parser.rules().iter().all(|r| r.matches() == 0));
    }

    #[test]
    fn test_cache_hit_skips_counters() {
        let parser = parser(ParserConfig::default());
        parser.parse(CHROME);
        parser.parse(CHROME);
        parser.parse(CHROME);

        let chrome = &parser.rules()[2];
        assert_eq!(chrome.matches(), 1);
        let stats = parser.cache_stats();
        assert_eq!(stats.len, 1);
        assert_eq!(stats.hits, 2);
    }

    #[test]
    fn test_without_cache_counts_every_call() {
        let parser = parser(ParserConfig::default().with_cache(CacheConfig::no_cache()));
        for _ in 0..5 {
            parser.parse(CHROME);
        }
        assert_eq!(parser.rules()[2].matches(), 5);
    }

    #[test]
    fn test_late_matches_count_as_misses() {
        let parser = parser(ParserConfig::default().with_match_idx_not_ok(1));
        parser.parse(EDGE); // index 0
        parser.parse("Gecko/20100101 Firefox/131.0"); // index 1
        assert_eq!(parser.misses(), 0);

        parser.parse(CHROME); // index 2
        parser.parse("curl/8.4.0"); // index 3
        assert_eq!(parser.misses(), 2);

        parser.parse("nothing"); // no match, not a miss
        assert_eq!(parser.misses(), 2);
    }

    #[test]
    fn test_misses_threshold_is_floored() {
        let mut config = ParserConfig::default();
        config.misses_threshold = 1;
        let parser = parser(config);
        assert_eq!(parser.reorderer.threshold(), MIN_MISSES_THRESHOLD);

        let parser = self::parser(ParserConfig::default());
        assert_eq!(parser.reorderer.threshold(), DEFAULT_MISSES_THRESHOLD);
    }

    #[test]
    fn test_reorder_moves_hot_rules_forward() {
        let mut parser = parser(
            ParserConfig::default()
                .with_use_sort(true)
                .with_match_idx_not_ok(0)
                .with_cache(CacheConfig::no_cache()),
        );
        parser.reorderer = Reorderer::new(3);

        let inputs = [CHROME, "Edg/128.0.0.0", "curl/8.4.0", "Gecko/20100101 Firefox/131.0"];
        let before: Vec<UserAgent> = inputs.iter().map(|i| (*parser.parse(i)).clone()).collect();
        // Chrome: 1, Edge: 1, curl: 1 (miss 2), Firefox: 1 (miss 3) -> sorted
        assert_eq!(parser.misses(), 0);

        // Tie everywhere, so the stable sort keeps the definition order
        assert_eq!(order(&parser)[0], r"(Edg)/(\d+(?:\.\d+)*)");

        for _ in 0..3 {
            parser.parse(CHROME);
        }
        parser.reorderer.record_miss();
        parser.reorderer.record_miss();
        parser.parse("curl/1.0");

        let order = order(&parser);
        assert_eq!(order[0], r"(Chrome)/(\d+(?:\.\d+)*)");
        assert_eq!(order[1], r"(curl)/(\S+)");
        assert_eq!(parser.misses(), 0);

        let after: Vec<UserAgent> = inputs.iter().map(|i| (*parser.parse(i)).clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_reorder_changes_overlapping_winner() {
        let mut parser = parser(
            ParserConfig::default()
                .with_use_sort(true)
                .with_cache(CacheConfig::no_cache()),
        );
        parser.reorderer = Reorderer::new(1);

        // Definition order puts Edge ahead of Chrome
        assert_eq!(*parser.parse(EDGE), UserAgent::new("Edge", "128.0.0.0"));

        for _ in 0..10 {
            parser.parse(CHROME);
        }
        parser.reorderer.record_miss();
        assert!(parser.check_and_sort());
        assert_eq!(order(&parser)[0], r"(Chrome)/(\d+(?:\.\d+)*)");

        // The Edge string also matches the Chrome rule, now scanned first
        assert_eq!(*parser.parse(EDGE), UserAgent::new("Chrome", "128.0.0.0"));
        let rules = parser.rules();
        assert_eq!(rules[0].matches(), 11);
        let edge = rules.iter().find(|r| r.family_replacement() == "Edge");
        assert_eq!(edge.map(|r| r.matches()), Some(1));
    }

    #[test]
    fn test_reorder_shortens_scan() {
        let mut defs: Vec<RuleDefinition> = (0..50)
            .map(|i| RuleDefinition::new(format!(r"(Filler{})/(\d+)", i)))
            .collect();
        defs.push(RuleDefinition::new(r"(Chrome)/(\d+(?:\.\d+)*)"));

        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&lines);
        let logger = move |args: std::fmt::Arguments<'_>| sink.lock().push(args.to_string());
        let mut parser = Parser::new(
            &defs,
            ParserConfig::default()
                .with_use_sort(true)
                .with_match_idx_not_ok(0)
                .with_debug(true)
                .with_logger(Arc::new(logger))
                .with_cache(CacheConfig::no_cache()),
        )
        .unwrap();
        parser.reorderer = Reorderer::new(1);

        // Won at index 50: a late match, which triggers the sort
        parser.parse(CHROME);
        assert_eq!(parser.misses(), 0);
        assert_eq!(lines.lock().last().map(String::as_str), Some("sorting user agent rules"));
        assert_eq!(order(&parser)[0], r"(Chrome)/(\d+(?:\.\d+)*)");

        // Now settled by the first rule tried
        parser.parse(CHROME);
        assert_eq!(parser.misses(), 0);
        assert_eq!(parser.rules()[0].matches(), 2);
        assert!(parser.rules()[1..].iter().all(|r| r.matches() == 0));
    }

    #[test]
    fn test_sorting_disabled_never_reorders() {
        let mut parser = parser(ParserConfig::default().with_match_idx_not_ok(0));
        parser.reorderer = Reorderer::new(1);
        parser.parse(CHROME);
        parser.parse("curl/8.4.0");
        assert_eq!(parser.misses(), 2);
        assert_eq!(order(&parser)[2], r"(Chrome)/(\d+(?:\.\d+)*)");
    }

    #[test]
    fn test_debug_logging() {
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&lines);
        let logger = move |args: std::fmt::Arguments<'_>| sink.lock().push(args.to_string());
        let parser = parser(
            ParserConfig::default()
                .with_debug(true)
                .with_logger(Arc::new(logger)),
        );

        parser.parse("curl/8.4.0");
        parser.parse("nothing");

        let lines = lines.lock();
        assert_eq!(lines[0], "[match ua]\tcurl/8.4.0\tcurl\t[expr]\t(curl)/(\\S+)");
        assert_eq!(lines[1], "[not match ua]\tnothing");
    }

    #[test]
    fn test_logging_off_by_default() {
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&lines);
        let logger = move |args: std::fmt::Arguments<'_>| sink.lock().push(args.to_string());
        let parser = parser(ParserConfig::default().with_logger(Arc::new(logger)));

        parser.parse("curl/8.4.0");
        assert!(lines.lock().is_empty());
    }

    #[test]
    fn test_invalid_rule_fails_construction() {
        let yaml = "user_agent_parsers:\n  - regex: '(Chrome'\n";
        assert!(matches!(
            Parser::from_yaml(yaml, ParserConfig::default()),
            Err(crate::Error::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_empty_rule_set() {
        let parser = Parser::new(&[], ParserConfig::default()).unwrap();
        assert!(parser.is_empty());
        assert!(parser.parse(CHROME).is_other());
    }
}
