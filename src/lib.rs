//! uarule - A fast, self-tuning rule engine for user agent strings.
//!
//! This crate classifies free-text client identifiers (HTTP `User-Agent`
//! headers and the like) into a normalized family and version by testing an
//! ordered list of regex rules.
//!
//! # Features
//!
//! - **First match wins**: rules are tried in order, capture groups fill the
//!   family and version templates
//! - **Match cache**: results are memoized per input in a bounded
//!   concurrent cache
//! - **Adaptive ordering**: rules that match often can move to the front of
//!   the scan order, so common inputs need fewer regex evaluations
//! - **Interval matching**: test integers and dotted versions against
//!   expressions such as `[1.0,2.0)`
//! - **Thread-safe**: one parser serves any number of threads
//!
//! # Quick Start
//!
//! ```
//! use uarule::{Parser, ParserConfig};
//!
//! let parser = Parser::from_embedded(ParserConfig::default().with_use_sort(true)).unwrap();
//!
//! let ua = parser.parse("Mozilla/5.0 (Linux; Android 14; SAMSUNG SM-S9080) AppleWebKit/537.36 (KHTML, like Gecko) SamsungBrowser/22.1 Chrome/111.0.5563.116 Mobile Safari/537.36");
//! assert_eq!(ua.family, "SamsungBrowser");
//! assert!(ua.version_in_range("[22.0,23.0)"));
//! ```
//!
//! # Rule Definitions
//!
//! Rules are YAML documents with a `user_agent_parsers` list. Each entry has
//! a `regex`, optional `regex_flag`, and optional `family_replacement` /
//! `version_replacement` templates defaulting to `$1` / `$2`.
//!
//! # Matching
//!
//! 1. Cached result for the exact input, if any
//! 2. Rules in current scan order, first match wins
//! 3. Family `Other` with an empty version when nothing matches

mod error;
mod global;
mod user_agent;

pub mod cache;
pub mod comparable;
pub mod logger;
pub mod parser;
pub mod rule;

// Re-export core types
pub use error::{Error, Result};
pub use user_agent::{UserAgent, OTHER_FAMILY};

// Re-export parser types
pub use parser::{Parser, ParserConfig, RuleList};

// Re-export supporting types
pub use cache::{CacheConfig, CacheStats};
pub use comparable::{compare_versions, match_range, Comparable, Interval};
pub use logger::{DefaultLogger, Logger, NoopLogger};

// Re-export global API functions
pub use global::{
    ensure_initialized, global_parser, is_initialized, parse_user_agent, reload_parser,
    reload_parser_from_yaml,
};
