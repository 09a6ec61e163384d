//! Compiled user agent rule.

use regex::Regex;
use std::sync::atomic::{AtomicU64, Ordering};

use super::RuleDefinition;
use crate::error::Error;
use crate::{Result, UserAgent};

/// UaRule is one compiled pattern with its family and version templates.
///
/// The only mutable state is the match counter, which concurrent readers
/// bump without locking.
///
/// # Examples
/// ```
/// use uarule::rule::{RuleDefinition, UaRule};
///
/// let rule = UaRule::compile(&RuleDefinition::new(r"(Chrome)/(\d+(?:\.\d+)*)")).unwrap();
/// let ua = rule.match_input("Mozilla/5.0 Chrome/91.0.4472.124 Safari/537.36").unwrap();
/// assert_eq!(ua.family, "Chrome");
/// assert_eq!(ua.version, "91.0.4472.124");
/// ```
#[derive(Debug)]
pub struct UaRule {
    regex: Regex,
    expr: String,
    flags: String,
    family_replacement: String,
    version_replacement: String,
    matches: AtomicU64,
}

impl UaRule {
    /// Compile a rule definition.
    pub fn compile(def: &RuleDefinition) -> Result<Self> {
        let flags = def.flags();
        let source = if flags.is_empty() {
            def.expr.clone()
        } else {
            format!("(?{}){}", flags, def.expr)
        };
        let regex = Regex::new(&source).map_err(|source| Error::InvalidRegex {
            expr: def.expr.clone(),
            source,
        })?;

        Ok(Self {
            regex,
            expr: def.expr.clone(),
            flags: flags.to_string(),
            family_replacement: def.family_template().to_string(),
            version_replacement: def.version_template().to_string(),
            matches: AtomicU64::new(0),
        })
    }

    /// Match a line against this rule.
    ///
    /// Returns `None` if the pattern does not match or the family template
    /// expands to an empty string. Groups that did not participate expand
    /// to nothing.
    pub fn match_input(&self, line: &str) -> Option<UserAgent> {
        let caps = self.regex.captures(line)?;

        let mut family = String::new();
        caps.expand(&self.family_replacement, &mut family);
        if family.is_empty() {
            return None;
        }

        let mut version = String::new();
        caps.expand(&self.version_replacement, &mut version);

        Some(UserAgent { family, version })
    }

    /// Count one more win for this rule.
    pub fn record_match(&self) {
        self.matches.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of times this rule won a classification.
    pub fn matches(&self) -> u64 {
        self.matches.load(Ordering::Relaxed)
    }

    /// Expression as written in the definition.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// Regex flags, empty when none.
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Family template.
    pub fn family_replacement(&self) -> &str {
        &self.family_replacement
    }

    /// Version template.
    pub fn version_replacement(&self) -> &str {
        &self.version_replacement
    }
}
