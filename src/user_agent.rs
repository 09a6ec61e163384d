//! Classification result types.

use serde::Serialize;
use std::fmt;

use crate::comparable::{match_range, Comparable};

/// Family assigned to inputs that no rule recognizes.
pub const OTHER_FAMILY: &str = "Other";

/// The (family, version) pair a user agent string classifies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct UserAgent {
    /// Normalized client name, e.g. `Chrome`
    pub family: String,
    /// Version text captured by the matching rule, possibly empty
    pub version: String,
}

impl UserAgent {
    /// Create a new UserAgent.
    pub fn new(family: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            version: version.into(),
        }
    }

    /// The result for an input no rule matched.
    pub fn other() -> Self {
        Self::new(OTHER_FAMILY, "")
    }

    /// Check if this is the no-match result.
    pub fn is_other(&self) -> bool {
        self.family == OTHER_FAMILY && self.version.is_empty()
    }

    /// Check whether the version lies inside an interval expression such as
    /// `[14.0.7.300,14.0.7.303]`.
    pub fn version_in_range(&self, expr: &str) -> bool {
        match_range(expr, &Comparable::Version(self.version.clone()))
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.family)?;
        if !self.version.is_empty() {
            write!(f, " {}", self.version)?;
        }
        Ok(())
    }
}
