//! Rule definition documents.
//!
//! Rules are written as YAML:
//!
//! ```yaml
//! user_agent_parsers:
//!   - regex: '(Firefox)/(\d+(?:\.\d+)*)'
//!   - regex: 'Edg/(\d+(?:\.\d+)*)'
//!     family_replacement: 'Edge'
//!     version_replacement: '$1'
//!   - regex: 'qqbrowser/(\S+)'
//!     regex_flag: 'i'
//!     family_replacement: 'QQBrowser'
//!     version_replacement: '$1'
//! ```

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use crate::Result;

/// Template used when a rule gives no family replacement.
pub const DEFAULT_FAMILY_REPLACEMENT: &str = "$1";

/// Template used when a rule gives no version replacement.
pub const DEFAULT_VERSION_REPLACEMENT: &str = "$2";

/// One rule as written in a definition document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct RuleDefinition {
    /// Regular expression tested against the input
    #[serde(rename = "regex")]
    pub expr: String,
    /// Inline regex flags such as `i`, compiled as `(?i)`
    #[serde(rename = "regex_flag", default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    /// Family template, `$1` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_replacement: Option<String>,
    /// Version template, `$2` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_replacement: Option<String>,
}

impl RuleDefinition {
    /// Create a definition with default templates.
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            ..Self::default()
        }
    }

    /// Set the regex flags.
    pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = Some(flags.into());
        self
    }

    /// Set the family template.
    pub fn with_family(mut self, template: impl Into<String>) -> Self {
        self.family_replacement = Some(template.into());
        self
    }

    /// Set the version template.
    pub fn with_version(mut self, template: impl Into<String>) -> Self {
        self.version_replacement = Some(template.into());
        self
    }

    /// Flags, empty when none are set.
    pub fn flags(&self) -> &str {
        self.flags.as_deref().unwrap_or("")
    }

    /// Family template with the default applied.
    pub fn family_template(&self) -> &str {
        non_empty_or(&self.family_replacement, DEFAULT_FAMILY_REPLACEMENT)
    }

    /// Version template with the default applied.
    pub fn version_template(&self) -> &str {
        non_empty_or(&self.version_replacement, DEFAULT_VERSION_REPLACEMENT)
    }
}

fn non_empty_or<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

/// An ordered list of user agent rules.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RegexesDefinitions {
    /// Rules in scan order
    #[serde(rename = "user_agent_parsers", default)]
    pub user_agent_parsers: Vec<RuleDefinition>,
}

impl RegexesDefinitions {
    /// Parse definitions from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse definitions from a reader containing YAML.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    /// Read and parse a YAML definitions file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.user_agent_parsers.len()
    }

    /// Check if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.user_agent_parsers.is_empty()
    }
}
