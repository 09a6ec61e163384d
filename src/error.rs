//! Error types for uarule.

use thiserror::Error;

/// Error type for uarule operations.
///
/// Only building a [`Parser`](crate::Parser) can fail. Classification always
/// produces a result.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A rule expression failed to compile
    #[error("invalid rule expression {expr:?}: {source}")]
    InvalidRegex {
        /// The expression as written in the rule definition
        expr: String,
        /// Underlying compile error
        #[source]
        source: regex::Error,
    },
}

/// Result type alias for uarule operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_regex_display() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = Error::InvalidRegex {
            expr: "(".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid rule expression \"(\""));
    }
}
