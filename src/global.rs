//! Global state and public API.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::{Arc, Once};

use crate::error::Result;
use crate::parser::{Parser, ParserConfig};
use crate::UserAgent;

/// Global parser
static GLOBAL_PARSER: Lazy<RwLock<Option<Arc<Parser>>>> = Lazy::new(|| RwLock::new(None));

/// Initialization flag
static INIT: Once = Once::new();

/// Ensure the global parser is initialized.
///
/// This is called lazily when needed, but can be called explicitly
/// to build the embedded rule set proactively.
pub fn ensure_initialized() {
    INIT.call_once(|| {
        if let Err(e) = reload_parser(ParserConfig::default()) {
            log::error!("Failed to initialize user agent parser: {}", e);
        }
    });
}

/// Check if the global parser is initialized.
pub fn is_initialized() -> bool {
    GLOBAL_PARSER.read().is_some()
}

/// Replace the global parser with one built from the embedded rules.
pub fn reload_parser(config: ParserConfig) -> Result<()> {
    install(Parser::from_embedded(config)?);
    log::debug!("Reloaded global parser from embedded rules");
    Ok(())
}

/// Replace the global parser with one built from YAML definitions.
///
/// On error the current parser stays in place.
pub fn reload_parser_from_yaml(yaml: &str, config: ParserConfig) -> Result<()> {
    install(Parser::from_yaml(yaml, config)?);
    log::debug!("Reloaded global parser from YAML definitions");
    Ok(())
}

fn install(parser: Parser) {
    *GLOBAL_PARSER.write() = Some(Arc::new(parser));
}

/// Get a handle to the global parser, if initialized.
pub fn global_parser() -> Option<Arc<Parser>> {
    ensure_initialized();
    GLOBAL_PARSER.read().clone()
}

/// Classify a user agent string with the global parser.
///
/// Returns the `Other` result if the parser could not be initialized.
///
/// # Examples
/// ```
/// use uarule::parse_user_agent;
///
/// let ua = parse_user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:131.0) Gecko/20100101 Firefox/131.0");
/// assert_eq!(ua.to_string(), "Firefox 131.0");
/// ```
pub fn parse_user_agent(line: &str) -> Arc<UserAgent> {
    match global_parser() {
        Some(parser) => parser.parse(line),
        None => Arc::new(UserAgent::other()),
    }
}
