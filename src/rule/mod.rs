//! User agent rules and their definitions.
//!
//! A [`RuleDefinition`] is what a rule document says; a [`UaRule`] is the
//! compiled form the parser scans.

mod definition;
mod ua;

pub use definition::{
    RegexesDefinitions, RuleDefinition, DEFAULT_FAMILY_REPLACEMENT, DEFAULT_VERSION_REPLACEMENT,
};
pub use ua::UaRule;

use crate::Result;

/// Compile an ordered list of definitions, failing on the first bad rule.
pub fn compile_all(defs: &[RuleDefinition]) -> Result<Vec<UaRule>> {
    defs.iter().map(UaRule::compile).collect()
}
