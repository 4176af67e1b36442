//! Environment-driven level resolution.

use crate::{LevelResult, LoggerConfig, RuleSet, Severity};
use tracing::debug;

/// Resolve the active severity for the logger described by `config`.
///
/// An absent or empty rule string yields the programmatic level, or `info`
/// when none was given. Otherwise the first rule, in input order, whose
/// pattern matches the logger name decides; with no match the same default
/// applies. A malformed rule string fails the whole resolution.
pub fn resolve(rules: Option<&str>, config: &LoggerConfig) -> LevelResult<Severity> {
    let default = config.default_level();
    let rules = match rules {
        Some(rules) if !rules.is_empty() => rules,
        _ => return Ok(default),
    };

    let parsed = RuleSet::parse(rules)?;
    match parsed.level_for(config.name()) {
        Some(level) => {
            debug!(logger = config.name(), %level, "level taken from rule string");
            Ok(level)
        }
        None => Ok(default),
    }
}
