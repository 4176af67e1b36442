//! Logger configuration and environment-driven level resolution.
//!
//! A rule string such as `"api:info, worker:trace, *:fatal"` maps logger
//! name patterns to severities. [`resolve`] picks the severity for one
//! logger; the first matching rule wins.

pub mod config;
pub mod resolver;
pub mod rules;
pub mod severity;

pub use config::{EnvSettings, EnvSnapshot, LoggerConfig};
pub use resolver::resolve;
pub use rules::{Rule, RuleSet};
pub use severity::Severity;

/// Error type for rule parsing and level resolution.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("Log levels must use format name:level not {token}")]
    MalformedRule { token: String },
    #[error("Invalid log level setting: {level}")]
    UnknownLevel { level: String },
    #[error("Invalid logger name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Result type for rule parsing and level resolution.
pub type LevelResult<T> = Result<T, LevelError>;
