//! Logger configuration and the environment variables that override it.

use crate::Severity;
use serde_json::{Map, Value};
use std::env;

/// Default name of the rule-string variable.
pub const DEFAULT_LEVEL_VAR: &str = "LOG_LEVEL";

/// Default name of the call-site annotation switch.
pub const DEFAULT_SOURCE_LOCATION_VAR: &str = "FORCE_LOG_LINE_NUMBERS_AND_BE_SLOW";

/// Configuration handed to a logger factory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoggerConfig {
    name: String,
    /// Programmatic level, used when the environment has no matching rule.
    pub level: Option<Severity>,
    /// Annotate records with the caller's file and line.
    pub src: bool,
    /// Fields copied into every record emitted by the logger.
    pub fields: Map<String, Value>,
}

impl LoggerConfig {
    /// Configuration for the logger called `name`, with no level set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the programmatic level.
    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = Some(level);
        self
    }

    /// Turn call-site annotation on or off.
    pub fn with_src(mut self, src: bool) -> Self {
        self.src = src;
        self
    }

    /// Add a base field copied into every record.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Logger name; fixed at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Level used when no rule string applies.
    pub fn default_level(&self) -> Severity {
        self.level.unwrap_or_default()
    }
}

/// Names of the environment variables consulted at logger construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSettings {
    /// Variable holding the rule string.
    pub level_var: String,
    /// Variable that turns on call-site annotation when set to `"1"`.
    pub source_location_var: String,
}

impl Default for EnvSettings {
    fn default() -> Self {
        Self {
            level_var: DEFAULT_LEVEL_VAR.to_string(),
            source_location_var: DEFAULT_SOURCE_LOCATION_VAR.to_string(),
        }
    }
}

impl EnvSettings {
    /// Read the process environment once.
    pub fn capture(&self) -> EnvSnapshot {
        EnvSnapshot {
            rules: env::var(&self.level_var).ok(),
            force_source_location: env::var(&self.source_location_var)
                .map(|value| value == "1")
                .unwrap_or(false),
        }
    }
}

/// Environment values captured at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    /// Raw rule string, if the variable was set.
    pub rules: Option<String>,
    /// Only the literal value `"1"` turns this on.
    pub force_source_location: bool,
}

impl EnvSnapshot {
    /// Snapshot holding only a rule string.
    pub fn with_rules(rules: impl Into<String>) -> Self {
        Self {
            rules: Some(rules.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(LoggerConfig::new("a").default_level(), Severity::Info);
        assert_eq!(
            LoggerConfig::new("a").with_level(Severity::Trace).default_level(),
            Severity::Trace
        );
    }

    #[test]
    fn test_builder() {
        let cfg = LoggerConfig::new("svc")
            .with_src(true)
            .with_field("region", "us-west-1");
        assert_eq!(cfg.name(), "svc");
        assert!(cfg.src);
        assert_eq!(cfg.fields["region"], "us-west-1");
    }

    #[test]
    fn test_capture_reads_named_vars() {
        let settings = EnvSettings {
            level_var: "ENVLOG_CONFIG_TEST_LEVEL".to_string(),
            source_location_var: "ENVLOG_CONFIG_TEST_SRC".to_string(),
        };
        env::set_var(&settings.level_var, "api:info");
        env::set_var(&settings.source_location_var, "true");

        let snapshot = settings.capture();
        assert_eq!(snapshot.rules.as_deref(), Some("api:info"));
        // Anything but "1" leaves annotation off.
        assert!(!snapshot.force_source_location);

        env::set_var(&settings.source_location_var, "1");
        assert!(settings.capture().force_source_location);

        env::remove_var(&settings.level_var);
        env::remove_var(&settings.source_location_var);
        assert_eq!(settings.capture(), EnvSnapshot::default());
    }

    #[test]
    fn test_default_var_names() {
        let settings = EnvSettings::default();
        assert_eq!(settings.level_var, "LOG_LEVEL");
        assert_eq!(
            settings.source_location_var,
            "FORCE_LOG_LINE_NUMBERS_AND_BE_SLOW"
        );
    }
}
