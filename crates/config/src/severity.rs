//! Severity levels.

use crate::LevelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Record severity, ordered by increasing urgency.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// Every recognized severity, lowest first.
    pub const ALL: [Severity; 6] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Lowercase name, as accepted in rule strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }

    /// Numeric level as written into JSON records (10 for trace up to 60 for fatal).
    pub fn as_number(&self) -> u8 {
        match self {
            Severity::Trace => 10,
            Severity::Debug => 20,
            Severity::Info => 30,
            Severity::Warn => 40,
            Severity::Error => 50,
            Severity::Fatal => 60,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LevelError;

    /// Level names are matched exactly; `"WARN"` and `"warning"` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .iter()
            .copied()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| LevelError::UnknownLevel {
                level: s.to_string(),
            })
    }
}
