//! Log records.

use chrono::{DateTime, Utc};
use envlog_config::Severity;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::panic::Location;

/// Keys written by [`Record`] itself. Base fields and payload entries with
/// these names are stored under an underscore-prefixed key instead.
pub const RESERVED_KEYS: [&str; 7] = ["name", "hostname", "pid", "level", "time", "msg", "src"];

/// One structured log record.
///
/// Serializes to a flat JSON object: the fixed keys below followed by the
/// logger's base fields and the per-call payload.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    /// Name of the emitting logger.
    pub name: String,
    /// Host the process runs on, when it could be determined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Emitting process id.
    pub pid: u32,
    /// Written as its numeric value (10 to 60).
    #[serde(serialize_with = "numeric_level")]
    pub level: Severity,
    /// Creation time.
    pub time: DateTime<Utc>,
    /// Human-readable message.
    pub msg: String,
    /// Call site, only with source annotation enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<SourceLocation>,
    /// Base fields and payload; never contains a reserved key.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Build a record stamped with the current time and process id.
    ///
    /// Reserved keys in `fields` are moved aside (`level` becomes `_level`)
    /// so they cannot shadow the record's own keys.
    pub fn new(name: &str, level: Severity, fields: Map<String, Value>, msg: &str) -> Self {
        Self {
            name: name.to_string(),
            hostname: None,
            pid: std::process::id(),
            level,
            time: Utc::now(),
            msg: msg.to_string(),
            src: None,
            fields: move_reserved_keys(fields),
        }
    }

    /// Field lookup over base fields and payload.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

fn move_reserved_keys(mut fields: Map<String, Value>) -> Map<String, Value> {
    for key in RESERVED_KEYS {
        let Some(value) = fields.remove(key) else {
            continue;
        };
        let mut renamed = format!("_{key}");
        while fields.contains_key(&renamed) {
            renamed.insert(0, '_');
        }
        fields.insert(renamed, value);
    }
    fields
}

fn numeric_level<S: Serializer>(level: &Severity, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(level.as_number())
}

/// Call site of a logging statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// Source file path as compiled.
    pub file: String,
    /// 1-based line number.
    pub line: u32,
}

impl From<&Location<'_>> for SourceLocation {
    fn from(location: &Location<'_>) -> Self {
        Self {
            file: location.file().to_string(),
            line: location.line(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_flat_with_numeric_level() {
        let mut fields = Map::new();
        fields.insert("http_status".to_string(), json!(404));
        let record = Record::new("svc", Severity::Warn, fields, "failed api call");

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["name"], "svc");
        assert_eq!(value["level"], 40);
        assert_eq!(value["msg"], "failed api call");
        assert_eq!(value["http_status"], 404);
        assert_eq!(value["pid"], std::process::id());
        assert!(value.get("src").is_none());
        assert!(value["time"].is_string());
    }

    #[test]
    fn test_reserved_keys_cannot_shadow_record() {
        let fields = json!({"level": "debug", "msg": "spoofed", "name": "other", "kept": 1});
        let Value::Object(fields) = fields else { unreachable!() };
        let record = Record::new("svc", Severity::Fatal, fields, "real");

        let line = serde_json::to_string(&record).unwrap();
        assert_eq!(line.matches("\"level\":").count(), 1, "{line}");
        assert_eq!(line.matches("\"msg\":").count(), 1, "{line}");

        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], 60);
        assert_eq!(value["msg"], "real");
        assert_eq!(value["name"], "svc");
        assert_eq!(value["_level"], "debug");
        assert_eq!(value["_msg"], "spoofed");
        assert_eq!(value["_name"], "other");
        assert_eq!(value["kept"], 1);
    }

    #[test]
    fn test_moved_key_does_not_overwrite_existing() {
        let Value::Object(fields) = json!({"time": "t0", "_time": "t1"}) else {
            unreachable!()
        };
        let record = Record::new("svc", Severity::Info, fields, "m");
        assert_eq!(record.field("_time"), Some(&json!("t1")));
        assert_eq!(record.field("__time"), Some(&json!("t0")));
        assert_eq!(record.field("time"), None);
    }

    #[test]
    fn test_hostname_serialized_when_known() {
        let mut record = Record::new("svc", Severity::Info, Map::new(), "m");
        assert!(serde_json::to_value(&record).unwrap().get("hostname").is_none());
        record.hostname = Some("web-1".to_string());
        assert_eq!(serde_json::to_value(&record).unwrap()["hostname"], "web-1");
    }

    #[test]
    fn test_source_location() {
        let location = SourceLocation::from(Location::caller());
        assert!(location.file.ends_with("record.rs"));
        assert_eq!(location.to_string(), format!("{}:{}", location.file, location.line));
    }
}
