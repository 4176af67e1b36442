//! Logger handles.

use crate::serializers::{dyn_err_value, err_value, ERR_KEY};
use crate::{EmitError, Record, Sink, SourceLocation};
use envlog_config::{LoggerConfig, Severity};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Operations a configured logger exposes to its callers.
pub trait LogHandle {
    /// Logger name as configured.
    fn name(&self) -> &str;

    /// Lowest severity this logger writes.
    fn current_level(&self) -> Severity;

    /// Emit one record. Records below [`current_level`](Self::current_level)
    /// are dropped and count as success.
    fn emit(&self, level: Severity, payload: Map<String, Value>, msg: &str)
        -> Result<(), EmitError>;

    /// Whether a record at `level` would be written.
    fn enabled(&self, level: Severity) -> bool {
        level >= self.current_level()
    }
}

/// Logger writing records to a shared [`Sink`].
#[derive(Clone)]
pub struct Logger {
    name: String,
    hostname: Option<String>,
    level: Severity,
    src: bool,
    fields: Map<String, Value>,
    sink: Arc<dyn Sink>,
}

impl Logger {
    /// Build a logger at the configuration's level, or `info` when unset.
    ///
    /// The host name is looked up once here and stamped on every record.
    pub fn new(config: &LoggerConfig, sink: Arc<dyn Sink>) -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|name| name.into_string().ok());
        Self {
            name: config.name().to_string(),
            hostname,
            level: config.default_level(),
            src: config.src,
            fields: config.fields.clone(),
            sink,
        }
    }

    /// Logger sharing this one's sink, level and name, with extra base fields.
    pub fn child(&self, fields: Map<String, Value>) -> Self {
        let mut child = self.clone();
        child.fields.extend(fields);
        child
    }

    /// Base fields merged into every record.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Host name stamped on records, if it could be determined.
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    /// Log `error` at `error` level, serialized under `err`.
    #[track_caller]
    pub fn error_with<E: Error + 'static>(&self, error: &E, msg: &str) -> Result<(), EmitError> {
        self.emit_err(Severity::Error, err_value(error), Value::Null, msg)
    }

    /// Log an already serialized error at `level`, under `err` next to `payload`.
    #[track_caller]
    pub fn emit_err(
        &self,
        level: Severity,
        err: Value,
        payload: Value,
        msg: &str,
    ) -> Result<(), EmitError> {
        let mut fields = payload_fields(payload);
        fields.insert(ERR_KEY.to_string(), err);
        self.emit(level, fields, msg)
    }

    /// Log a boxed or borrowed `dyn Error` at `level`.
    #[track_caller]
    pub fn dyn_error(
        &self,
        level: Severity,
        error: &(dyn Error + 'static),
        msg: &str,
    ) -> Result<(), EmitError> {
        self.emit_err(level, dyn_err_value(error), Value::Null, msg)
    }

    /// Emit at `trace`.
    #[track_caller]
    pub fn trace(&self, payload: Value, msg: &str) -> Result<(), EmitError> {
        self.emit(Severity::Trace, payload_fields(payload), msg)
    }

    /// Emit at `debug`.
    #[track_caller]
    pub fn debug(&self, payload: Value, msg: &str) -> Result<(), EmitError> {
        self.emit(Severity::Debug, payload_fields(payload), msg)
    }

    /// Emit at `info`.
    #[track_caller]
    pub fn info(&self, payload: Value, msg: &str) -> Result<(), EmitError> {
        self.emit(Severity::Info, payload_fields(payload), msg)
    }

    /// Emit at `warn`.
    #[track_caller]
    pub fn warn(&self, payload: Value, msg: &str) -> Result<(), EmitError> {
        self.emit(Severity::Warn, payload_fields(payload), msg)
    }

    /// Emit at `error`.
    #[track_caller]
    pub fn error(&self, payload: Value, msg: &str) -> Result<(), EmitError> {
        self.emit(Severity::Error, payload_fields(payload), msg)
    }

    /// Emit at `fatal`.
    #[track_caller]
    pub fn fatal(&self, payload: Value, msg: &str) -> Result<(), EmitError> {
        self.emit(Severity::Fatal, payload_fields(payload), msg)
    }
}

impl LogHandle for Logger {
    fn name(&self) -> &str {
        &self.name
    }

    fn current_level(&self) -> Severity {
        self.level
    }

    #[track_caller]
    fn emit(
        &self,
        level: Severity,
        payload: Map<String, Value>,
        msg: &str,
    ) -> Result<(), EmitError> {
        if !self.enabled(level) {
            return Ok(());
        }

        let mut fields = self.fields.clone();
        fields.extend(payload);
        let mut record = Record::new(&self.name, level, fields, msg);
        record.hostname = self.hostname.clone();
        if self.src {
            record.src = Some(SourceLocation::from(Location::caller()));
        }
        self.sink.write(&record)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("src", &self.src)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Objects become the payload as-is; `null` is no payload; any other value
/// is stored under `data`.
fn payload_fields(payload: Value) -> Map<String, Value> {
    match payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    }
}
