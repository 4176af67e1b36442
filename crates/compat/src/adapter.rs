//! Translation of free-text calls into structured records.

use crate::{format_message, CompatError, FormatArg};
use envlog_config::Severity;
use envlog_logger::LogHandle;
use serde_json::{Map, Value};
use tracing::debug;

/// Substring that escalates a compat message to `fatal`.
pub const ALERT_MARKER: &str = "[alert-operator]";

/// Severity of compat messages without the alert marker.
pub const DEFAULT_SEVERITY: Severity = Severity::Warn;

/// Payload key holding the subsystem name.
pub const SOURCE_NAME_FIELD: &str = "source_name";
/// Payload key marking records produced by the shim.
pub const COMPAT_FIELD: &str = "is_compat";
/// Payload key set on escalated records.
pub const ALERT_FIELD: &str = "alert";

/// Where a compat message claims to come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    /// A named subsystem sharing the logger; recorded under `source_name`.
    Subsystem(String),
    /// The logger itself.
    Flat,
}

/// A translated compat call, ready to emit.
#[derive(Debug, Clone, PartialEq)]
pub struct CompatRecord {
    /// `warn`, or `fatal` when escalated.
    pub level: Severity,
    /// Subsystem name, absent on the flat channel.
    pub source_name: Option<String>,
    /// Whether the message carried the alert marker.
    pub alert: bool,
    /// Fully formatted message.
    pub message: String,
}

impl CompatRecord {
    /// Structured payload: `{source_name?, is_compat: true, alert?: true}`.
    pub fn payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        if let Some(name) = &self.source_name {
            payload.insert(SOURCE_NAME_FIELD.to_string(), Value::String(name.clone()));
        }
        payload.insert(COMPAT_FIELD.to_string(), Value::Bool(true));
        if self.alert {
            payload.insert(ALERT_FIELD.to_string(), Value::Bool(true));
        }
        payload
    }
}

/// Format a call and decide its severity.
pub fn translate(channel: &Channel, args: &[FormatArg]) -> Result<CompatRecord, CompatError> {
    if args.is_empty() {
        return Err(CompatError::InvalidCall);
    }

    let message = format_message(args);
    let alert = message.contains(ALERT_MARKER);
    let source_name = match channel {
        Channel::Subsystem(name) => Some(name.clone()),
        Channel::Flat => None,
    };

    Ok(CompatRecord {
        level: if alert { Severity::Fatal } else { DEFAULT_SEVERITY },
        source_name,
        alert,
        message,
    })
}

/// Attaches compat emitters to a configured logger.
#[derive(Debug, Clone)]
pub struct CompatAdapter<L> {
    logger: L,
}

impl<L: LogHandle + Clone> CompatAdapter<L> {
    /// Wrap a logger whose level is already resolved.
    pub fn new(logger: L) -> Self {
        Self { logger }
    }

    /// Reusable emitter tagging every record with a subsystem name.
    pub fn subsystem(&self, name: impl Into<String>) -> CompatEmitter<L> {
        CompatEmitter::new(self.logger.clone(), Channel::Subsystem(name.into()))
    }

    /// Emitter speaking as the logger itself.
    pub fn flat(&self) -> CompatEmitter<L> {
        CompatEmitter::new(self.logger.clone(), Channel::Flat)
    }

    /// The wrapped logger.
    pub fn logger(&self) -> &L {
        &self.logger
    }
}

/// Emits compat records on one channel.
#[derive(Debug, Clone)]
pub struct CompatEmitter<L> {
    logger: L,
    channel: Channel,
}

impl<L: LogHandle> CompatEmitter<L> {
    /// Emitter writing to `logger` on `channel`.
    pub fn new(logger: L, channel: Channel) -> Self {
        Self { logger, channel }
    }

    /// Channel recorded with each message.
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Format `args` and emit exactly one record.
    ///
    /// Fails with [`CompatError::InvalidCall`] for an empty argument list,
    /// in which case nothing is emitted. Logger failures are returned as-is.
    #[track_caller]
    pub fn emit(&self, args: &[FormatArg]) -> Result<(), CompatError> {
        let record = translate(&self.channel, args)?;
        if record.alert {
            debug!(logger = self.logger.name(), channel = ?self.channel, "compat message escalated to fatal");
        }
        self.logger
            .emit(record.level, record.payload(), &record.message)?;
        Ok(())
    }
}

/// `logger.debug_compat(name)` for any cloneable logger handle.
pub trait DebugCompat: LogHandle + Clone + Sized {
    fn debug_compat(&self, name: impl Into<String>) -> CompatEmitter<Self> {
        CompatAdapter::new(self.clone()).subsystem(name)
    }
}

impl<L: LogHandle + Clone> DebugCompat for L {}
