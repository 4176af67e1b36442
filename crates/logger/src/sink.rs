//! Destinations for log records.

use crate::{EmitError, Record};
use envlog_config::Severity;
use serde_json::Value;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Destination for records produced by a [`Logger`](crate::Logger).
pub trait Sink: Send + Sync {
    /// Write one record; failures are returned to the emitting logger.
    fn write(&self, record: &Record) -> Result<(), EmitError>;
}

/// Writes one JSON object per line.
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    /// Sink over `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WriterSink<io::Stdout> {
    /// Sink over standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write(&self, record: &Record) -> Result<(), EmitError> {
        let line = serde_json::to_vec(record)?;
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(&line)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Forwards records to the active `tracing` subscriber.
///
/// `tracing` has no fatal level; fatal records become `ERROR` events with
/// `fatal = true`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn write(&self, record: &Record) -> Result<(), EmitError> {
        let fields = Value::Object(record.fields.clone());
        let src = record
            .src
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();

        macro_rules! forward {
            ($level:expr, $fatal:expr) => {
                tracing::event!(
                    target: "envlog",
                    $level,
                    logger = %record.name,
                    fatal = $fatal,
                    fields = %fields,
                    src = %src,
                    "{}",
                    record.msg
                )
            };
        }

        match record.level {
            Severity::Trace => forward!(tracing::Level::TRACE, false),
            Severity::Debug => forward!(tracing::Level::DEBUG, false),
            Severity::Info => forward!(tracing::Level::INFO, false),
            Severity::Warn => forward!(tracing::Level::WARN, false),
            Severity::Error => forward!(tracing::Level::ERROR, false),
            Severity::Fatal => forward!(tracing::Level::ERROR, true),
        }
        Ok(())
    }
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Record>>,
    failing: AtomicBool,
}

impl MemorySink {
    /// Empty sink that accepts writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn records(&self) -> Vec<Record> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything written so far.
    pub fn take(&self) -> Vec<Record> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// While failing, every write returns a broken pipe error and stores nothing.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Sink for MemorySink {
    fn write(&self, record: &Record) -> Result<(), EmitError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "memory sink closed").into());
        }
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}
