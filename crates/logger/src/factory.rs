//! Logger construction.

use crate::{LogHandle, Logger, SetupError, Sink, TracingSink, WriterSink};
use envlog_config::{resolve, EnvSnapshot, LoggerConfig, Severity};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Builds logger handles from a resolved configuration.
///
/// This trait lets callers plug in their own logging backend; the level
/// resolution in [`setup_logger`] does not depend on the implementation.
pub trait LoggerFactory {
    type Logger: LogHandle;

    /// Create a logger. The configuration's `level` is already final.
    fn create(&self, config: &LoggerConfig) -> Result<Self::Logger, SetupError>;
}

/// Factory for [`Logger`]s that all write to one sink.
#[derive(Clone)]
pub struct SinkFactory {
    sink: Arc<dyn Sink>,
}

impl SinkFactory {
    /// Factory for loggers sharing `sink`.
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self { sink }
    }

    /// JSON lines on standard output.
    pub fn stdout() -> Self {
        Self::new(Arc::new(WriterSink::stdout()))
    }

    /// Events on the active `tracing` subscriber.
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl LoggerFactory for SinkFactory {
    type Logger = Logger;

    fn create(&self, config: &LoggerConfig) -> Result<Logger, SetupError> {
        if config.name().is_empty() {
            return Err(SetupError::MissingName);
        }
        Ok(Logger::new(config, self.sink.clone()))
    }
}

/// Create a logger whose level may be overridden by the environment.
///
/// The rule string in `env` takes precedence over `config.level`. When it
/// changes a level the code asked for, the new logger says so with one
/// `warn` record. Any failure aborts construction; no logger is returned.
pub fn setup_logger<F: LoggerFactory>(
    factory: &F,
    mut config: LoggerConfig,
    env: &EnvSnapshot,
) -> Result<F::Logger, SetupError> {
    if config.name().is_empty() {
        return Err(SetupError::MissingName);
    }
    if env.force_source_location {
        config.src = true;
    }

    let used = resolve(env.rules.as_deref(), &config)?;
    let requested = config.level.replace(used);
    let logger = factory.create(&config)?;
    debug!(logger = config.name(), level = %used, "logger created");

    if let Some(requested) = requested.filter(|requested| *requested != used) {
        let payload = json!({ "requested": requested, "used": used });
        logger.emit(
            Severity::Warn,
            payload_map(payload),
            "using log level from environment instead of code",
        )?;
    }

    Ok(logger)
}

fn payload_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySink;
    use envlog_config::LevelError;

    fn memory_factory() -> (SinkFactory, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (SinkFactory::new(sink.clone()), sink)
    }

    #[test]
    fn test_defaults_to_info() {
        let (factory, _sink) = memory_factory();
        let log = setup_logger(&factory, LoggerConfig::new("test"), &EnvSnapshot::default())
            .unwrap();
        assert_eq!(log.current_level(), Severity::Info);
    }

    #[test]
    fn test_environment_overrides_code() {
        let (factory, sink) = memory_factory();
        let config = LoggerConfig::new("worker").with_level(Severity::Error);
        let env = EnvSnapshot::with_rules("api:info, worker:trace, *:fatal");

        let log = setup_logger(&factory, config, &env).unwrap();
        assert_eq!(log.current_level(), Severity::Trace);

        let records = sink.take();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Severity::Warn);
        assert_eq!(records[0].msg, "using log level from environment instead of code");
        assert_eq!(records[0].field("requested"), Some(&json!("error")));
        assert_eq!(records[0].field("used"), Some(&json!("trace")));
    }

    #[test]
    fn test_override_notice_respects_new_level() {
        // Raising the level to fatal filters out the warn notice itself.
        let (factory, sink) = memory_factory();
        let config = LoggerConfig::new("scheduler").with_level(Severity::Debug);
        let env = EnvSnapshot::with_rules("*:fatal");

        let log = setup_logger(&factory, config, &env).unwrap();
        assert_eq!(log.current_level(), Severity::Fatal);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_no_notice_when_level_unchanged() {
        let (factory, sink) = memory_factory();
        let config = LoggerConfig::new("api").with_level(Severity::Info);
        let env = EnvSnapshot::with_rules("api:info");
        setup_logger(&factory, config, &env).unwrap();
        assert!(sink.is_empty());

        setup_logger(&factory, LoggerConfig::new("api"), &EnvSnapshot::with_rules("api:trace"))
            .unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_malformed_rules_abort_setup() {
        let (factory, sink) = memory_factory();
        let err = setup_logger(
            &factory,
            LoggerConfig::new("scheduler"),
            &EnvSnapshot::with_rules("bogus"),
        )
        .unwrap_err();
        assert!(matches!(err, SetupError::Level(LevelError::MalformedRule { .. })));

        let err = setup_logger(
            &factory,
            LoggerConfig::new("scheduler"),
            &EnvSnapshot::with_rules("*:loud"),
        )
        .unwrap_err();
        assert!(matches!(err, SetupError::Level(LevelError::UnknownLevel { .. })));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_missing_name() {
        let (factory, _sink) = memory_factory();
        assert!(matches!(
            setup_logger(&factory, LoggerConfig::new(""), &EnvSnapshot::default()),
            Err(SetupError::MissingName)
        ));
        assert!(matches!(
            factory.create(&LoggerConfig::new("")),
            Err(SetupError::MissingName)
        ));
    }

    #[test]
    fn test_force_source_location() {
        let (factory, sink) = memory_factory();
        let env = EnvSnapshot {
            rules: None,
            force_source_location: true,
        };
        let log = setup_logger(&factory, LoggerConfig::new("test"), &env).unwrap();
        log.info(Value::Null, "where").unwrap();
        assert!(sink.take()[0].src.is_some());
    }

    #[test]
    fn test_notice_write_failure_aborts_setup() {
        let (factory, sink) = memory_factory();
        sink.set_failing(true);
        let config = LoggerConfig::new("worker").with_level(Severity::Error);
        let err = setup_logger(&factory, config, &EnvSnapshot::with_rules("worker:warn"))
            .unwrap_err();
        assert!(matches!(err, SetupError::Emit(_)));
    }
}
