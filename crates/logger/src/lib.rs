//! Structured loggers whose level is chosen by the environment.
//!
//! [`setup_logger`] resolves the level for a [`LoggerConfig`] against the
//! captured environment and hands the result to a [`LoggerFactory`]. The
//! default factory builds [`Logger`] handles writing [`Record`]s to a [`Sink`].

pub mod factory;
pub mod handle;
pub mod logging;
pub mod record;
pub mod serializers;
pub mod sink;

pub use envlog_config::{EnvSettings, EnvSnapshot, LoggerConfig, Severity};
pub use factory::{setup_logger, LoggerFactory, SinkFactory};
pub use handle::{LogHandle, Logger};
pub use logging::init_logging;
pub use record::{Record, SourceLocation, RESERVED_KEYS};
pub use serializers::{dyn_err_value, err_fields, err_value, ERR_KEY};
pub use sink::{MemorySink, Sink, TracingSink, WriterSink};

/// Error raised while writing a record.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("Failed to write log record: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize log record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Error raised while constructing a logger.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("Logger name must not be empty")]
    MissingName,
    #[error(transparent)]
    Level(#[from] envlog_config::LevelError),
    #[error(transparent)]
    Emit(#[from] EmitError),
}
