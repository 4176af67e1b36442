//! Compatibility shim for free-text debug logging.
//!
//! Legacy call sites pass a printf-style format string and values; the shim
//! formats them and emits one structured record through a configured logger.
//! Messages default to `warn`; a message containing `[alert-operator]` is
//! escalated to `fatal` and flagged with `alert: true`.

pub mod adapter;
pub mod format;

pub use adapter::{translate, Channel, CompatAdapter, CompatEmitter, CompatRecord, DebugCompat};
pub use format::{format_message, FormatArg};

/// Error type for compat logging calls.
#[derive(Debug, thiserror::Error)]
pub enum CompatError {
    #[error("Compat logging call requires at least one argument")]
    InvalidCall,
    #[error(transparent)]
    Emit(#[from] envlog_logger::EmitError),
}

/// Emit one compat record from a format string and arguments.
///
/// ```ignore
/// let debug = logger.debug_compat("my-example:main");
/// compat!(debug, "this is a %s of json: %j formatting", "test", json!({"a": 1}))?;
/// ```
#[macro_export]
macro_rules! compat {
    ($emitter:expr, $($arg:expr),+ $(,)?) => {
        $emitter.emit(&[$($crate::FormatArg::from($arg)),+])
    };
}
