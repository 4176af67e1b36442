//! Standard payload serializers.

use serde_json::{Map, Value};
use std::any::type_name;
use std::error::Error;
use std::io;
use std::iter;

/// Payload key holding a serialized error.
pub const ERR_KEY: &str = "err";

/// Serialize an error as `{message, name, code?, sources?}`.
///
/// `name` is the error's type name without its module path, `code` is the
/// [`io::ErrorKind`] for I/O errors and `sources` lists the messages of the
/// `source()` chain, outermost first.
pub fn err_value<E: Error + 'static>(error: &E) -> Value {
    serialize_error(error, short_type_name(type_name::<E>()))
}

/// Like [`err_value`] for a type-erased error, which is named `Error`.
pub fn dyn_err_value(error: &(dyn Error + 'static)) -> Value {
    serialize_error(error, "Error")
}

/// Payload holding only the serialized error under `err`.
pub fn err_fields<E: Error + 'static>(error: &E) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(ERR_KEY.to_string(), err_value(error));
    fields
}

fn serialize_error(error: &(dyn Error + 'static), name: &str) -> Value {
    let mut err = Map::new();
    err.insert("message".to_string(), Value::String(error.to_string()));
    err.insert("name".to_string(), Value::String(name.to_string()));
    if let Some(io_error) = error.downcast_ref::<io::Error>() {
        err.insert(
            "code".to_string(),
            Value::String(format!("{:?}", io_error.kind())),
        );
    }

    let sources: Vec<Value> = iter::successors(error.source(), |e| (*e).source())
        .map(|e| Value::String(e.to_string()))
        .collect();
    if !sources.is_empty() {
        err.insert("sources".to_string(), Value::Array(sources));
    }
    Value::Object(err)
}

/// `envlog_config::LevelError` becomes `LevelError`; generic arguments are dropped.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
