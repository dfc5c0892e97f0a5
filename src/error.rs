//! Error taxonomy for extraction, formatting and the surrounding tooling.
//!
//! The resolver itself has no error type: every precedence chain ends in a
//! default, so resolution is total over its inputs.

use thiserror::Error;

/// Malformed or inconsistent options found while extracting a message.
///
/// Aborts binding for the affected message only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("field '{field}' in message '{message}' references oneof index {index}, but the message declares {declared} oneof group(s)")]
    UnknownOneofIndex {
        message: String,
        field: String,
        index: i32,
        declared: usize,
    },

    #[error("field '{field}' in message '{message}' is a member of oneof '{oneof}', which has no options entry")]
    MissingOneofOptions {
        message: String,
        field: String,
        oneof: String,
    },

    #[error("invalid value for option '{option}' on {scope}: {reason}")]
    InvalidOptionValue {
        scope: String,
        option: String,
        reason: String,
    },

    #[error("a message declared in '{0}' has no name")]
    UnnamedMessage(String),

    #[error("field #{index} of message '{message}' has no name")]
    UnnamedField { message: String, index: usize },
}

/// A tag string that would be malformed if emitted.
///
/// Reported per field; the rest of the message still binds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("wire name '{wire_name}' of field '{field}' cannot be quoted in a struct tag")]
    InvalidWireName { field: String, wire_name: String },

    #[error("auto tag key '{key}' of field '{field}' is not a valid struct tag key")]
    InvalidTagKey { field: String, key: String },
}

/// Crate-level error for loading descriptors and configuration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl Error {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
