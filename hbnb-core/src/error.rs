use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or mutating a single record.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown record type `{0}`")]
    UnknownKind(String),

    #[error("stored fields must be a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid timestamp in `{field}`: `{value}` ({source})")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("field `{field}` must be a string")]
    InvalidField { field: String },

    #[error("attribute `{0}` is read-only")]
    ReadOnlyAttribute(String),
}

/// Errors raised by the storage engine.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no instance found: {0}")]
    NotFound(String),

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: top-level value must be a JSON object", .path.display())]
    InvalidLayout { path: PathBuf },

    #[error("entry `{key}` could not be rehydrated: {source}")]
    Format {
        key: String,
        #[source]
        source: ModelError,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode registry: {0}")]
    Encode(#[from] serde_json::Error),
}
