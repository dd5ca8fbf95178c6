use std::path::PathBuf;
use thiserror::Error;

/// Header construction failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("duplicate column name '{0}' in header")]
    DuplicateColumn(String),
}

/// Failures that abort a delimited-text write.
///
/// Nothing is written to the destination when any of these is returned.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error(
        "record {index} has fields {found:?} but the first record defines {expected:?}"
    )]
    SchemaMismatch {
        index: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("store '{0}' has no source path to write back to")]
    NoDestination(String),

    #[error("text cannot be encoded as {encoding}: {text:?}")]
    Unencodable { encoding: String, text: String },

    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Returned by `column_stats` when nothing in the column parses as a number
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("No numeric values found in column '{column}'")]
    NoNumericValues { column: String },
}

/// Failures converting between a Store and a JSON tree
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("element {index} is not an object")]
    NotAnObject { index: usize },

    #[error("expected a JSON array of objects")]
    NotAnArray,

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
