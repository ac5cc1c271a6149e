//! Error and Result types for runlog operations.

use std::{io, path::PathBuf};

use thiserror::Error;

/// A convenience `Result` type for runlog operations.
pub type Result<T> = std::result::Result<T, LogError>;

/// Errors that can occur while naming, saving, or loading logs.
#[derive(Debug, Error)]
pub enum LogError {
    /// A log file already exists at the resolved path.
    ///
    /// Re-saving the same log instance, or losing a race to another writer,
    /// lands here. Recovery is the caller's job: build a new log so a fresh
    /// name is generated.
    #[error("log '{0}' already exists")]
    LogExists(PathBuf),

    /// Implicit commit tagging was requested against a store with no commits.
    #[error(
        "cannot tag log '{description}' with the most recent commit because \
         commit database '{db_path}' is empty"
    )]
    EmptyCommitDb { description: String, db_path: String },

    /// A dict log payload did not serialize to a JSON object.
    #[error("dict log payload for '{0}' is not a JSON object")]
    NotADict(String),

    /// A loaded JSON file's top-level value was not an object.
    #[error("'{0}' does not contain a JSON object")]
    NotAnObject(PathBuf),

    /// `load_log` was given a path with an extension it cannot dispatch on.
    #[error("'{0}' file extension is not supported")]
    UnsupportedExtension(String),

    /// A data variable references a dimension with no matching coordinate.
    #[error("unknown dimension '{dim}' for data variable '{name}'")]
    UnknownDimension { name: String, dim: String },

    /// A data variable's length does not match what its dimensions imply.
    #[error("data variable '{name}' has {actual} values but its dimensions imply {expected}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A stored file decoded, but not to the expected shape.
    #[error("corrupt log data: {0}")]
    Corrupt(String),

    /// The config file could not be read or parsed, or no home directory
    /// could be determined for the defaults.
    #[error("configuration error: {0}")]
    Config(String),

    /// Underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary dataset encoding or decoding error.
    #[error("dataset encoding error: {0}")]
    Encode(#[from] bincode::Error),

    /// Commit database error.
    #[error("commit database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
