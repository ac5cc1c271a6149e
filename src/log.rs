//! Log objects: a metadata envelope bound to a payload, saved to and loaded
//! from disk.
//!
//! Two kinds exist, each with its own file format:
//!
//! ```text
//! DataLog   <description>[_<n>].nc     # binary dataset, metadata in the attribute map
//! DictLog   <description>[_<n>].json   # pretty-printed JSON, metadata under "__metadata"
//! ```
//!
//! A log resolves its own file name once, on first use, and keeps it for the
//! life of the in-memory object. Saving never overwrites: a second `save()`
//! on the same log, or a race with another writer, fails with
//! [`LogError::LogExists`].

mod data;
mod dict;

pub use data::DataLog;
pub use dict::DictLog;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use jiff::Zoned;
use serde::{Deserialize, Serialize};

use crate::error::{LogError, Result};

/// Prefix for metadata fields flattened into a dataset's attribute map.
pub(crate) const METADATA_ATTR_PREFIX: &str = "__metadata_";

/// Reserved top-level key holding metadata in a dict log's JSON file.
pub(crate) const METADATA_KEY: &str = "__metadata";

/// Metadata identifying and describing a single log.
///
/// Immutable once created; timestamps are ISO-8601 strings on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMetadata {
    /// Directory the log was created in.
    pub directory: PathBuf,

    /// When the log was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Zoned>,

    /// Human-readable label, the seed for the generated file name.
    pub description: String,

    /// Version tag from the commit database, if one was attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<i64>,

    /// Backing location of the commit database, if one was attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_db_path: Option<String>,
}

impl LogMetadata {
    /// Flattens the metadata into prefixed entries for a dataset's attribute
    /// map. `None` fields are omitted.
    pub(crate) fn to_attrs(&self) -> BTreeMap<String, String> {
        let mut attrs = BTreeMap::new();
        let mut put = |field: &str, value: String| {
            attrs.insert(format!("{METADATA_ATTR_PREFIX}{field}"), value);
        };
        put("directory", self.directory.to_string_lossy().into_owned());
        if let Some(timestamp) = &self.timestamp {
            put("timestamp", timestamp.to_string());
        }
        put("description", self.description.clone());
        if let Some(commit_id) = self.commit_id {
            put("commit_id", commit_id.to_string());
        }
        if let Some(commit_db_path) = &self.commit_db_path {
            put("commit_db_path", commit_db_path.clone());
        }
        attrs
    }

    /// Rebuilds metadata from a dataset's attribute map, removing the
    /// prefixed entries it consumes.
    pub(crate) fn from_attrs(attrs: &mut BTreeMap<String, String>) -> Result<Self> {
        let mut take = |field: &str| attrs.remove(&format!("{METADATA_ATTR_PREFIX}{field}"));
        let directory = take("directory")
            .ok_or_else(|| LogError::Corrupt("missing metadata directory".into()))?;
        let timestamp = take("timestamp")
            .map(|value| {
                value
                    .parse::<Zoned>()
                    .map_err(|e| LogError::Corrupt(format!("invalid metadata timestamp: {e}")))
            })
            .transpose()?;
        let description = take("description")
            .ok_or_else(|| LogError::Corrupt("missing metadata description".into()))?;
        let commit_id = take("commit_id")
            .map(|value| {
                value
                    .parse::<i64>()
                    .map_err(|e| LogError::Corrupt(format!("invalid metadata commit_id: {e}")))
            })
            .transpose()?;
        let commit_db_path = take("commit_db_path");
        Ok(Self {
            directory: PathBuf::from(directory),
            timestamp,
            description,
            commit_id,
            commit_db_path,
        })
    }
}

/// A loaded log of either kind.
#[derive(Debug)]
pub enum Log {
    Data(DataLog),
    Dict(DictLog),
}

impl Log {
    pub fn metadata(&self) -> &LogMetadata {
        match self {
            Log::Data(log) => log.metadata(),
            Log::Dict(log) => log.metadata(),
        }
    }
}

/// Loads the log at the given path, dispatching on the file extension:
/// `.nc` for a [`DataLog`], `.json` for a [`DictLog`].
pub fn load_log(path: impl AsRef<Path>) -> Result<Log> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("nc") => Ok(Log::Data(DataLog::load(path)?)),
        Some("json") => Ok(Log::Dict(DictLog::load(path)?)),
        other => Err(LogError::UnsupportedExtension(
            other.unwrap_or_default().to_string(),
        )),
    }
}
