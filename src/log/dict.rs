//! Dict logs: an arbitrary JSON object saved to a pretty-printed `.json` file.

use std::cell::OnceCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{LogError, Result};
use crate::name::unique_name;

use super::{LogMetadata, METADATA_KEY};

/// A log whose payload is a JSON object.
///
/// On disk the payload's keys sit at the top level, alongside a reserved
/// `__metadata` key holding the metadata; loading pops that key back out.
#[derive(Debug)]
pub struct DictLog {
    metadata: LogMetadata,
    data: Map<String, Value>,
    path: OnceCell<PathBuf>,
}

impl DictLog {
    const EXT: &'static str = ".json";

    pub fn new(metadata: LogMetadata, data: Map<String, Value>) -> Self {
        Self {
            metadata,
            data,
            path: OnceCell::new(),
        }
    }

    pub fn metadata(&self) -> &LogMetadata {
        &self.metadata
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Path to the log file. Resolved once, then memoized.
    pub fn path(&self) -> &Path {
        self.path.get_or_init(|| {
            let name = unique_name(
                &self.metadata.directory,
                &self.metadata.description,
                None,
                Self::EXT,
            );
            self.metadata.directory.join(name)
        })
    }

    /// Saves the payload and metadata to [`DictLog::path`].
    ///
    /// Fails with [`LogError::LogExists`] if a file already exists there.
    pub fn save(&self) -> Result<()> {
        let path = self.path();
        let mut with_metadata = self.data.clone();
        with_metadata.insert(METADATA_KEY.into(), serde_json::to_value(&self.metadata)?);
        let json = serde_json::to_string_pretty(&Value::Object(with_metadata))?;
        // create_new makes the collision check atomic: when two writers race
        // to the same generated name, the loser fails here instead of
        // truncating the winner's file.
        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(LogError::LogExists(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Loads a dict log from the given file, popping the reserved metadata
    /// key back out of the payload. The log's path is pinned to the given
    /// path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&json)?;
        let Value::Object(mut data) = value else {
            return Err(LogError::NotAnObject(path.to_path_buf()));
        };
        let metadata_value = data.remove(METADATA_KEY).ok_or_else(|| {
            LogError::Corrupt(format!("'{}' has no {METADATA_KEY} entry", path.display()))
        })?;
        let metadata: LogMetadata = serde_json::from_value(metadata_value)?;
        Ok(Self {
            metadata,
            data,
            path: OnceCell::from(path.to_path_buf()),
        })
    }
}
