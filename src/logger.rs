//! Hierarchical loggers: a tree of directories with lazily generated,
//! collision-free names.
//!
//! A root logger owns a base directory. Each call to
//! [`Logger::sub_logger`] allocates a child whose directory name is derived
//! from a description plus a timestamp taken when the name is first needed,
//! so the timestamp reflects when content was actually created:
//!
//! ```text
//! data_logs/                          # root: created eagerly, reused as-is
//!   25-08-26-1432_cross_entropy/      # sub-logger, named on first use
//!     25-08-26-1433_rabi_calibration/
//!       rabi.nc                       # log files, named per save
//!       rabi_1.nc
//!       settings.json
//! ```
//!
//! Name resolution is write-once: a logger computes its name a single time
//! and keeps it for the life of the handle. Computing a name (pure, a
//! directory scan) and creating the directory (effectful) are two separate
//! steps — [`Logger::path`] does the former, [`Logger::directory`] both.

use std::cell::OnceCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use jiff::Zoned;
use serde::Serialize;
use serde_json::Value;

use crate::commit::{CommitDb, CommitSource};
use crate::config::{Config, resolve_log_directory};
use crate::dataset::{Coord, DataVar};
use crate::error::{LogError, Result};
use crate::log::{DataLog, DictLog, LogMetadata};
use crate::name::unique_name;
use crate::props::LoggedProps;

/// A logger corresponding to one directory in the log hierarchy.
///
/// Handles are cheap to clone and share their resolved state. A logger is
/// single-threaded by design; wrap access in your own synchronization if you
/// must share one across threads.
#[derive(Clone)]
pub struct Logger {
    inner: Rc<Inner>,
}

struct Inner {
    kind: Kind,
    commit_db: Option<Rc<dyn CommitSource>>,
    /// Resolved directory name. Write-once; pre-set for untimestamped
    /// sub-loggers, filled on first path resolution otherwise.
    name: OnceCell<String>,
    /// Timestamp captured at first path resolution, frozen thereafter.
    timestamp: OnceCell<Zoned>,
}

enum Kind {
    Root { directory: PathBuf },
    Sub { parent: Rc<Inner>, description: String },
}

impl Inner {
    /// Resolves this logger's path without touching the filesystem beyond
    /// the collision scan. The name and timestamp are memoized on first call.
    fn path(&self) -> PathBuf {
        match &self.kind {
            Kind::Root { directory } => directory.clone(),
            Kind::Sub {
                parent,
                description,
            } => {
                let parent_path = parent.path();
                let name = self.name.get_or_init(|| {
                    let timestamp = self.timestamp.get_or_init(Zoned::now);
                    unique_name(&parent_path, description, Some(timestamp), "")
                });
                parent_path.join(name)
            }
        }
    }
}

impl Logger {
    /// Creates a root logger at the given base directory.
    ///
    /// The directory is created immediately; an existing directory is reused
    /// as-is, with no uniqueness suffixing at the root.
    pub fn new(root_directory: impl Into<PathBuf>) -> Result<Self> {
        Self::build(root_directory.into(), None)
    }

    /// Creates a root logger with an attached commit source, used to tag
    /// logs with the latest commit ID. The handle is shared by every
    /// descendant sub-logger.
    pub fn with_commit_db(
        root_directory: impl Into<PathBuf>,
        commit_db: Rc<dyn CommitSource>,
    ) -> Result<Self> {
        Self::build(root_directory.into(), Some(commit_db))
    }

    /// Creates a root logger at the configured default location.
    ///
    /// The base directory comes from the tiered chain in
    /// [`resolve_log_directory`]; if the config file names a commit
    /// database, it is opened and attached.
    pub fn default_root() -> Result<Self> {
        let config = Config::load().map_err(LogError::Config)?;
        let directory = resolve_log_directory(None).map_err(LogError::Config)?;
        Self::from_config(&config, directory)
    }

    /// Creates a root logger at the given base directory, attaching the
    /// commit database named by the config, if any.
    pub fn from_config(config: &Config, root_directory: impl Into<PathBuf>) -> Result<Self> {
        match &config.commit_db {
            Some(path) => Self::with_commit_db(root_directory, Rc::new(CommitDb::open(path)?)),
            None => Self::new(root_directory),
        }
    }

    fn build(directory: PathBuf, commit_db: Option<Rc<dyn CommitSource>>) -> Result<Self> {
        fs::create_dir_all(&directory)?;
        Ok(Self {
            inner: Rc::new(Inner {
                kind: Kind::Root { directory },
                commit_db,
                name: OnceCell::new(),
                timestamp: OnceCell::new(),
            }),
        })
    }

    /// Creates a sub-logger for a timestamped subdirectory.
    ///
    /// Pure allocation: the name is generated, and the directory created,
    /// only when first needed, so the timestamp reflects first use rather
    /// than construction.
    pub fn sub_logger(&self, description: impl Into<String>) -> Logger {
        self.make_sub(description.into(), None)
    }

    /// Creates a sub-logger whose directory name is exactly the description,
    /// with no timestamp and no uniqueness suffixing: an existing directory
    /// of that name is reused. Creation is still deferred to first use.
    pub fn named_sub_logger(&self, description: impl Into<String>) -> Logger {
        let description = description.into();
        self.make_sub(description.clone(), Some(description))
    }

    fn make_sub(&self, description: String, fixed_name: Option<String>) -> Logger {
        let name = match fixed_name {
            Some(fixed_name) => OnceCell::from(fixed_name),
            None => OnceCell::new(),
        };
        Logger {
            inner: Rc::new(Inner {
                kind: Kind::Sub {
                    parent: Rc::clone(&self.inner),
                    description,
                },
                commit_db: self.inner.commit_db.clone(),
                name,
                timestamp: OnceCell::new(),
            }),
        }
    }

    /// This logger's directory path, resolved and memoized on first call.
    ///
    /// Resolution scans the parent's directory for collisions but creates
    /// nothing; use [`Logger::directory`] when the directory must exist.
    pub fn path(&self) -> PathBuf {
        self.inner.path()
    }

    /// This logger's directory path, created on disk along with any missing
    /// ancestors. Creation is idempotent.
    pub fn directory(&self) -> Result<PathBuf> {
        let path = self.inner.path();
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// The timestamp captured when this logger's name was resolved, if it
    /// has been.
    pub fn timestamp(&self) -> Option<&Zoned> {
        self.inner.timestamp.get()
    }

    /// A path for a file or directory with the given name inside this
    /// logger's directory. The directory is created; the named entry is not
    /// checked or touched.
    pub fn file_path(&self, name: &str) -> Result<PathBuf> {
        Ok(self.directory()?.join(name))
    }

    /// Saves a [`DataLog`] built from the given coordinate and data
    /// variables, named by the description, and returns it.
    ///
    /// The log is tagged with the given commit ID, or the attached commit
    /// source's latest commit if `None` (an error if the source is empty; no
    /// tag at all if no source is attached).
    pub fn log_data(
        &self,
        description: &str,
        coords: impl IntoIterator<Item = Coord>,
        data_vars: impl IntoIterator<Item = DataVar>,
        commit_id: Option<i64>,
    ) -> Result<DataLog> {
        let commit_id = self.resolve_commit_id(description, commit_id)?;
        let metadata = self.log_metadata(description, commit_id)?;
        let log = DataLog::from_variables(metadata, coords, data_vars)?;
        log.save()?;
        Ok(log)
    }

    /// Saves a [`DictLog`] with the given payload and returns it.
    ///
    /// The payload may be anything serializable, but must serialize to a
    /// JSON object; anything else fails with [`LogError::NotADict`]. Commit
    /// tagging follows [`Logger::log_data`].
    pub fn log_dict(
        &self,
        description: &str,
        payload: impl Serialize,
        commit_id: Option<i64>,
    ) -> Result<DictLog> {
        let Value::Object(payload) = serde_json::to_value(&payload)? else {
            return Err(LogError::NotADict(description.to_string()));
        };
        let commit_id = self.resolve_commit_id(description, commit_id)?;
        let metadata = self.log_metadata(description, commit_id)?;
        let log = DictLog::new(metadata, payload);
        log.save()?;
        Ok(log)
    }

    /// Saves a [`DictLog`] of the given object's logged properties and
    /// returns it.
    ///
    /// Which properties are recorded is the object's choice via its
    /// [`LoggedProps`] impl; see [`crate::json_props`] for the
    /// log-everything fallback. Commit tagging follows [`Logger::log_data`].
    pub fn log_props(
        &self,
        description: &str,
        object: &dyn LoggedProps,
        commit_id: Option<i64>,
    ) -> Result<DictLog> {
        let props = object.logged_props();
        let commit_id = self.resolve_commit_id(description, commit_id)?;
        let metadata = self.log_metadata(description, commit_id)?;
        let log = DictLog::new(metadata, props);
        log.save()?;
        Ok(log)
    }

    /// An explicit commit ID is used verbatim. Otherwise the attached
    /// source's latest commit is used, failing on an empty source; with no
    /// source attached, logs go untagged.
    fn resolve_commit_id(&self, description: &str, commit_id: Option<i64>) -> Result<Option<i64>> {
        if commit_id.is_some() {
            return Ok(commit_id);
        }
        let Some(commit_db) = &self.inner.commit_db else {
            return Ok(None);
        };
        match commit_db.latest_commit()? {
            Some(commit) => Ok(Some(commit.id)),
            None => Err(LogError::EmptyCommitDb {
                description: description.to_string(),
                db_path: commit_db.path().to_string(),
            }),
        }
    }

    fn log_metadata(&self, description: &str, commit_id: Option<i64>) -> Result<LogMetadata> {
        Ok(LogMetadata {
            directory: self.directory()?,
            timestamp: Some(Zoned::now()),
            description: description.to_string(),
            commit_id,
            commit_db_path: self
                .inner
                .commit_db
                .as_ref()
                .map(|commit_db| commit_db.path().to_string()),
        })
    }
}
