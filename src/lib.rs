//! Deterministic naming and versioned persistence for experiment logs.
//!
//! Runlog sits between an experiment script and the filesystem: it turns a
//! logical hierarchy (root → graph → node, or any depth you like) plus
//! human-readable descriptions into collision-free directory and file names,
//! optionally tags each log with the latest commit ID from a versioned
//! parameter store, and saves either a labeled [`Dataset`] (`.nc`) or an
//! arbitrary JSON object (`.json`) together with its [`LogMetadata`].
//!
//! # Example
//!
//! ```
//! use runlog::{Coord, DataVar, Logger};
//!
//! # fn main() -> runlog::Result<()> {
//! # let tmp = tempfile::tempdir().unwrap();
//! # let base = tmp.path().join("data_logs");
//! let root = Logger::new(&base)?;
//! let node = root.sub_logger("cross_entropy").sub_logger("rabi_calibration");
//!
//! let log = node.log_data(
//!     "rabi",
//!     [Coord::new("time", [1, 2, 3]).with_units("s")],
//!     [DataVar::new("signal", "time", [10, 20, 30]).with_units("V")],
//!     None,
//! )?;
//! assert!(log.path().is_file());
//! # Ok(())
//! # }
//! ```
//!
//! Names never collide within a directory: a second `"rabi"` log in the same
//! node becomes `rabi_1.nc`, a second `"cross_entropy"` sub-logger in the
//! same minute becomes `…_cross_entropy_1`. Saving never overwrites — if two
//! processes race to the same generated name, one wins and the other gets
//! [`LogError::LogExists`].

mod commit;
mod config;
mod dataset;
mod error;
mod log;
mod logger;
mod name;
mod props;

pub use commit::{Commit, CommitDb, CommitSource};
pub use config::{Config, default_log_directory, resolve_log_directory};
pub use dataset::{ArrayData, Coord, DataVar, Dataset, Variable};
pub use error::{LogError, Result};
pub use log::{DataLog, DictLog, Log, LogMetadata, load_log};
pub use logger::Logger;
pub use name::unique_name;
pub use props::{LoggedProps, json_props};
