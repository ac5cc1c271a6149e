//! Data logs: a labeled dataset saved to a binary `.nc` file.

use std::cell::OnceCell;
use std::io;
use std::path::{Path, PathBuf};

use crate::dataset::{Coord, DataVar, Dataset};
use crate::error::{LogError, Result};
use crate::name::unique_name;

use super::LogMetadata;

/// A log whose payload is a [`Dataset`].
///
/// Metadata rides along in the dataset file's attribute map, each field
/// prefixed with `__metadata_`.
#[derive(Debug)]
pub struct DataLog {
    metadata: LogMetadata,
    dataset: Dataset,
    path: OnceCell<PathBuf>,
}

impl DataLog {
    const EXT: &'static str = ".nc";

    pub fn new(metadata: LogMetadata, dataset: Dataset) -> Self {
        Self {
            metadata,
            dataset,
            path: OnceCell::new(),
        }
    }

    /// Builds a data log from named coordinate and data variables.
    ///
    /// Dimension validation is the dataset's: every data variable dimension
    /// must name a coordinate, with matching lengths.
    pub fn from_variables(
        metadata: LogMetadata,
        coords: impl IntoIterator<Item = Coord>,
        data_vars: impl IntoIterator<Item = DataVar>,
    ) -> Result<Self> {
        let dataset = Dataset::from_variables(coords, data_vars)?;
        Ok(Self::new(metadata, dataset))
    }

    pub fn metadata(&self) -> &LogMetadata {
        &self.metadata
    }

    pub fn data(&self) -> &Dataset {
        &self.dataset
    }

    /// Path to the log file.
    ///
    /// Resolved on first access by generating a name unique within the
    /// metadata directory, then memoized: repeated calls, and repeated
    /// `save()` attempts, all target the same path.
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

    /// Saves the dataset and metadata to [`DataLog::path`].
    ///
    /// Fails with [`LogError::LogExists`] if a file already exists there.
    pub fn save(&self) -> Result<()> {
        let path = self.path();
        let mut dataset = self.dataset.clone();
        dataset.attrs_mut().extend(self.metadata.to_attrs());
        // The dataset write is create_new, so a racing writer loses here
        // with a collision rather than overwriting.
        match dataset.write(path) {
            Err(LogError::Io(e)) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(LogError::LogExists(path.to_path_buf()))
            }
            result => result,
        }
    }

    /// Loads a data log from the given file, splitting the metadata back out
    /// of the attribute map. The log's path is pinned to the given path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut dataset = Dataset::read(path)?;
        let metadata = LogMetadata::from_attrs(dataset.attrs_mut())?;
        Ok(Self {
            metadata,
            dataset,
            path: OnceCell::from(path.to_path_buf()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::dataset::ArrayData;
    use crate::log::tests::sample_metadata;

    fn sample_log(directory: &Path) -> DataLog {
        DataLog::from_variables(
            sample_metadata(directory),
            [Coord::new("time", [1, 2, 3]).with_units("s")],
            [DataVar::new("signal", "time", [10, 20, 30]).with_units("V")],
        )
        .unwrap()
    }

    #[test]
    fn path_is_resolved_once() {
        let dir = TempDir::new().unwrap();
        let log = sample_log(dir.path());

        let path = log.path().to_path_buf();
        assert_eq!(path, dir.path().join("test.nc"));

        // A new file would push a fresh scan to `test_1.nc`, but the log's
        // path is already pinned.
        std::fs::write(&path, "").unwrap();
        assert_eq!(log.path(), path);
    }

    #[test]
    fn save_and_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let log = sample_log(dir.path());
        log.save().unwrap();

        let loaded = DataLog::load(log.path()).unwrap();

        assert_eq!(loaded.metadata(), log.metadata());
        assert_eq!(loaded.data(), log.data());
        assert_eq!(loaded.path(), log.path());
        // Metadata attributes do not leak into the loaded dataset's attrs.
        assert!(loaded.data().attrs().is_empty());
    }

    #[test]
    fn dataset_attrs_survive_alongside_metadata() {
        let dir = TempDir::new().unwrap();
        let mut metadata = sample_metadata(dir.path());
        metadata.description = "annotated".into();
        let mut dataset = Dataset::from_variables(
            [Coord::new("time", [1, 2])],
            [DataVar::new("signal", "time", [1.5, 2.5])],
        )
        .unwrap();
        dataset.attrs_mut().insert("note".into(), "warm-up".into());
        let log = DataLog::new(metadata, dataset);
        log.save().unwrap();

        let loaded = DataLog::load(log.path()).unwrap();
        assert_eq!(loaded.data().attrs()["note"], "warm-up");
        assert_eq!(
            loaded.data().data_var("signal").unwrap().data,
            ArrayData::F64(vec![1.5, 2.5])
        );
    }

    #[test]
    fn second_save_collides() {
        let dir = TempDir::new().unwrap();
        let log = sample_log(dir.path());

        log.save().unwrap();
        let err = log.save().unwrap_err();

        assert!(matches!(err, LogError::LogExists(path) if path == log.path()));
    }

    #[test]
    fn save_never_truncates_a_file_that_appeared_after_resolution() {
        let dir = TempDir::new().unwrap();
        let log = sample_log(dir.path());
        let path = log.path().to_path_buf();

        // Another writer claims the name between resolution and save.
        std::fs::write(&path, "claimed").unwrap();
        let err = log.save().unwrap_err();

        assert!(matches!(err, LogError::LogExists(p) if p == path));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "claimed");
    }

    #[test]
    fn sibling_logs_get_distinct_names() {
        let dir = TempDir::new().unwrap();

        let first = sample_log(dir.path());
        first.save().unwrap();
        let second = sample_log(dir.path());
        second.save().unwrap();

        assert_eq!(first.path(), dir.path().join("test.nc"));
        assert_eq!(second.path(), dir.path().join("test_1.nc"));
    }
}
