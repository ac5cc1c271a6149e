//! Unique name generation for logger directories and log files.
//!
//! Names are seeded by a human-readable description, optionally prefixed with
//! a short sortable timestamp token, and disambiguated against the existing
//! entries of a single directory by appending `_1`, `_2`, … before the
//! extension.

use std::path::Path;

use jiff::Zoned;

/// Short sortable timestamp token used in generated names.
///
/// Colon-free so the result is a legal filename on every platform.
const TIMESTAMP_FORMAT: &str = "%y-%m-%d-%H%M";

/// Generates a name from the description, timestamp, and extension which does
/// not already exist within the given directory.
///
/// The directory is scanned non-recursively on every call and nothing is
/// created, so the result is only as fresh as the directory snapshot: two
/// calls with no filesystem change in between return the same name. An empty
/// directory path (or `"."`) means the current working directory.
///
/// An empty description with no timestamp yields an empty base name, which is
/// returned as-is without a uniqueness scan.
pub fn unique_name(
    directory: impl AsRef<Path>,
    description: &str,
    timestamp: Option<&Zoned>,
    ext: &str,
) -> String {
    let directory = directory.as_ref();
    let prefix = match timestamp {
        Some(timestamp) => format!("{}_{description}", timestamp.strftime(TIMESTAMP_FORMAT)),
        None => description.to_string(),
    };
    if prefix.is_empty() {
        return ext.to_string();
    }
    let mut name = format!("{prefix}{ext}");
    let mut version = 1;
    while directory.join(&name).exists() {
        name = format!("{prefix}_{version}{ext}");
        version += 1;
    }
    name
}
