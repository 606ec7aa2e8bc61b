//! High score persistence backed by a small TOML file.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use delivery_rush_system_scoring::{HighScoreStore, StoreError};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

#[derive(Debug, Deserialize, Serialize)]
struct HighScoreRecord {
    #[serde(rename = "highScore")]
    high_score: u64,
}

/// Stores the high score as `highScore = <n>` in a TOML file.
///
/// Writes go to a sibling temporary file that replaces the target in one
/// rename, so an interrupted write leaves the previous value intact.
#[derive(Clone, Debug)]
pub(crate) struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    /// Creates a store reading and writing the provided file.
    #[must_use]
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File backing the store.
    #[must_use]
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&mut self) -> Result<Option<u64>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        let record: HighScoreRecord = toml::from_str(&contents)
            .map_err(|error| StoreError::Malformed(error.to_string()))?;
        Ok(Some(record.high_score))
    }

    fn store(&mut self, high_score: u64) -> Result<(), StoreError> {
        let contents = toml::to_string(&HighScoreRecord { high_score })
            .map_err(|error| StoreError::Malformed(error.to_string()))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(contents.as_bytes())?;
        staged.as_file().sync_all()?;
        let _ = staged.persist(&self.path).map_err(|error| error.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_no_score() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = FileHighScoreStore::new(dir.path().join("score.toml"));

        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn stored_value_survives_reload() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("score.toml");
        let mut store = FileHighScoreStore::new(&path);
        store.store(1_250).expect("store");

        let written = fs::read_to_string(store.path()).expect("read back");
        assert_eq!(written.trim(), "highScore = 1250");

        let mut reopened = FileHighScoreStore::new(path);
        assert_eq!(reopened.load().expect("load"), Some(1_250));
    }

    #[test]
    fn rewrites_replace_the_file_without_leftovers() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("score.toml");
        let mut store = FileHighScoreStore::new(&path);
        for value in [100, 200, 300] {
            store.store(value).expect("store");
        }

        let entries: Vec<_> = fs::read_dir(dir.path())
            .expect("list dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("score.toml")]);
        assert_eq!(store.load().expect("load"), Some(300));
    }

    #[test]
    fn garbage_is_reported_as_malformed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("score.toml");
        fs::write(&path, "highScore = \"lots\"").expect("write");

        let mut store = FileHighScoreStore::new(path);
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }
}
