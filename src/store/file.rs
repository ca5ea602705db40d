use std::fmt::Write as _;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::SnapshotStore;
use crate::error::StoreError;

/// One file per key under a directory.
///
/// Writes go to a uniquely named temp file in the same directory, are synced,
/// then renamed over the snapshot, so readers see either the old or the new
/// value and concurrent writers never share a temp path.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::Io {
            key: dir.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

/// Reversible key encoding: `[A-Za-z0-9.-]` is kept, `_` becomes `__`, and
/// every other byte becomes `_` plus two hex digits (`@` -> `_40`).
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'-' => stem.push(byte as char),
            b'_' => stem.push_str("__"),
            other => {
                let _ = write!(stem, "_{:02x}", other);
            }
        }
    }
    stem
}

fn io_error(key: &str, e: std::io::Error) -> StoreError {
    StoreError::Io {
        key: key.to_string(),
        message: e.to_string(),
    }
}

impl SnapshotStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| io_error(key, e))?;
        tmp.as_file_mut()
            .write_all(value.as_bytes())
            .map_err(|e| io_error(key, e))?;
        tmp.as_file().sync_all().map_err(|e| io_error(key, e))?;
        tmp.persist(&path).map_err(|e| io_error(key, e.error))?;
        debug!(path = %path.display(), bytes = value.len(), "Snapshot written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}
