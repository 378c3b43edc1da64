//! JSON snapshot storage.
//!
//! Persists the most recent snapshot to a single pretty-printed JSON file
//! (`<data dir>/leetwatch/leetcode.json` unless configured otherwise).
//!
//! Supports:
//! - Loading, with absent and unparseable files reported separately
//! - Atomic overwrite (temp file + fsync + rename)

pub mod diff;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::snapshot::Snapshot;

const FILE_NAME: &str = "leetcode.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no snapshot at {}", .0.display())]
    NotFound(PathBuf),

    #[error("snapshot at {} is unreadable: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("failed to write snapshot to {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },

    #[error("could not determine data directory")]
    NoDataDir,
}

/// Snapshot file handle. Open once per command, borrow into the refresher.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

/// Get the default snapshot path (~/.local/share/leetwatch/leetcode.json or platform equivalent)
pub fn default_path() -> Result<PathBuf, StoreError> {
    let dirs = directories::ProjectDirs::from("", "", "leetwatch").ok_or(StoreError::NoDataDir)?;
    Ok(dirs.data_dir().join(FILE_NAME))
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Snapshot, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(self.corrupt(e)),
        };

        serde_json::from_str(&data).map_err(|e| self.corrupt(e))
    }

    /// Overwrite the stored snapshot.
    ///
    /// Writes a sibling temp file, fsyncs it and renames it over the target so
    /// a crash mid-write never leaves a truncated snapshot behind.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(snapshot).map_err(|e| self.write_failed(e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_failed(e))?;
        }

        let temp_path = self.temp_path();
        if let Err(e) = write_synced(&temp_path, json.as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(self.write_failed(e));
        }

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(self.write_failed(e));
        }

        tracing::debug!(path = %self.path.display(), bytes = json.len(), "snapshot written");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| FILE_NAME.to_string());
        self.path.with_file_name(format!("{name}.tmp.{}", std::process::id()))
    }

    fn corrupt(&self, reason: impl ToString) -> StoreError {
        StoreError::Corrupt { path: self.path.clone(), reason: reason.to_string() }
    }

    fn write_failed(&self, reason: impl ToString) -> StoreError {
        StoreError::Write { path: self.path.clone(), reason: reason.to_string() }
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.write_all(b"\n")?;
    file.sync_all()
}
