//! JSON snapshot file for the price history.
//!
//! The whole history is rewritten on every save. The file holds a single
//! pretty-printed JSON array, newest first:
//!
//! ```json
//! [
//!   { "id": 1760619600000, "date": "16/10/2026, 15:00:00", "price": "10.99 USD" }
//! ]
//! ```

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::{History, Observation};
use crate::error::Result;
use crate::port::HistoryStore;

/// History store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling written before the rename: `<file name>.tmp`.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> History {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No history file yet");
                return History::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read history, starting empty");
                return History::new();
            }
        };

        match serde_json::from_str::<Vec<Observation>>(&content) {
            Ok(entries) => History::from_entries(entries),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to parse history, starting empty");
                History::new()
            }
        }
    }

    /// Write the snapshot atomically.
    ///
    /// Uses write-to-temp-then-rename so a crash mid-write never leaves a
    /// truncated snapshot behind. Creates the parent directory if needed.
    fn save(&self, history: &History) -> Result<()> {
        let json = serde_json::to_string_pretty(history)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path)?;

        let cleanup_and_err = |e| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;

        Ok(())
    }
}
