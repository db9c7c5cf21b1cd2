//! Whole-file JSON array stores.
//!
//! Each store owns one path. Writers always replace the whole file by writing
//! a sibling temp file and renaming it over the target, so readers see either
//! the previous array or the new one, never a partial write.

use crate::error::{PersistenceError, PersistenceResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use spreadwatch_core::{MarketCandidate, SpreadSample};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Candidate Store: written by the scanner, read by the spread loop.
pub type CandidateStore = JsonFileStore<MarketCandidate>;

/// Results Store: overwritten every spread cycle.
pub type ResultsStore = JsonFileStore<SpreadSample>;

/// JSON array file of `T`.
#[derive(Debug, Clone)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole array.
    ///
    /// A missing file is an empty store. Unparsable content is
    /// [`PersistenceError::Corrupt`].
    pub fn load(&self) -> PersistenceResult<Vec<T>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Store file absent, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the file contents with `items`.
    ///
    /// Parent directories are created as needed.
    pub fn replace(&self, items: &[T]) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.tmp_path();
        if let Err(e) = self.write_tmp(&tmp_path, items) {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(path = %tmp_path.display(), error = %cleanup, "Failed to remove temp file");
                }
            }
            return Err(e);
        }

        fs::rename(&tmp_path, &self.path)?;
        debug!(path = %self.path.display(), count = items.len(), "Store replaced");
        Ok(())
    }

    fn write_tmp(&self, tmp_path: &Path, items: &[T]) -> PersistenceResult<()> {
        let file = File::create(tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, items)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
