//! Crash-safe persistence of the state document

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};
use tracing::{debug, info, warn};

use super::Document;
use crate::error::{Result, StoreError};

/// File name of the canonical document inside the data directory.
pub const STATE_FILE_NAME: &str = "state.json";

/// Owns `state.json` and its `state.json.tmp` sibling.
///
/// Every mutation goes through write-temp-then-rename; the canonical file is
/// never written in place. Saves from the same process are serialized by
/// `write_lock`, since they all share one temporary path. The lock guards the
/// `sealed` flag: once the store is sealed for shutdown every later write is
/// refused, including writes already queued on the lock.
#[derive(Debug)]
pub struct StateStore {
    dir: PathBuf,
    path: PathBuf,
    tmp_path: PathBuf,
    write_lock: Mutex<bool>,
}

impl StateStore {
    /// Open the store in `dir`, creating the directory if needed.
    ///
    /// Checks that a temporary file can be created and removed next to the
    /// canonical path. Failing that, returns [`StoreError::Unavailable`].
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let unavailable = |source| StoreError::Unavailable {
            path: dir.clone(),
            source,
        };

        fs::create_dir_all(&dir).map_err(unavailable)?;
        let check = dir.join(format!(".{STATE_FILE_NAME}.check-{}", std::process::id()));
        File::create(&check)
            .and_then(|mut f| f.write_all(b"{}"))
            .map_err(unavailable)?;
        fs::remove_file(&check).map_err(unavailable)?;

        let path = dir.join(STATE_FILE_NAME);
        let tmp_path = dir.join(format!("{STATE_FILE_NAME}.tmp"));
        if tmp_path.exists() {
            // Left over from a save interrupted by a crash.
            warn!("Removing stale temporary file {}", tmp_path.display());
            let _ = fs::remove_file(&tmp_path);
        }

        info!("State store ready at {}", path.display());
        Ok(Self {
            dir,
            path,
            tmp_path,
            write_lock: Mutex::new(false),
        })
    }

    /// Path of the canonical document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the transient temporary file.
    pub fn tmp_path(&self) -> &Path {
        &self.tmp_path
    }

    /// Load the document, degrading to the default on any problem.
    pub fn load(&self) -> Document {
        self.try_load().unwrap_or_else(|e| {
            warn!("{}; using empty state", e);
            Document::default()
        })
    }

    /// Load the document, reporting read I/O errors.
    ///
    /// Missing, empty, and unparsable files are not errors: they yield the
    /// default document.
    pub fn try_load(&self) -> Result<Document> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No state file at {}, starting empty", self.path.display());
                return Ok(Document::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            debug!("State file {} is empty", self.path.display());
            return Ok(Document::default());
        }

        match serde_json::from_slice(&bytes) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                warn!("State file {} is corrupt ({}); starting empty", self.path.display(), e);
                Ok(Document::default())
            }
        }
    }

    /// Atomically replace the stored document with `doc`.
    ///
    /// Returns [`StoreError::Sealed`] once [`Self::seal_with`] has run.
    pub fn save(&self, doc: &Document) -> Result<()> {
        let sealed = self.lock();
        if *sealed {
            return Err(StoreError::Sealed);
        }
        self.save_locked(doc, commit_rename)
    }

    /// Load, transform, and save while holding the write lock.
    ///
    /// No other save can land between the snapshot and the write. If the
    /// snapshot cannot be read the closure is not run and the read error is
    /// returned without touching the file.
    pub fn update<T>(&self, f: impl FnOnce(Document) -> (Document, T)) -> Result<T> {
        let sealed = self.lock();
        if *sealed {
            return Err(StoreError::Sealed);
        }
        self.transform_locked(f)
    }

    /// Like [`Self::update`], but seals the store first.
    ///
    /// The flag is set under the write lock before the snapshot is read, so
    /// any save waiting on the lock fails with [`StoreError::Sealed`] instead
    /// of landing after the final document. The store stays sealed even if
    /// the read or the write fails.
    pub fn seal_with<T>(&self, f: impl FnOnce(Document) -> (Document, T)) -> Result<T> {
        let mut sealed = self.lock();
        if !*sealed {
            info!("Sealing state store, later writes will be refused");
        }
        *sealed = true;
        self.transform_locked(f)
    }

    /// Whether [`Self::seal_with`] has run.
    pub fn is_sealed(&self) -> bool {
        *self.lock()
    }

    /// Callers must hold `write_lock`.
    fn transform_locked<T>(&self, f: impl FnOnce(Document) -> (Document, T)) -> Result<T> {
        let current = self.try_load()?;
        let (next, out) = f(current);
        self.save_locked(&next, commit_rename)?;
        Ok(out)
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        // The flag only ever goes from false to true, so a poisoned lock
        // still holds a meaningful value.
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write `doc` to the temp file, then hand both paths to `commit`.
    ///
    /// Callers must hold `write_lock`. On any failure the temp file is
    /// removed and the canonical file is left as it was.
    fn save_locked<F>(&self, doc: &Document, commit: F) -> Result<()>
    where
        F: FnOnce(&Path, &Path) -> io::Result<()>,
    {
        let json = serde_json::to_vec_pretty(doc)?;

        if let Err(source) = self.write_tmp(&json) {
            self.discard_tmp();
            return Err(StoreError::Write {
                path: self.tmp_path.clone(),
                source,
            });
        }

        if let Err(source) = commit(&self.tmp_path, &self.path) {
            self.discard_tmp();
            return Err(StoreError::Rename {
                path: self.path.clone(),
                source,
            });
        }

        // The rename is done; a failed directory sync only weakens durability.
        if let Err(e) = sync_dir(&self.dir) {
            warn!("Failed to sync directory {}: {}", self.dir.display(), e);
        }

        debug!("Saved {} timers to {}", doc.timers.len(), self.path.display());
        Ok(())
    }

    fn write_tmp(&self, bytes: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }

    fn discard_tmp(&self) {
        if let Err(e) = fs::remove_file(&self.tmp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove {}: {}", self.tmp_path.display(), e);
            }
        }
    }
}

fn commit_rename(tmp: &Path, dest: &Path) -> io::Result<()> {
    fs::rename(tmp, dest)
}

/// Flush the directory entry so a completed rename survives power loss.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
