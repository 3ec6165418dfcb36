//! File locking for store mutations.
//!
//! Installing a fetched descriptor or artifact into the store is guarded by
//! an advisory file lock so two strata processes sharing one store do not
//! interleave writes. Locks are released when the guard is dropped.

use crate::core::error::StrataError;
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// An exclusive lock over one named region of the store.
///
/// Lock files live in a dedicated subdirectory:
///
/// ```text
/// {store_dir}/.locks/{name}.lock
/// ```
///
/// The file handle stays open for the lifetime of the guard; the OS lock is
/// released on drop. Lock files themselves are never deleted.
pub struct StoreLock {
    _file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Acquire an exclusive lock named `name` under `store_dir`.
    ///
    /// Blocks until any other holder releases it. Different names never
    /// block each other.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::StoreLock`] when the `.locks` directory cannot
    /// be created or the lock file cannot be opened or locked.
    pub fn acquire(store_dir: &Path, name: &str) -> Result<Self, StrataError> {
        let locks_dir = store_dir.join(".locks");
        std::fs::create_dir_all(&locks_dir).map_err(|e| StrataError::StoreLock {
            path: store_dir.display().to_string(),
            reason: match e.kind() {
                std::io::ErrorKind::NotADirectory => {
                    "store path is not a directory".to_string()
                }
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied creating {}", locks_dir.display())
                }
                _ => format!("cannot create locks directory: {e}"),
            },
        })?;

        let lock_path = locks_dir.join(format!("{name}.lock"));
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| StrataError::StoreLock {
                path: lock_path.display().to_string(),
                reason: format!("cannot open lock file: {e}"),
            })?;

        file.lock_exclusive().map_err(|e| StrataError::StoreLock {
            path: lock_path.display().to_string(),
            reason: format!("cannot acquire exclusive lock: {e}"),
        })?;

        Ok(Self {
            _file: file,
            path: lock_path,
        })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        // Closing the handle releases the lock anyway; unlock explicitly for clarity.
        #[allow(unstable_name_collisions)]
        if let Err(e) = self._file.unlock() {
            eprintln!("Warning: Failed to unlock {}: {}", self.path.display(), e);
        }
    }
}
