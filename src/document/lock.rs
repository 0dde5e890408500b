//! Mutual exclusion hook around one load -> mutate -> save cycle
//!
//! The store has no read-modify-write atomicity of its own. Callers that may
//! run from several processes install [`FileLock`], which holds an exclusive
//! advisory lock on a sidecar file for the whole cycle. Single-process use
//! keeps [`NoLock`].

use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::errors::{StoreError, StoreResult};

/// Held for the duration of one store operation; releases on drop.
pub struct LockGuard {
    file: Option<File>,
}

impl LockGuard {
    /// A guard that holds nothing
    pub fn unlocked() -> Self {
        Self { file: None }
    }

    /// Whether an OS lock is held
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }
}

impl fmt::Debug for LockGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockGuard")
            .field("held", &self.is_held())
            .finish()
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Some(file) = &self.file {
            let _ = FileExt::unlock(file);
        }
    }
}

/// Acquires exclusive access to the document for one operation
pub trait StoreLock: Send + Sync + fmt::Debug {
    fn acquire(&self) -> StoreResult<LockGuard>;
}

/// No locking: single process, single user
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLock;

impl StoreLock for NoLock {
    fn acquire(&self) -> StoreResult<LockGuard> {
        Ok(LockGuard::unlocked())
    }
}

/// Exclusive advisory lock on a sidecar file, blocking until available
#[derive(Debug, Clone)]
pub struct FileLock {
    path: PathBuf,
}

impl FileLock {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Lock file next to the document: `<document>.lock`
    pub fn for_document(document_path: &Path) -> Self {
        let mut name = document_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        Self::new(document_path.with_file_name(name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StoreLock for FileLock {
    fn acquire(&self) -> StoreResult<LockGuard> {
        let display = self.path.display().to_string();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| StoreError::Lock {
                path: display.clone(),
                source: e,
            })?;
        FileExt::lock_exclusive(&file).map_err(|e| StoreError::Lock {
            path: display,
            source: e,
        })?;
        Ok(LockGuard { file: Some(file) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_lock_holds_nothing() {
        assert!(!NoLock.acquire().unwrap().is_held());
    }

    #[test]
    fn test_lock_path_sits_next_to_document() {
        let lock = FileLock::for_document(Path::new("/var/school/data.json"));
        assert_eq!(lock.path(), Path::new("/var/school/data.json.lock"));
    }

    #[test]
    fn test_file_lock_excludes_other_handles() {
        let temp = TempDir::new().unwrap();
        let lock = FileLock::for_document(&temp.path().join("data.json"));

        let guard = lock.acquire().unwrap();
        assert!(guard.is_held());

        let other = File::open(lock.path()).unwrap();
        assert!(FileExt::try_lock_exclusive(&other).is_err());

        drop(guard);
        assert!(FileExt::try_lock_exclusive(&other).is_ok());
    }

    #[test]
    fn test_reacquire_after_release() {
        let temp = TempDir::new().unwrap();
        let lock = FileLock::for_document(&temp.path().join("data.json"));
        drop(lock.acquire().unwrap());
        assert!(lock.acquire().unwrap().is_held());
    }
}
