//! File-based snapshot backend for persistent storage.

use crate::backend::SnapshotBackend;
use crate::error::{StorageError, StorageResult};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A file-based snapshot backend.
///
/// The snapshot lives in a single file. Replacement is atomic: `write`
/// fills a sibling temp file, syncs it, and renames it over the target.
/// A write that fails partway leaves the previous snapshot intact.
///
/// A missing file is the first-run state and reads as `None`; the file is
/// only created by the first `write`.
///
/// # Example
///
/// ```no_run
/// use lodgedb_storage::{FileBackend, SnapshotBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::new(Path::new("registry.json"));
/// assert!(backend.read().unwrap().is_none());
/// backend.write(b"{}").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Creates a backend for the given snapshot path.
    ///
    /// No I/O happens here; the path is only touched by `read` and `write`.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Creates a backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directories cannot be created.
    pub fn with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self::new(path))
    }

    /// Returns the path to the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path used for the temp-then-rename replacement.
    fn temp_path(&self) -> StorageResult<PathBuf> {
        let name = self.path.file_name().ok_or_else(|| StorageError::InvalidPath {
            path: self.path.clone(),
        })?;
        let mut temp_name = name.to_os_string();
        temp_name.push(".tmp");
        Ok(self.path.with_file_name(temp_name))
    }
}

impl SnapshotBackend for FileBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        let temp = self.temp_path()?;

        {
            let mut file = File::create(&temp)?;
            file.write_all(data)?;
            file.sync_all()?;
        }

        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
