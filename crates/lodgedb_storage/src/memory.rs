//! In-memory snapshot backend for testing.

use crate::backend::SnapshotBackend;
use crate::error::StorageResult;
use parking_lot::RwLock;

/// An in-memory snapshot backend.
///
/// This backend keeps the snapshot in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral registries that don't need persistence
///
/// # Example
///
/// ```rust
/// use lodgedb_storage::{InMemoryBackend, SnapshotBackend};
///
/// let mut backend = InMemoryBackend::new();
/// assert!(backend.read().unwrap().is_none());
/// backend.write(b"snapshot").unwrap();
/// assert_eq!(backend.data(), Some(b"snapshot".to_vec()));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: RwLock<Option<Vec<u8>>>,
}

impl InMemoryBackend {
    /// Creates a new backend with no snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend holding a pre-existing snapshot.
    ///
    /// Useful for testing reload scenarios.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(Some(data)),
        }
    }

    /// Returns a copy of the current snapshot, if any.
    ///
    /// Useful for testing and debugging.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.data.read().clone()
    }

    /// Drops the snapshot, returning the backend to its first-run state.
    pub fn clear(&mut self) {
        *self.data.write() = None;
    }
}

impl SnapshotBackend for InMemoryBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data.read().clone())
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        *self.data.write() = Some(data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_no_snapshot() {
        let backend = InMemoryBackend::new();
        assert!(backend.read().unwrap().is_none());
        assert!(backend.data().is_none());
    }

    #[test]
    fn write_then_read() {
        let mut backend = InMemoryBackend::new();
        backend.write(b"snapshot").unwrap();
        assert_eq!(backend.read().unwrap(), Some(b"snapshot".to_vec()));
    }

    #[test]
    fn write_replaces() {
        let mut backend = InMemoryBackend::new();
        backend.write(b"first").unwrap();
        backend.write(b"second").unwrap();
        assert_eq!(backend.read().unwrap(), Some(b"second".to_vec()));
    }

    #[test]
    fn with_data_preloads() {
        let backend = InMemoryBackend::with_data(b"preloaded".to_vec());
        assert_eq!(backend.read().unwrap(), Some(b"preloaded".to_vec()));
    }

    #[test]
    fn clear_returns_to_first_run() {
        let mut backend = InMemoryBackend::new();
        backend.write(b"snapshot").unwrap();
        backend.clear();
        assert!(backend.read().unwrap().is_none());
    }
}
