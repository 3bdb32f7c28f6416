//! Snapshot backend trait definition.

use crate::error::StorageResult;

/// A low-level snapshot store for LodgeDB.
///
/// Snapshot backends are **opaque byte stores**. They hold at most one
/// snapshot and provide two operations: read the whole snapshot, and
/// atomically replace it. LodgeDB core owns all snapshot format
/// interpretation - backends do not understand registries or entities.
///
/// # Invariants
///
/// - `read` returns exactly the bytes passed to the last successful `write`
/// - `read` returns `None` if no snapshot has ever been written
/// - `write` replaces the snapshot as a whole; a failed `write` must not
///   leave a previously readable snapshot truncated
/// - Backends must be `Send + Sync` for shared ownership across threads
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait SnapshotBackend: Send + Sync {
    /// Reads the current snapshot.
    ///
    /// Returns `None` when no snapshot exists. A missing snapshot is the
    /// designed first-run state, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn read(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the snapshot with `data`.
    ///
    /// After this returns successfully, `read` observes exactly `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be replaced.
    fn write(&mut self, data: &[u8]) -> StorageResult<()>;
}
