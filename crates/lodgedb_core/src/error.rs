//! Error types for LodgeDB core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in LodgeDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] lodgedb_storage::StorageError),

    /// A reconstruction or field-assignment argument is unusable.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected argument.
        message: String,
    },

    /// The backing file exists but cannot be interpreted.
    #[error("corrupt store: {message}")]
    CorruptStore {
        /// Description of the corruption.
        message: String,
    },

    /// No entity is registered under the given composite key.
    #[error("entity not found: {key}")]
    NotFound {
        /// The composite key that was looked up.
        key: String,
    },

    /// The registry snapshot could not be serialized.
    #[error("snapshot encode error: {0}")]
    Encode(#[source] serde_json::Error),
}

impl CoreError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a corrupt store error.
    pub fn corrupt_store(message: impl Into<String>) -> Self {
        Self::CorruptStore {
            message: message.into(),
        }
    }
}
