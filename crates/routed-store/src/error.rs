//! Error types for Routed storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
///
/// Malformed *stored* data never surfaces here: reads degrade to
/// absent/empty instead (the UI prefers availability over strict
/// consistency of preference state). These variants cover genuine I/O
/// failures and encoding failures on the write path.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization failed while writing a record.
    #[error("serialization error: {0}")]
    Serialization(String),
}
