use thiserror::Error;

/// Errors that can occur when talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A document could not be serialized for storage.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored document could not be read back as the expected record.
    #[error("Failed to decode document from collection '{collection}': {source}")]
    Decode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The driver reported a failure for the operation.
    #[error("Store backend error: {0}")]
    Backend(String),

    /// The scheduled operation finished without delivering a result.
    #[error("Store operation completed without delivering a result")]
    ResultDropped,
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
