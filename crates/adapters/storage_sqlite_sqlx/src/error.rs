//! Storage-specific error type wrapping sqlx errors.

use devicehub_domain::error::DeviceHubError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for DeviceHubError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Database(sqlx::Error::PoolTimedOut) => Self::DeadlineExceeded,
            StorageError::Database(sqlx::Error::PoolClosed) => Self::Cancelled,
            other => Self::Internal(Box::new(other)),
        }
    }
}
