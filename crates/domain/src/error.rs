//! Error taxonomy shared by every layer of the workspace.
//!
//! Each failure class is its own typed error and converts into
//! [`DeviceHubError`] through `#[from]`. Adapters map the top-level variant
//! (or its [`ErrorKind`]) onto their transport.

use std::fmt;

use serde::Serialize;

/// Top-level error returned by domain operations, services and repositories.
#[derive(Debug, thiserror::Error)]
pub enum DeviceHubError {
    /// The caller supplied malformed, missing or out-of-range input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A record with the same identifier already exists.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// The mutation is blocked by the current lifecycle state.
    #[error(transparent)]
    PreconditionFailed(#[from] PreconditionError),

    /// Unexpected persistence or infrastructure failure.
    ///
    /// The message never exposes the source; it is kept for logging only.
    #[error("internal error")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The operation was aborted before it could complete.
    #[error("operation cancelled")]
    Cancelled,

    /// The operation ran past its deadline.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl DeviceHubError {
    /// Wrap any error as [`DeviceHubError::Internal`].
    pub fn internal(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal(Box::new(err))
    }

    /// Machine-readable classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::PreconditionFailed(_) => ErrorKind::PreconditionFailed,
            Self::Internal(_) => ErrorKind::Internal,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::DeadlineExceeded => ErrorKind::DeadlineExceeded,
        }
    }
}

/// Invalid input supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("device id cannot be empty")]
    EmptyId,
    #[error("device name is required")]
    EmptyName,
    #[error("device brand is required")]
    EmptyBrand,
    #[error("invalid device state: {0:?}")]
    InvalidState(String),
    #[error("filter by brand or by state, not both")]
    ConflictingFilters,
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} with id {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// An insert collided with an existing identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} with id {id} already exists")]
pub struct ConflictError {
    pub entity: &'static str,
    pub id: String,
}

/// Lifecycle rules that block a mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    #[error("cannot update name or brand of device in use")]
    RenameInUse { id: String },
    #[error("cannot delete device in use")]
    DeleteInUse { id: String },
}

/// Stable, machine-readable error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    PreconditionFailed,
    Internal,
    Cancelled,
    DeadlineExceeded,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::PreconditionFailed => "precondition_failed",
            Self::Internal => "internal",
            Self::Cancelled => "cancelled",
            Self::DeadlineExceeded => "deadline_exceeded",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
