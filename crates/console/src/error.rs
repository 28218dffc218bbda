//! Unified error handling for the console core.
//!
//! Business-rule failures (validation, not-found, conflict, permission) are
//! returned as values through [`StoreError`], never panics. Unexpected faults
//! (network, serialization, disk) are caught at the store boundary and mapped
//! into the same type, so nothing escapes a store mutator as anything but a
//! `Result` with a display-ready message.

use thiserror::Error;

use plateful_core::TransitionError;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Error type returned by every store operation.
///
/// Each variant's `Display` output is suitable for direct display to the
/// console user; there are no silent failure paths.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input failed a business rule (e.g. rating out of range).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The session identity lacks the required permission.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The operation conflicts with current state (e.g. duplicate coupon code).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An order status transition violated the state machine.
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// The remote API rejected the request or could not be reached.
    #[error("remote failure: {0}")]
    Remote(String),

    /// The remote API did not answer within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// On-device persistence failed.
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Timeout(_) => Self::Timeout(err.to_string()),
            ApiError::NotFound(resource) => Self::NotFound(resource),
            ApiError::Remote(_) | ApiError::Http(_) | ApiError::Decode(_) => {
                Self::Remote(err.to_string())
            }
        }
    }
}
