//! Lifecycle error types.

use thiserror::Error;

use crate::lifecycle::types::VatReturnStatus;

/// Errors raised by lifecycle checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: VatReturnStatus,
        /// The attempted target status.
        to: VatReturnStatus,
    },

    /// Attempted to edit, recalculate, or delete a filed return.
    #[error("VAT return is {status} and can no longer be changed")]
    Immutable {
        /// The current status.
        status: VatReturnStatus,
    },
}

impl LifecycleError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        409
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Immutable { .. } => "CONFLICT",
        }
    }
}
