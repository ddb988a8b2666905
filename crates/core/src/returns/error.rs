//! Errors surfaced by the VAT return control operations.

use thiserror::Error;

use dds_shared::types::VatReturnId;

use crate::export::ExportError;
use crate::lifecycle::{LifecycleError, VatReturnStatus};
use crate::vat::VatError;

/// Errors reported by a [`VatReturnStore`](super::VatReturnStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// A return for the same company and period already exists.
    #[error("VAT return for this period already exists: {0}")]
    Conflict(String),

    /// No return with this ID.
    #[error("VAT return not found: {0}")]
    NotFound(VatReturnId),

    /// The backing store failed.
    #[error("repository error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a backend error.
    #[must_use]
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Error taxonomy of the control surface.
#[derive(Debug, Error)]
pub enum VatReturnError {
    /// Unknown company, period, or return.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate period, or a change to a filed return.
    #[error("{0}")]
    Conflict(String),

    /// Illegal lifecycle move.
    #[error("Cannot move VAT return from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: VatReturnStatus,
        /// Requested status.
        to: VatReturnStatus,
    },

    /// Malformed year or month.
    #[error("Invalid VAT period {year}-{month:02}")]
    InvalidPeriod {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },

    /// Export or edit requested before aggregation.
    #[error("VAT return is {status}; run the calculation first")]
    IncompleteDeclaration {
        /// Current status.
        status: VatReturnStatus,
    },

    /// A number does not fit its fixed-width field.
    #[error("Cannot encode {field} in record {record}: {reason}")]
    EncodingFailure {
        /// 1-based record number.
        record: usize,
        /// Field name.
        field: &'static str,
        /// What went wrong.
        reason: String,
    },

    /// The ledger changed after the last calculation.
    #[error("{file} totals no longer match the stored declaration; recalculate the return")]
    StaleDeclaration {
        /// File whose totals differ.
        file: &'static str,
    },

    /// Rejected input.
    #[error("{0}")]
    Validation(String),

    /// Partial-credit purchases without a coefficient.
    #[error("Company has partial-credit purchases but no credit coefficient")]
    MissingCreditCoefficient,

    /// A ledger line cannot be aggregated.
    #[error("{message}")]
    InvalidLedgerLine {
        /// Error code of the underlying failure.
        code: &'static str,
        /// Description.
        message: String,
    },

    /// The store failed.
    #[error("repository error: {0}")]
    Repository(String),

    /// The ledger failed.
    #[error("ledger error: {0}")]
    Source(String),

    /// The export bundle could not be written.
    #[error("archive error: {0}")]
    Archive(String),
}

impl VatReturnError {
    /// Create a not found error for a return ID.
    #[must_use]
    pub fn not_found(id: VatReturnId) -> Self {
        Self::NotFound(format!("VAT return {id} not found"))
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Conflict(_)
            | Self::InvalidTransition { .. }
            | Self::IncompleteDeclaration { .. }
            | Self::StaleDeclaration { .. } => 409,
            Self::InvalidPeriod { .. } | Self::Validation(_) => 400,
            Self::EncodingFailure { .. }
            | Self::MissingCreditCoefficient
            | Self::InvalidLedgerLine { .. } => 422,
            Self::Repository(_) | Self::Source(_) | Self::Archive(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::InvalidPeriod { .. } => "INVALID_PERIOD",
            Self::IncompleteDeclaration { .. } => "INCOMPLETE_DECLARATION",
            Self::EncodingFailure { .. } => "ENCODING_FAILURE",
            Self::StaleDeclaration { .. } => "STALE_DECLARATION",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::MissingCreditCoefficient => "MISSING_CREDIT_COEFFICIENT",
            Self::InvalidLedgerLine { code, .. } => code,
            Self::Repository(_) => "REPOSITORY_ERROR",
            Self::Source(_) => "LEDGER_ERROR",
            Self::Archive(_) => "ARCHIVE_FAILURE",
        }
    }

    /// Returns true for failures of the store, the ledger, or the archive writer.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<VatError> for VatReturnError {
    fn from(err: VatError) -> Self {
        match err {
            VatError::InvalidPeriod { year, month } => Self::InvalidPeriod { year, month },
            VatError::CompanyNotFound(id) => Self::NotFound(format!("Company {id} not found")),
            VatError::MissingCreditCoefficient => Self::MissingCreditCoefficient,
            VatError::CoefficientOutOfRange(_)
            | VatError::SettlementMismatch { .. }
            | VatError::NegativeSettlement => Self::Validation(err.to_string()),
            VatError::RoleMismatch { .. } | VatError::UnexpectedVat { .. } => {
                Self::InvalidLedgerLine {
                    code: err.error_code(),
                    message: err.to_string(),
                }
            }
            VatError::Source(msg) => Self::Source(msg),
        }
    }
}

impl From<LifecycleError> for VatReturnError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::InvalidTransition { from, to } => Self::InvalidTransition { from, to },
            LifecycleError::Immutable { .. } => Self::Conflict(err.to_string()),
        }
    }
}

impl From<ExportError> for VatReturnError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::IncompleteDeclaration { status } => Self::IncompleteDeclaration { status },
            ExportError::EncodingFailure {
                record,
                field,
                reason,
            } => Self::EncodingFailure {
                record,
                field,
                reason,
            },
            ExportError::StaleDeclaration { file } => Self::StaleDeclaration { file },
            ExportError::Archive(msg) => Self::Archive(msg),
            ExportError::Ledger(e) => e.into(),
        }
    }
}

impl From<StoreError> for VatReturnError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => Self::Conflict(err.to_string()),
            StoreError::NotFound(id) => Self::not_found(id),
            StoreError::Backend(msg) => Self::Repository(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_immutable_maps_to_conflict() {
        let err: VatReturnError = LifecycleError::Immutable {
            status: VatReturnStatus::Submitted,
        }
        .into();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "CONFLICT");
    }

    #[test]
    fn test_invalid_transition_keeps_its_code() {
        let err: VatReturnError = LifecycleError::InvalidTransition {
            from: VatReturnStatus::Draft,
            to: VatReturnStatus::Submitted,
        }
        .into();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
    }

    #[test]
    fn test_vat_errors_map_by_kind() {
        let err: VatReturnError = VatError::InvalidPeriod {
            year: 2025,
            month: 0,
        }
        .into();
        assert_eq!(err.error_code(), "INVALID_PERIOD");

        let err: VatReturnError = VatError::CoefficientOutOfRange(dec!(1.5)).into();
        assert_eq!(err.status_code(), 400);

        let err: VatReturnError = VatError::MissingCreditCoefficient.into();
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "MISSING_CREDIT_COEFFICIENT");

        let err: VatReturnError = VatError::source("timeout").into();
        assert!(err.is_internal());
        assert_eq!(err.error_code(), "LEDGER_ERROR");
    }

    #[test]
    fn test_ledger_line_errors_keep_their_code() {
        let err: VatReturnError = ExportError::Ledger(VatError::UnexpectedVat {
            document_number: "7".into(),
            category: crate::vat::SalesCategory::Exempt,
            vat_amount: dec!(3.00),
        })
        .into();
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "UNEXPECTED_VAT");
    }

    #[test]
    fn test_store_errors() {
        let err: VatReturnError = StoreError::Conflict("2025-03".into()).into();
        assert_eq!(err.error_code(), "CONFLICT");
        let err: VatReturnError = StoreError::backend("pool timed out").into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "REPOSITORY_ERROR");
    }

    #[test]
    fn test_export_errors() {
        let err: VatReturnError = ExportError::StaleDeclaration {
            file: "POKUPKI.TXT",
        }
        .into();
        assert_eq!(err.status_code(), 409);
        let err: VatReturnError = ExportError::IncompleteDeclaration {
            status: VatReturnStatus::Draft,
        }
        .into();
        assert_eq!(err.error_code(), "INCOMPLETE_DECLARATION");
        let err: VatReturnError = ExportError::Archive("disk full".into()).into();
        assert!(err.is_internal());
        assert_eq!(err.error_code(), "ARCHIVE_FAILURE");
    }
}
