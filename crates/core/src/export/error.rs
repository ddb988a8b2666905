//! Export error and warning types.

use std::fmt;
use thiserror::Error;

use crate::lifecycle::VatReturnStatus;
use crate::vat::VatError;

/// Errors that abort an export. No bytes are produced.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The return has not been aggregated yet.
    #[error("VAT return is {status}; run the calculation before exporting")]
    IncompleteDeclaration {
        /// Current status of the return.
        status: VatReturnStatus,
    },

    /// A value cannot be written into its fixed-width field.
    #[error("Cannot encode {field} in record {record}: {reason}")]
    EncodingFailure {
        /// 1-based record number within the file.
        record: usize,
        /// Field name.
        field: &'static str,
        /// What went wrong.
        reason: String,
    },

    /// The ledger no longer adds up to the stored declaration.
    #[error("{file} totals no longer match the stored declaration; recalculate the return")]
    StaleDeclaration {
        /// File whose totals differ.
        file: &'static str,
    },

    /// A ledger line failed validation while rendering.
    #[error(transparent)]
    Ledger(#[from] VatError),

    /// Writing the zip bundle failed.
    #[error("Cannot build export archive: {0}")]
    Archive(String),
}

impl ExportError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::IncompleteDeclaration { .. } | Self::StaleDeclaration { .. } => 409,
            Self::EncodingFailure { .. } => 422,
            Self::Archive(_) => 500,
            Self::Ledger(e) => e.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::IncompleteDeclaration { .. } => "INCOMPLETE_DECLARATION",
            Self::EncodingFailure { .. } => "ENCODING_FAILURE",
            Self::StaleDeclaration { .. } => "STALE_DECLARATION",
            Self::Archive(_) => "ARCHIVE_FAILURE",
            Self::Ledger(e) => e.error_code(),
        }
    }
}

/// Why a text field was altered on its way into the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// The value was cut to the column width.
    Truncated {
        /// Length of the original value in characters.
        length: usize,
        /// Column width.
        width: usize,
    },
    /// A character has no Windows-1251 code and was replaced by `?`.
    Unrepresentable {
        /// The replaced character.
        character: char,
    },
}

/// A non-fatal change made to a field while exporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportWarning {
    /// 1-based record number within the file.
    pub record: usize,
    /// Field name.
    pub field: &'static str,
    /// What was changed.
    pub kind: WarningKind,
}

impl fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::Truncated { length, width } => write!(
                f,
                "record {} field {}: truncated from {length} to {width} characters",
                self.record, self.field
            ),
            WarningKind::Unrepresentable { character } => write!(
                f,
                "record {} field {}: U+{:04X} replaced with '?'",
                self.record,
                self.field,
                u32::from(*character)
            ),
        }
    }
}
