//! Errors raised while selecting and aggregating ledger lines.

use rust_decimal::Decimal;
use thiserror::Error;

use dds_shared::types::CompanyId;

use crate::vat::types::{SalesCategory, VatRole};

/// Errors that can occur while building a VAT declaration.
#[derive(Debug, Error)]
pub enum VatError {
    /// Year or month does not describe a calendar month.
    #[error("Invalid VAT period {year}-{month:02}")]
    InvalidPeriod {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },

    /// The company is unknown to the ledger.
    #[error("Company {0} not found")]
    CompanyNotFound(CompanyId),

    /// A credit coefficient outside `[0, 1]` was supplied.
    #[error("Credit coefficient {0} is outside [0, 1]")]
    CoefficientOutOfRange(Decimal),

    /// Partial-credit purchases exist but the company has no coefficient.
    #[error("Company has partial-credit purchases but no credit coefficient")]
    MissingCreditCoefficient,

    /// A line was passed to the wrong side of the aggregation.
    #[error("Document {document_number} belongs to the {actual} ledger, expected {expected}")]
    RoleMismatch {
        /// Offending document number.
        document_number: String,
        /// Role the aggregation expected.
        expected: VatRole,
        /// Role of the line.
        actual: VatRole,
    },

    /// A zero-rated or exempt sale carries a VAT amount.
    #[error("Document {document_number} is {category:?} but carries VAT {vat_amount}")]
    UnexpectedVat {
        /// Offending document number.
        document_number: String,
        /// Category of the sale.
        category: SalesCategory,
        /// VAT amount found on the line.
        vat_amount: Decimal,
    },

    /// A settlement section does not add up to the result it splits.
    #[error("Settlement codes {section} sum to {actual}, expected {expected}")]
    SettlementMismatch {
        /// Codes of the section.
        section: &'static str,
        /// Result the section must add up to.
        expected: Decimal,
        /// Sum supplied.
        actual: Decimal,
    },

    /// A settlement code is negative.
    #[error("Settlement codes must not be negative")]
    NegativeSettlement,

    /// The ledger source failed.
    #[error("Ledger source error: {0}")]
    Source(String),
}

impl VatError {
    /// Creates a ledger source error.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidPeriod { .. }
            | Self::CoefficientOutOfRange(_)
            | Self::SettlementMismatch { .. }
            | Self::NegativeSettlement => 400,
            Self::CompanyNotFound(_) => 404,
            Self::MissingCreditCoefficient
            | Self::RoleMismatch { .. }
            | Self::UnexpectedVat { .. } => 422,
            Self::Source(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPeriod { .. } => "INVALID_PERIOD",
            Self::CompanyNotFound(_) => "NOT_FOUND",
            Self::CoefficientOutOfRange(_)
            | Self::SettlementMismatch { .. }
            | Self::NegativeSettlement => "VALIDATION_ERROR",
            Self::MissingCreditCoefficient => "MISSING_CREDIT_COEFFICIENT",
            Self::RoleMismatch { .. } => "ROLE_MISMATCH",
            Self::UnexpectedVat { .. } => "UNEXPECTED_VAT",
            Self::Source(_) => "LEDGER_ERROR",
        }
    }
}
