//! Credit coefficient for partial-credit purchases.
//!
//! The coefficient is computed once a year from a rolling twelve-month
//! window by the reconciliation process. This module only validates and
//! applies it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use dds_shared::types::{round_coefficient, round_currency};

use crate::vat::error::VatError;

/// A ratio in `[0, 1]` with exactly three decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct CreditCoefficient(Decimal);

impl CreditCoefficient {
    /// Creates a coefficient, rounding half-up to three decimals.
    ///
    /// # Errors
    ///
    /// Returns `VatError::CoefficientOutOfRange` if `value` is outside `[0, 1]`.
    pub fn new(value: Decimal) -> Result<Self, VatError> {
        if value < Decimal::ZERO || value > Decimal::ONE {
            return Err(VatError::CoefficientOutOfRange(value));
        }
        Ok(Self(round_coefficient(value)))
    }

    /// The zero coefficient: no partial-credit VAT is deductible.
    #[must_use]
    pub fn zero() -> Self {
        Self(round_coefficient(Decimal::ZERO))
    }

    /// Returns the coefficient value.
    #[must_use]
    pub fn value(self) -> Decimal {
        self.0
    }

    /// Deductible share of `vat`, rounded half-up to currency precision.
    #[must_use]
    pub fn apply(self, vat: Decimal) -> Decimal {
        round_currency(vat * self.0)
    }
}

impl Default for CreditCoefficient {
    fn default() -> Self {
        Self::zero()
    }
}

impl TryFrom<Decimal> for CreditCoefficient {
    type Error = VatError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CreditCoefficient> for Decimal {
    fn from(coefficient: CreditCoefficient) -> Self {
        coefficient.0
    }
}

impl fmt::Display for CreditCoefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
