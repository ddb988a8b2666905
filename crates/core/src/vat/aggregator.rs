//! VAT aggregator: folds ledger lines into a declaration.
//!
//! Each line is rounded to currency precision once, before it is summed.
//! The exporter reuses the same totals, so a ledger file's trailing record
//! always matches the declaration built from the same lines.

use rust_decimal::Decimal;
use std::collections::HashSet;

use dds_shared::types::round_currency;

use crate::vat::coefficient::CreditCoefficient;
use crate::vat::declaration::VatDeclaration;
use crate::vat::error::VatError;
use crate::vat::types::{CreditRight, LedgerLine, SalesCategory, VatOperation, VatRole};

/// Per-category sums of the sales ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesTotals {
    /// Base at 20%.
    pub base_20: Decimal,
    /// VAT at 20%.
    pub vat_20: Decimal,
    /// Base of intra-community acquisitions.
    pub base_vop: Decimal,
    /// VAT on intra-community acquisitions.
    pub vat_vop: Decimal,
    /// Base at 9%.
    pub base_9: Decimal,
    /// VAT at 9%.
    pub vat_9: Decimal,
    /// Zero-rated exports.
    pub base_0_export: Decimal,
    /// Zero-rated intra-community supplies.
    pub base_0_vod: Decimal,
    /// Exempt supplies.
    pub base_exempt: Decimal,
    /// Distinct documents.
    pub document_count: u32,
}

impl Default for SalesTotals {
    fn default() -> Self {
        let zero = round_currency(Decimal::ZERO);
        Self {
            base_20: zero,
            vat_20: zero,
            base_vop: zero,
            vat_vop: zero,
            base_9: zero,
            vat_9: zero,
            base_0_export: zero,
            base_0_vod: zero,
            base_exempt: zero,
            document_count: 0,
        }
    }
}

impl SalesTotals {
    /// Sums a sales ledger.
    ///
    /// # Errors
    ///
    /// Returns `VatError::RoleMismatch` for a purchase line and
    /// `VatError::UnexpectedVat` for a zero-rated or exempt line with VAT.
    pub fn from_lines(lines: &[LedgerLine]) -> Result<Self, VatError> {
        let mut totals = Self::default();
        for line in lines {
            totals.add(line)?;
        }
        totals.document_count = distinct_documents(lines);
        Ok(totals)
    }

    /// Adds one line. Does not touch the document count.
    ///
    /// # Errors
    ///
    /// Same as [`SalesTotals::from_lines`].
    pub fn add(&mut self, line: &LedgerLine) -> Result<(), VatError> {
        let VatOperation::Sale(category) = line.operation else {
            return Err(role_mismatch(line, VatRole::Sales));
        };
        let base = round_currency(line.tax_base);
        let vat = round_currency(line.vat_amount);

        if !category.carries_vat() && !vat.is_zero() {
            return Err(VatError::UnexpectedVat {
                document_number: line.document_number.clone(),
                category,
                vat_amount: vat,
            });
        }

        match category {
            SalesCategory::Standard20 => {
                self.base_20 += base;
                self.vat_20 += vat;
            }
            SalesCategory::Reduced9 => {
                self.base_9 += base;
                self.vat_9 += vat;
            }
            SalesCategory::IntraCommunityAcquisition => {
                self.base_vop += base;
                self.vat_vop += vat;
            }
            SalesCategory::ZeroRateExport => self.base_0_export += base,
            SalesCategory::IntraCommunitySupply => self.base_0_vod += base,
            SalesCategory::Exempt => self.base_exempt += base,
        }
        Ok(())
    }

    /// Sum of all bases (code 01).
    #[must_use]
    pub fn total_base(&self) -> Decimal {
        self.base_20
            + self.base_9
            + self.base_vop
            + self.base_0_export
            + self.base_0_vod
            + self.base_exempt
    }

    /// Sum of all output VAT (code 20).
    #[must_use]
    pub fn total_vat(&self) -> Decimal {
        self.vat_20 + self.vat_9 + self.vat_vop
    }

    /// Returns true if these totals equal the sales side of `declaration`.
    #[must_use]
    pub fn matches(&self, declaration: &VatDeclaration) -> bool {
        self.base_20 == declaration.sales_base_20
            && self.vat_20 == declaration.sales_vat_20
            && self.base_9 == declaration.sales_base_9
            && self.vat_9 == declaration.sales_vat_9
            && self.base_vop == declaration.sales_base_vop
            && self.vat_vop == declaration.sales_vat_vop
            && self.base_0_export == declaration.sales_base_0_export
            && self.base_0_vod == declaration.sales_base_0_vod
            && self.base_exempt == declaration.sales_base_exempt
            && self.document_count == declaration.sales_document_count
    }
}

/// Per-credit-right sums of the purchase ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseTotals {
    /// Base without credit.
    pub base_no_credit: Decimal,
    /// Base with full credit.
    pub base_full: Decimal,
    /// VAT with full credit.
    pub vat_full: Decimal,
    /// Base with partial credit.
    pub base_partial: Decimal,
    /// VAT with partial credit.
    pub vat_partial: Decimal,
    /// Number of partial-credit lines.
    pub partial_lines: usize,
    /// Distinct documents.
    pub document_count: u32,
}

impl Default for PurchaseTotals {
    fn default() -> Self {
        let zero = round_currency(Decimal::ZERO);
        Self {
            base_no_credit: zero,
            base_full: zero,
            vat_full: zero,
            base_partial: zero,
            vat_partial: zero,
            partial_lines: 0,
            document_count: 0,
        }
    }
}

impl PurchaseTotals {
    /// Sums a purchase ledger.
    ///
    /// # Errors
    ///
    /// Returns `VatError::RoleMismatch` for a sales line.
    pub fn from_lines(lines: &[LedgerLine]) -> Result<Self, VatError> {
        let mut totals = Self::default();
        for line in lines {
            totals.add(line)?;
        }
        totals.document_count = distinct_documents(lines);
        Ok(totals)
    }

    /// Adds one line. Does not touch the document count.
    ///
    /// VAT on purchases without credit is not deductible and has no
    /// declaration field, so only the base is kept.
    ///
    /// # Errors
    ///
    /// Returns `VatError::RoleMismatch` for a sales line.
    pub fn add(&mut self, line: &LedgerLine) -> Result<(), VatError> {
        let VatOperation::Purchase(right) = line.operation else {
            return Err(role_mismatch(line, VatRole::Purchase));
        };
        let base = round_currency(line.tax_base);
        let vat = round_currency(line.vat_amount);

        match right {
            CreditRight::Full => {
                self.base_full += base;
                self.vat_full += vat;
            }
            CreditRight::Partial => {
                self.base_partial += base;
                self.vat_partial += vat;
                self.partial_lines += 1;
            }
            CreditRight::NoCredit => self.base_no_credit += base,
        }
        Ok(())
    }

    /// Returns true if these totals equal the purchase side of `declaration`.
    #[must_use]
    pub fn matches(&self, declaration: &VatDeclaration) -> bool {
        self.base_no_credit == declaration.purchase_base_no_credit
            && self.base_full == declaration.purchase_base_full_credit
            && self.vat_full == declaration.purchase_vat_full_credit
            && self.base_partial == declaration.purchase_base_partial_credit
            && self.vat_partial == declaration.purchase_vat_partial_credit
            && self.document_count == declaration.purchase_document_count
    }
}

/// Stateless aggregation of a period's ledgers.
pub struct VatAggregator;

impl VatAggregator {
    /// Builds a settled declaration from the purchase and sales ledgers.
    ///
    /// `coefficient` may be `None` only when there are no partial-credit
    /// purchases; the zero coefficient is used then.
    ///
    /// # Errors
    ///
    /// * `VatError::RoleMismatch` if a line sits in the wrong ledger
    /// * `VatError::UnexpectedVat` for a zero-rated or exempt sale with VAT
    /// * `VatError::MissingCreditCoefficient` if partial-credit purchases exist
    ///   without a coefficient
    pub fn aggregate(
        purchases: &[LedgerLine],
        sales: &[LedgerLine],
        coefficient: Option<CreditCoefficient>,
    ) -> Result<VatDeclaration, VatError> {
        let sales_totals = SalesTotals::from_lines(sales)?;
        let purchase_totals = PurchaseTotals::from_lines(purchases)?;

        let credit_coefficient = match coefficient {
            Some(c) => c,
            None if purchase_totals.partial_lines > 0 => {
                return Err(VatError::MissingCreditCoefficient);
            }
            None => CreditCoefficient::zero(),
        };

        Ok(Self::from_totals(
            &sales_totals,
            &purchase_totals,
            credit_coefficient,
        ))
    }

    /// Builds a settled declaration from precomputed totals.
    #[must_use]
    pub fn from_totals(
        sales: &SalesTotals,
        purchases: &PurchaseTotals,
        credit_coefficient: CreditCoefficient,
    ) -> VatDeclaration {
        let mut declaration = VatDeclaration {
            sales_base_20: sales.base_20,
            sales_base_9: sales.base_9,
            sales_base_vop: sales.base_vop,
            sales_base_0_export: sales.base_0_export,
            sales_base_0_vod: sales.base_0_vod,
            sales_base_exempt: sales.base_exempt,
            sales_vat_20: sales.vat_20,
            sales_vat_9: sales.vat_9,
            sales_vat_vop: sales.vat_vop,
            sales_document_count: sales.document_count,
            purchase_base_full_credit: purchases.base_full,
            purchase_base_partial_credit: purchases.base_partial,
            purchase_base_no_credit: purchases.base_no_credit,
            purchase_vat_full_credit: purchases.vat_full,
            purchase_vat_partial_credit: purchases.vat_partial,
            credit_coefficient,
            purchase_document_count: purchases.document_count,
            ..VatDeclaration::default()
        };
        declaration.settle();
        declaration
    }
}

fn role_mismatch(line: &LedgerLine, expected: VatRole) -> VatError {
    VatError::RoleMismatch {
        document_number: line.document_number.clone(),
        expected,
        actual: line.operation.role(),
    }
}

fn distinct_documents(lines: &[LedgerLine]) -> u32 {
    let keys: HashSet<_> = lines.iter().map(LedgerLine::document_key).collect();
    u32::try_from(keys.len()).unwrap_or(u32::MAX)
}
