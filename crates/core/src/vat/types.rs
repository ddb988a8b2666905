//! Ledger-side domain types consumed by the VAT return engine.
//!
//! The accounting ledger owns these records. The engine only filters,
//! sorts, and sums them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use dds_shared::types::CompanyId;

use crate::vat::coefficient::CreditCoefficient;

/// Which side of the VAT return a ledger line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VatRole {
    /// Purchase ledger (input VAT).
    Purchase,
    /// Sales ledger (output VAT).
    Sales,
}

impl VatRole {
    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Sales => "sales",
        }
    }
}

impl fmt::Display for VatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tax category of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesCategory {
    /// Taxable supply at the standard 20% rate.
    Standard20,
    /// Taxable supply at the reduced 9% rate.
    Reduced9,
    /// Intra-community acquisition (VOP), self-assessed at 20%.
    IntraCommunityAcquisition,
    /// Zero-rated export outside the EU.
    ZeroRateExport,
    /// Zero-rated intra-community supply (VOD).
    IntraCommunitySupply,
    /// Exempt supply.
    Exempt,
}

impl SalesCategory {
    /// Returns true if lines of this category carry output VAT.
    #[must_use]
    pub fn carries_vat(&self) -> bool {
        matches!(
            self,
            Self::Standard20 | Self::Reduced9 | Self::IntraCommunityAcquisition
        )
    }
}

/// Deduction eligibility of a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditRight {
    /// Input VAT is fully deductible.
    Full,
    /// Input VAT is deductible in proportion to the credit coefficient.
    Partial,
    /// No right to a tax credit.
    NoCredit,
}

/// The VAT treatment of a single ledger line.
///
/// The role is carried by the variant, so a sales category can never be
/// attached to a purchase line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VatOperation {
    /// A sale in the given category.
    Sale(SalesCategory),
    /// A purchase with the given credit right.
    Purchase(CreditRight),
}

impl VatOperation {
    /// Every operation, in ledger column order.
    pub const ALL: [Self; 9] = [
        Self::Sale(SalesCategory::Standard20),
        Self::Sale(SalesCategory::Reduced9),
        Self::Sale(SalesCategory::IntraCommunityAcquisition),
        Self::Sale(SalesCategory::ZeroRateExport),
        Self::Sale(SalesCategory::IntraCommunitySupply),
        Self::Sale(SalesCategory::Exempt),
        Self::Purchase(CreditRight::Full),
        Self::Purchase(CreditRight::Partial),
        Self::Purchase(CreditRight::NoCredit),
    ];

    /// Returns the ledger role of this operation.
    #[must_use]
    pub fn role(&self) -> VatRole {
        match self {
            Self::Sale(_) => VatRole::Sales,
            Self::Purchase(_) => VatRole::Purchase,
        }
    }

    /// Returns the stable storage code of this operation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale(SalesCategory::Standard20) => "sale_standard_20",
            Self::Sale(SalesCategory::Reduced9) => "sale_reduced_9",
            Self::Sale(SalesCategory::IntraCommunityAcquisition) => "sale_vop",
            Self::Sale(SalesCategory::ZeroRateExport) => "sale_export_0",
            Self::Sale(SalesCategory::IntraCommunitySupply) => "sale_vod_0",
            Self::Sale(SalesCategory::Exempt) => "sale_exempt",
            Self::Purchase(CreditRight::Full) => "purchase_full_credit",
            Self::Purchase(CreditRight::Partial) => "purchase_partial_credit",
            Self::Purchase(CreditRight::NoCredit) => "purchase_no_credit",
        }
    }

    /// Parses an operation from its storage code.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == s)
    }
}

impl fmt::Display for VatOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document type codes used in the purchase and sales ledgers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    /// 01 - Invoice.
    Invoice,
    /// 02 - Debit note.
    DebitNote,
    /// 03 - Credit note.
    CreditNote,
    /// 04 - Protocol under art. 117.
    Protocol117,
    /// 05 - Notice to a protocol under art. 117.
    Protocol117Notice,
    /// 07 - Customs declaration.
    CustomsDeclaration,
    /// 81 - Sales report.
    SalesReport,
    /// 82 - Purchase report.
    PurchaseReport,
    /// 91 - Protocol for an intra-community acquisition.
    AcquisitionProtocol,
    /// 92 - Protocol for services received from the EU.
    ServiceProtocol,
}

impl DocumentType {
    /// Returns the two-digit code written to the ledger files.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invoice => "01",
            Self::DebitNote => "02",
            Self::CreditNote => "03",
            Self::Protocol117 => "04",
            Self::Protocol117Notice => "05",
            Self::CustomsDeclaration => "07",
            Self::SalesReport => "81",
            Self::PurchaseReport => "82",
            Self::AcquisitionProtocol => "91",
            Self::ServiceProtocol => "92",
        }
    }

    /// Parses a two-digit document type code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "01" => Some(Self::Invoice),
            "02" => Some(Self::DebitNote),
            "03" => Some(Self::CreditNote),
            "04" => Some(Self::Protocol117),
            "05" => Some(Self::Protocol117Notice),
            "07" => Some(Self::CustomsDeclaration),
            "81" => Some(Self::SalesReport),
            "82" => Some(Self::PurchaseReport),
            "91" => Some(Self::AcquisitionProtocol),
            "92" => Some(Self::ServiceProtocol),
            _ => None,
        }
    }
}

/// A VAT-relevant line of the accounting ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerLine {
    /// Document number as printed on the document.
    pub document_number: String,
    /// Kind of document.
    pub document_type: DocumentType,
    /// Issue date of the document.
    pub document_date: NaiveDate,
    /// Date on which the VAT becomes chargeable; selects the period.
    pub vat_date: NaiveDate,
    /// VAT number of the counterparty, absent for private persons.
    pub counterparty_vat_number: Option<String>,
    /// Name of the counterparty.
    pub counterparty_name: String,
    /// Short description of the supply.
    pub description: String,
    /// Taxable base (negative for credit notes).
    pub tax_base: Decimal,
    /// VAT amount (negative for credit notes).
    pub vat_amount: Decimal,
    /// VAT treatment of the line.
    pub operation: VatOperation,
}

impl LedgerLine {
    /// Key identifying the document this line belongs to.
    #[must_use]
    pub fn document_key(&self) -> (&str, NaiveDate, Option<&str>) {
        (
            self.document_number.as_str(),
            self.document_date,
            self.counterparty_vat_number.as_deref(),
        )
    }
}

/// Company data needed to aggregate and export a return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyProfile {
    /// Company ID.
    pub id: CompanyId,
    /// Registered name.
    pub name: String,
    /// VAT registration number.
    pub vat_number: String,
    /// Person submitting the return.
    pub submitter_name: String,
    /// Yearly credit coefficient, if the company has partial-credit purchases.
    pub credit_coefficient: Option<CreditCoefficient>,
}
