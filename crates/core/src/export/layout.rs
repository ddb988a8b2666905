//! Fixed-width layout of the import files, by layout version.
//!
//! The code table and the column widths are the durable contract with the
//! tax authority. A format change adds a new `LayoutVersion` instead of
//! editing V1.

use rust_decimal::Decimal;

use crate::vat::{CreditCoefficient, PurchaseTotals, SalesTotals, VatDeclaration};

/// Field widths shared by all V1 files.
pub mod widths {
    /// Company or counterparty VAT number.
    pub const VAT_NUMBER: usize = 15;
    /// Company or counterparty name.
    pub const NAME: usize = 50;
    /// `YYYYMM`.
    pub const PERIOD: usize = 6;
    /// Submitter name.
    pub const SUBMITTER: usize = 50;
    /// Document counts and sequence numbers.
    pub const COUNT: usize = 15;
    /// Branch number.
    pub const BRANCH: usize = 4;
    /// Document type code.
    pub const DOCUMENT_TYPE: usize = 2;
    /// Document number.
    pub const DOCUMENT_NUMBER: usize = 20;
    /// `DD/MM/YYYY`.
    pub const DATE: usize = 10;
    /// Supply description.
    pub const DESCRIPTION: usize = 30;
    /// Sign, 11 integer digits, point, 2 decimals.
    pub const AMOUNT: usize = 15;
    /// Integer digits of an amount.
    pub const AMOUNT_DIGITS: usize = 11;
    /// `0.000` - `1.000`.
    pub const COEFFICIENT: usize = 5;
}

/// Branch written in every ledger record (head office).
pub const HEAD_OFFICE_BRANCH: &str = "0000";

/// Version of the regulator's file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutVersion {
    /// Initial layout.
    #[default]
    V1,
}

impl LayoutVersion {
    /// Declaration codes written after the header, in file order.
    #[must_use]
    pub fn declaration_codes(self) -> &'static [DeclarationCode] {
        match self {
            Self::V1 => &DECLARATION_CODES_V1,
        }
    }

    /// Purchase ledger amount columns, in file order.
    #[must_use]
    pub fn purchase_columns(self) -> &'static [PurchaseColumn] {
        match self {
            Self::V1 => &PURCHASE_COLUMNS_V1,
        }
    }

    /// Sales ledger amount columns, in file order.
    #[must_use]
    pub fn sales_columns(self) -> &'static [SalesColumn] {
        match self {
            Self::V1 => &SALES_COLUMNS_V1,
        }
    }
}

/// A statutory field of the declaration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationCode {
    /// 01 - total taxable base.
    TotalTaxableBase,
    /// 11 - base at 20%.
    Base20,
    /// 12 - base of intra-community acquisitions.
    BaseVop,
    /// 13 - base at 9%.
    Base9,
    /// 15 - base of intra-community supplies.
    BaseVod,
    /// 16 - zero-rated exports.
    BaseExport,
    /// 19 - exempt supplies.
    BaseExempt,
    /// 20 - total output VAT.
    OutputVat,
    /// 21 - VAT at 20%.
    Vat20,
    /// 22 - VAT on intra-community acquisitions.
    VatVop,
    /// 24 - VAT at 9%.
    Vat9,
    /// 30 - purchases without credit.
    PurchaseBaseNoCredit,
    /// 31 - purchases with full credit.
    PurchaseBaseFull,
    /// 32 - purchases with partial credit.
    PurchaseBasePartial,
    /// 33 - credit coefficient.
    CreditCoefficient,
    /// 40 - total deductible VAT.
    TotalDeductible,
    /// 41 - VAT with full credit.
    PurchaseVatFull,
    /// 42 - VAT with partial credit.
    PurchaseVatPartial,
    /// 50 - VAT to pay.
    VatToPay,
    /// 60 - VAT to refund.
    VatToRefund,
    /// 70 - paid by offset.
    PaidByOffset,
    /// 71 - paid effectively.
    PaidEffectively,
    /// 80 - refund under art. 92(1).
    RefundArt92Par1,
    /// 81 - refund under art. 92(3).
    RefundArt92Par3,
    /// 82 - refund under art. 92(4).
    RefundArt92Par4,
}

/// Value of one declaration code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeValue {
    /// Amount field, 15 wide.
    Amount(Decimal),
    /// Coefficient field, 5 wide.
    Coefficient(CreditCoefficient),
}

const DECLARATION_CODES_V1: [DeclarationCode; 25] = [
    DeclarationCode::TotalTaxableBase,
    DeclarationCode::Base20,
    DeclarationCode::BaseVop,
    DeclarationCode::Base9,
    DeclarationCode::BaseVod,
    DeclarationCode::BaseExport,
    DeclarationCode::BaseExempt,
    DeclarationCode::OutputVat,
    DeclarationCode::Vat20,
    DeclarationCode::VatVop,
    DeclarationCode::Vat9,
    DeclarationCode::PurchaseBaseNoCredit,
    DeclarationCode::PurchaseBaseFull,
    DeclarationCode::PurchaseBasePartial,
    DeclarationCode::CreditCoefficient,
    DeclarationCode::TotalDeductible,
    DeclarationCode::PurchaseVatFull,
    DeclarationCode::PurchaseVatPartial,
    DeclarationCode::VatToPay,
    DeclarationCode::VatToRefund,
    DeclarationCode::PaidByOffset,
    DeclarationCode::PaidEffectively,
    DeclarationCode::RefundArt92Par1,
    DeclarationCode::RefundArt92Par3,
    DeclarationCode::RefundArt92Par4,
];

impl DeclarationCode {
    /// The two-digit statutory code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::TotalTaxableBase => "01",
            Self::Base20 => "11",
            Self::BaseVop => "12",
            Self::Base9 => "13",
            Self::BaseVod => "15",
            Self::BaseExport => "16",
            Self::BaseExempt => "19",
            Self::OutputVat => "20",
            Self::Vat20 => "21",
            Self::VatVop => "22",
            Self::Vat9 => "24",
            Self::PurchaseBaseNoCredit => "30",
            Self::PurchaseBaseFull => "31",
            Self::PurchaseBasePartial => "32",
            Self::CreditCoefficient => "33",
            Self::TotalDeductible => "40",
            Self::PurchaseVatFull => "41",
            Self::PurchaseVatPartial => "42",
            Self::VatToPay => "50",
            Self::VatToRefund => "60",
            Self::PaidByOffset => "70",
            Self::PaidEffectively => "71",
            Self::RefundArt92Par1 => "80",
            Self::RefundArt92Par3 => "81",
            Self::RefundArt92Par4 => "82",
        }
    }

    /// Field name used in warnings and errors.
    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            Self::TotalTaxableBase => "code_01",
            Self::Base20 => "code_11",
            Self::BaseVop => "code_12",
            Self::Base9 => "code_13",
            Self::BaseVod => "code_15",
            Self::BaseExport => "code_16",
            Self::BaseExempt => "code_19",
            Self::OutputVat => "code_20",
            Self::Vat20 => "code_21",
            Self::VatVop => "code_22",
            Self::Vat9 => "code_24",
            Self::PurchaseBaseNoCredit => "code_30",
            Self::PurchaseBaseFull => "code_31",
            Self::PurchaseBasePartial => "code_32",
            Self::CreditCoefficient => "code_33",
            Self::TotalDeductible => "code_40",
            Self::PurchaseVatFull => "code_41",
            Self::PurchaseVatPartial => "code_42",
            Self::VatToPay => "code_50",
            Self::VatToRefund => "code_60",
            Self::PaidByOffset => "code_70",
            Self::PaidEffectively => "code_71",
            Self::RefundArt92Par1 => "code_80",
            Self::RefundArt92Par3 => "code_81",
            Self::RefundArt92Par4 => "code_82",
        }
    }

    /// Reads this code's value from a declaration.
    #[must_use]
    pub fn value(self, d: &VatDeclaration) -> CodeValue {
        let amount = match self {
            Self::CreditCoefficient => return CodeValue::Coefficient(d.credit_coefficient),
            Self::TotalTaxableBase => d.total_taxable_base(),
            Self::Base20 => d.sales_base_20,
            Self::BaseVop => d.sales_base_vop,
            Self::Base9 => d.sales_base_9,
            Self::BaseVod => d.sales_base_0_vod,
            Self::BaseExport => d.sales_base_0_export,
            Self::BaseExempt => d.sales_base_exempt,
            Self::OutputVat => d.output_vat_amount,
            Self::Vat20 => d.sales_vat_20,
            Self::VatVop => d.sales_vat_vop,
            Self::Vat9 => d.sales_vat_9,
            Self::PurchaseBaseNoCredit => d.purchase_base_no_credit,
            Self::PurchaseBaseFull => d.purchase_base_full_credit,
            Self::PurchaseBasePartial => d.purchase_base_partial_credit,
            Self::TotalDeductible => d.total_deductible_vat,
            Self::PurchaseVatFull => d.purchase_vat_full_credit,
            Self::PurchaseVatPartial => d.purchase_vat_partial_credit,
            Self::VatToPay => d.vat_to_pay,
            Self::VatToRefund => d.vat_to_refund,
            Self::PaidByOffset => d.settlement.paid_by_offset,
            Self::PaidEffectively => d.settlement.paid_effectively,
            Self::RefundArt92Par1 => d.settlement.refund_art92_1,
            Self::RefundArt92Par3 => d.settlement.refund_art92_3,
            Self::RefundArt92Par4 => d.settlement.refund_art92_4,
        };
        CodeValue::Amount(amount)
    }
}

/// An amount column of the purchase ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseColumn {
    /// Base without credit (code 30).
    BaseNoCredit,
    /// Base with full credit (code 31).
    BaseFull,
    /// VAT with full credit (code 41).
    VatFull,
    /// Base with partial credit (code 32).
    BasePartial,
    /// VAT with partial credit (code 42).
    VatPartial,
}

const PURCHASE_COLUMNS_V1: [PurchaseColumn; 5] = [
    PurchaseColumn::BaseNoCredit,
    PurchaseColumn::BaseFull,
    PurchaseColumn::VatFull,
    PurchaseColumn::BasePartial,
    PurchaseColumn::VatPartial,
];

impl PurchaseColumn {
    /// Field name used in warnings and errors.
    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            Self::BaseNoCredit => "base_no_credit",
            Self::BaseFull => "base_full_credit",
            Self::VatFull => "vat_full_credit",
            Self::BasePartial => "base_partial_credit",
            Self::VatPartial => "vat_partial_credit",
        }
    }

    /// Reads the column from a row or from the file totals.
    #[must_use]
    pub fn value(self, totals: &PurchaseTotals) -> Decimal {
        match self {
            Self::BaseNoCredit => totals.base_no_credit,
            Self::BaseFull => totals.base_full,
            Self::VatFull => totals.vat_full,
            Self::BasePartial => totals.base_partial,
            Self::VatPartial => totals.vat_partial,
        }
    }
}

/// An amount column of the sales ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesColumn {
    /// All bases (code 01).
    TotalBase,
    /// All VAT (code 20).
    TotalVat,
    /// Base at 20% (code 11).
    Base20,
    /// VAT at 20% (code 21).
    Vat20,
    /// Base of intra-community acquisitions (code 12).
    BaseVop,
    /// VAT on intra-community acquisitions (code 22).
    VatVop,
    /// Base at 9% (code 13).
    Base9,
    /// VAT at 9% (code 24).
    Vat9,
    /// Zero-rated exports (code 16).
    BaseExport,
    /// Intra-community supplies (code 15).
    BaseVod,
    /// Exempt supplies (code 19).
    BaseExempt,
}

const SALES_COLUMNS_V1: [SalesColumn; 11] = [
    SalesColumn::TotalBase,
    SalesColumn::TotalVat,
    SalesColumn::Base20,
    SalesColumn::Vat20,
    SalesColumn::BaseVop,
    SalesColumn::VatVop,
    SalesColumn::Base9,
    SalesColumn::Vat9,
    SalesColumn::BaseExport,
    SalesColumn::BaseVod,
    SalesColumn::BaseExempt,
];

impl SalesColumn {
    /// Field name used in warnings and errors.
    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            Self::TotalBase => "total_base",
            Self::TotalVat => "total_vat",
            Self::Base20 => "base_20",
            Self::Vat20 => "vat_20",
            Self::BaseVop => "base_vop",
            Self::VatVop => "vat_vop",
            Self::Base9 => "base_9",
            Self::Vat9 => "vat_9",
            Self::BaseExport => "base_0_export",
            Self::BaseVod => "base_0_vod",
            Self::BaseExempt => "base_exempt",
        }
    }

    /// Reads the column from a row or from the file totals.
    #[must_use]
    pub fn value(self, totals: &SalesTotals) -> Decimal {
        match self {
            Self::TotalBase => totals.total_base(),
            Self::TotalVat => totals.total_vat(),
            Self::Base20 => totals.base_20,
            Self::Vat20 => totals.vat_20,
            Self::BaseVop => totals.base_vop,
            Self::VatVop => totals.vat_vop,
            Self::Base9 => totals.base_9,
            Self::Vat9 => totals.vat_9,
            Self::BaseExport => totals.base_0_export,
            Self::BaseVod => totals.base_0_vod,
            Self::BaseExempt => totals.base_exempt,
        }
    }
}
