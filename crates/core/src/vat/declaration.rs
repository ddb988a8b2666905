//! The VAT declaration: aggregated totals plus the settlement sections.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dds_shared::types::round_currency;

use crate::vat::coefficient::CreditCoefficient;
use crate::vat::error::VatError;

/// How a payable or refundable result is settled (codes 70-82).
///
/// The two halves must add up to `vat_to_pay` and `vat_to_refund`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    /// Code 70: VAT to pay offset against refundable VAT.
    pub paid_by_offset: Decimal,
    /// Code 71: VAT to pay paid effectively.
    pub paid_effectively: Decimal,
    /// Code 80: refundable VAT handled under art. 92(1).
    pub refund_art92_1: Decimal,
    /// Code 81: refundable VAT handled under art. 92(3).
    pub refund_art92_3: Decimal,
    /// Code 82: refundable VAT handled under art. 92(4).
    pub refund_art92_4: Decimal,
}

impl Settlement {
    /// Default split: everything paid effectively or carried under art. 92(1).
    #[must_use]
    pub fn for_result(vat_to_pay: Decimal, vat_to_refund: Decimal) -> Self {
        let zero = round_currency(Decimal::ZERO);
        Self {
            paid_by_offset: zero,
            paid_effectively: vat_to_pay,
            refund_art92_1: vat_to_refund,
            refund_art92_3: zero,
            refund_art92_4: zero,
        }
    }

    /// Codes 70 + 71.
    #[must_use]
    pub fn payable_total(&self) -> Decimal {
        self.paid_by_offset + self.paid_effectively
    }

    /// Codes 80 + 81 + 82.
    #[must_use]
    pub fn refundable_total(&self) -> Decimal {
        self.refund_art92_1 + self.refund_art92_3 + self.refund_art92_4
    }

    fn rounded(self) -> Self {
        Self {
            paid_by_offset: round_currency(self.paid_by_offset),
            paid_effectively: round_currency(self.paid_effectively),
            refund_art92_1: round_currency(self.refund_art92_1),
            refund_art92_3: round_currency(self.refund_art92_3),
            refund_art92_4: round_currency(self.refund_art92_4),
        }
    }

    fn has_negative(&self) -> bool {
        [
            self.paid_by_offset,
            self.paid_effectively,
            self.refund_art92_1,
            self.refund_art92_3,
            self.refund_art92_4,
        ]
        .iter()
        .any(|v| *v < Decimal::ZERO)
    }
}

/// Aggregated VAT declaration for one period.
///
/// All amounts carry two decimal places. Derived fields are recomputed by
/// [`VatDeclaration::settle`] and never edited directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatDeclaration {
    /// Code 11: taxable base at 20%.
    pub sales_base_20: Decimal,
    /// Code 13: taxable base at 9%.
    pub sales_base_9: Decimal,
    /// Code 12: taxable base of intra-community acquisitions.
    pub sales_base_vop: Decimal,
    /// Code 16: zero-rated exports.
    pub sales_base_0_export: Decimal,
    /// Code 15: zero-rated intra-community supplies.
    pub sales_base_0_vod: Decimal,
    /// Code 19: exempt supplies.
    pub sales_base_exempt: Decimal,
    /// Code 21: VAT at 20%.
    pub sales_vat_20: Decimal,
    /// Code 24: VAT at 9%.
    pub sales_vat_9: Decimal,
    /// Code 22: VAT on intra-community acquisitions.
    pub sales_vat_vop: Decimal,
    /// Code 20: total output VAT.
    pub output_vat_amount: Decimal,
    /// Number of distinct sales documents.
    pub sales_document_count: u32,

    /// Code 31: purchase base with full credit.
    pub purchase_base_full_credit: Decimal,
    /// Code 32: purchase base with partial credit.
    pub purchase_base_partial_credit: Decimal,
    /// Code 30: purchase base without credit.
    pub purchase_base_no_credit: Decimal,
    /// Code 41: VAT with full credit.
    pub purchase_vat_full_credit: Decimal,
    /// Code 42: VAT with partial credit.
    pub purchase_vat_partial_credit: Decimal,
    /// Code 33: credit coefficient applied to code 42.
    pub credit_coefficient: CreditCoefficient,
    /// Code 40: total deductible VAT.
    pub total_deductible_vat: Decimal,
    /// Number of distinct purchase documents.
    pub purchase_document_count: u32,

    /// Code 50: VAT to pay.
    pub vat_to_pay: Decimal,
    /// Code 60: VAT to refund.
    pub vat_to_refund: Decimal,
    /// Codes 70-82.
    pub settlement: Settlement,
}

impl Default for VatDeclaration {
    fn default() -> Self {
        let zero = round_currency(Decimal::ZERO);
        Self {
            sales_base_20: zero,
            sales_base_9: zero,
            sales_base_vop: zero,
            sales_base_0_export: zero,
            sales_base_0_vod: zero,
            sales_base_exempt: zero,
            sales_vat_20: zero,
            sales_vat_9: zero,
            sales_vat_vop: zero,
            output_vat_amount: zero,
            sales_document_count: 0,
            purchase_base_full_credit: zero,
            purchase_base_partial_credit: zero,
            purchase_base_no_credit: zero,
            purchase_vat_full_credit: zero,
            purchase_vat_partial_credit: zero,
            credit_coefficient: CreditCoefficient::zero(),
            total_deductible_vat: zero,
            purchase_document_count: 0,
            vat_to_pay: zero,
            vat_to_refund: zero,
            settlement: Settlement::for_result(zero, zero),
        }
    }
}

impl VatDeclaration {
    /// Code 01: sum of all six sales bases.
    #[must_use]
    pub fn total_taxable_base(&self) -> Decimal {
        self.sales_base_20
            + self.sales_base_9
            + self.sales_base_vop
            + self.sales_base_0_export
            + self.sales_base_0_vod
            + self.sales_base_exempt
    }

    /// Output VAT minus deductible VAT (positive means payable).
    #[must_use]
    pub fn net_result(&self) -> Decimal {
        self.output_vat_amount - self.total_deductible_vat
    }

    /// Recomputes every derived field from the partition sums.
    ///
    /// Resets the settlement sections to their defaults.
    pub fn settle(&mut self) {
        self.output_vat_amount = self.sales_vat_20 + self.sales_vat_9 + self.sales_vat_vop;
        self.total_deductible_vat = self.purchase_vat_full_credit
            + self.credit_coefficient.apply(self.purchase_vat_partial_credit);

        let zero = round_currency(Decimal::ZERO);
        let delta = self.net_result();
        if delta >= Decimal::ZERO {
            self.vat_to_pay = round_currency(delta);
            self.vat_to_refund = zero;
        } else {
            self.vat_to_pay = zero;
            self.vat_to_refund = round_currency(-delta);
        }
        self.settlement = Settlement::for_result(self.vat_to_pay, self.vat_to_refund);
    }

    /// Replaces the settlement sections after checking they add up.
    ///
    /// # Errors
    ///
    /// Returns `VatError::NegativeSettlement` for a negative code and
    /// `VatError::SettlementMismatch` when a section does not add up.
    pub fn apply_settlement(&mut self, settlement: Settlement) -> Result<(), VatError> {
        let settlement = settlement.rounded();
        if settlement.has_negative() {
            return Err(VatError::NegativeSettlement);
        }
        if settlement.payable_total() != self.vat_to_pay {
            return Err(VatError::SettlementMismatch {
                section: "70+71",
                expected: self.vat_to_pay,
                actual: settlement.payable_total(),
            });
        }
        if settlement.refundable_total() != self.vat_to_refund {
            return Err(VatError::SettlementMismatch {
                section: "80+81+82",
                expected: self.vat_to_refund,
                actual: settlement.refundable_total(),
            });
        }
        self.settlement = settlement;
        Ok(())
    }

    /// Checks the result and settlement invariants.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        let result_matches = self.net_result() == self.vat_to_pay - self.vat_to_refund;
        let exclusive = self.vat_to_pay.is_zero() || self.vat_to_refund.is_zero();
        let non_negative = self.vat_to_pay >= Decimal::ZERO && self.vat_to_refund >= Decimal::ZERO;
        let deductible_matches = self.total_deductible_vat
            == self.purchase_vat_full_credit
                + self.credit_coefficient.apply(self.purchase_vat_partial_credit);
        let settled = self.settlement.payable_total() == self.vat_to_pay
            && self.settlement.refundable_total() == self.vat_to_refund;

        result_matches && exclusive && non_negative && deductible_matches && settled
    }
}
