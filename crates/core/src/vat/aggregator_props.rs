//! Property-based tests for the VAT aggregator.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::vat::aggregator::{PurchaseTotals, SalesTotals, VatAggregator};
use crate::vat::coefficient::CreditCoefficient;
use crate::vat::types::{
    CreditRight, DocumentType, LedgerLine, SalesCategory, VatOperation,
};

/// Non-negative amounts with up to three decimals, so rounding is exercised.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 3))
}

fn arb_coefficient() -> impl Strategy<Value = CreditCoefficient> {
    (0i64..=1000i64).prop_map(|n| CreditCoefficient::new(Decimal::new(n, 3)).unwrap())
}

fn arb_category() -> impl Strategy<Value = SalesCategory> {
    prop_oneof![
        Just(SalesCategory::Standard20),
        Just(SalesCategory::Reduced9),
        Just(SalesCategory::IntraCommunityAcquisition),
        Just(SalesCategory::ZeroRateExport),
        Just(SalesCategory::IntraCommunitySupply),
        Just(SalesCategory::Exempt),
    ]
}

fn arb_credit_right() -> impl Strategy<Value = CreditRight> {
    prop_oneof![
        Just(CreditRight::Full),
        Just(CreditRight::Partial),
        Just(CreditRight::NoCredit),
    ]
}

fn make_line(number: u32, operation: VatOperation, base: Decimal, vat: Decimal) -> LedgerLine {
    let date = NaiveDate::from_ymd_opt(2025, 3, 1 + number % 28).unwrap();
    LedgerLine {
        document_number: number.to_string(),
        document_type: DocumentType::Invoice,
        document_date: date,
        vat_date: date,
        counterparty_vat_number: None,
        counterparty_name: "Client".to_string(),
        description: String::new(),
        tax_base: base,
        vat_amount: vat,
        operation,
    }
}

fn arb_sales() -> impl Strategy<Value = Vec<LedgerLine>> {
    prop::collection::vec((0u32..50, arb_category(), arb_amount(), arb_amount()), 0..30)
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(n, category, base, vat)| {
                    let vat = if category.carries_vat() { vat } else { Decimal::ZERO };
                    make_line(n, VatOperation::Sale(category), base, vat)
                })
                .collect()
        })
}

fn arb_purchases() -> impl Strategy<Value = Vec<LedgerLine>> {
    prop::collection::vec((0u32..50, arb_credit_right(), arb_amount(), arb_amount()), 0..30)
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(n, right, base, vat)| make_line(n, VatOperation::Purchase(right), base, vat))
                .collect()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Exactly one of pay/refund is nonzero, and their difference is the net result.
    #[test]
    fn prop_result_is_exclusive_and_exact(
        purchases in arb_purchases(),
        sales in arb_sales(),
        coefficient in arb_coefficient(),
    ) {
        let d = VatAggregator::aggregate(&purchases, &sales, Some(coefficient)).unwrap();

        prop_assert!(d.vat_to_pay >= Decimal::ZERO);
        prop_assert!(d.vat_to_refund >= Decimal::ZERO);
        prop_assert!(d.vat_to_pay.is_zero() || d.vat_to_refund.is_zero());
        prop_assert_eq!(d.output_vat_amount - d.total_deductible_vat, d.vat_to_pay - d.vat_to_refund);
        prop_assert!(d.is_balanced());
    }

    /// Deductible VAT is full credit plus the rounded partial share.
    #[test]
    fn prop_deductible_formula(
        purchases in arb_purchases(),
        coefficient in arb_coefficient(),
    ) {
        let d = VatAggregator::aggregate(&purchases, &[], Some(coefficient)).unwrap();
        let expected = d.purchase_vat_full_credit
            + (d.purchase_vat_partial_credit * coefficient.value())
                .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        prop_assert_eq!(d.total_deductible_vat, expected);
    }

    /// Aggregating the same snapshot twice yields identical declarations.
    #[test]
    fn prop_aggregation_is_idempotent(
        purchases in arb_purchases(),
        sales in arb_sales(),
        coefficient in arb_coefficient(),
    ) {
        let first = VatAggregator::aggregate(&purchases, &sales, Some(coefficient)).unwrap();
        let second = VatAggregator::aggregate(&purchases, &sales, Some(coefficient)).unwrap();
        prop_assert_eq!(first.sales_vat_20.to_string(), second.sales_vat_20.to_string());
        prop_assert_eq!(first, second);
    }

    /// Line order never changes the totals.
    #[test]
    fn prop_order_independent(sales in arb_sales()) {
        let mut reversed = sales.clone();
        reversed.reverse();
        prop_assert_eq!(
            SalesTotals::from_lines(&sales).unwrap(),
            SalesTotals::from_lines(&reversed).unwrap()
        );
    }

    /// Totals recomputed from the same lines always match the declaration.
    #[test]
    fn prop_totals_match_declaration(
        purchases in arb_purchases(),
        sales in arb_sales(),
        coefficient in arb_coefficient(),
    ) {
        let d = VatAggregator::aggregate(&purchases, &sales, Some(coefficient)).unwrap();
        let sales_totals = SalesTotals::from_lines(&sales).unwrap();
        let purchase_totals = PurchaseTotals::from_lines(&purchases).unwrap();
        prop_assert!(sales_totals.matches(&d));
        prop_assert!(purchase_totals.matches(&d));
        prop_assert_eq!(sales_totals.total_base(), d.total_taxable_base());
        prop_assert_eq!(sales_totals.total_vat(), d.output_vat_amount);
    }
}
