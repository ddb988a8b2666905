//! Integration tests for the ledger repository.

mod common;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use dds_core::vat::{LedgerSource, VatRole};
use dds_db::LedgerRepository;
use dds_shared::types::CompanyId;

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

#[tokio::test]
#[ignore = "requires a migrated database at DATABASE_URL"]
async fn test_lines_filtered_by_role_and_dates() {
    let db = common::connect().await;
    let company = common::create_company(&db, Some(dec!(0.6))).await;

    common::create_line(&db, company, "0000000002", date(3, 5), "sale_standard_20", dec!(1000), dec!(200)).await;
    common::create_line(&db, company, "0000000001", date(3, 31), "sale_reduced_9", dec!(100), dec!(9)).await;
    common::create_line(&db, company, "0000000003", date(4, 1), "sale_standard_20", dec!(50), dec!(10)).await;
    common::create_line(&db, company, "0000000010", date(3, 10), "purchase_full_credit", dec!(500), dec!(100)).await;

    let repo = LedgerRepository::new(db);
    let company_id = CompanyId::from_uuid(company);

    let sales = repo
        .lines(company_id, date(3, 1), date(3, 31), VatRole::Sales)
        .await
        .expect("Failed to read sales");
    let numbers: Vec<&str> = sales.iter().map(|l| l.document_number.as_str()).collect();
    assert_eq!(numbers, ["0000000001", "0000000002"]);

    let purchases = repo
        .lines(company_id, date(3, 1), date(3, 31), VatRole::Purchase)
        .await
        .unwrap();
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0].vat_amount, dec!(100));
}

#[tokio::test]
#[ignore = "requires a migrated database at DATABASE_URL"]
async fn test_company_profile() {
    let db = common::connect().await;
    let company = common::create_company(&db, Some(dec!(0.6))).await;
    let repo = LedgerRepository::new(db);

    let profile = repo
        .company(CompanyId::from_uuid(company))
        .await
        .unwrap()
        .expect("Company should exist");
    assert_eq!(profile.name, "Фирма ООД");
    assert_eq!(
        profile.credit_coefficient.map(|c| c.value()),
        Some(dec!(0.600))
    );

    assert!(repo.company(CompanyId::new()).await.unwrap().is_none());
}
