//! Service tests against the in-memory adapters.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use dds_shared::types::{CompanyId, VatReturnId};

use super::service::VatReturnService;
use super::types::DeclarationUpdate;
use super::VatReturnError;
use crate::export::{ExportKind, encoding};
use crate::lifecycle::VatReturnStatus;
use crate::memory::{InMemoryLedger, InMemoryVatReturnStore};
use crate::vat::{
    CompanyProfile, CreditCoefficient, CreditRight, DocumentType, LedgerLine, SalesCategory,
    Settlement, StatutoryDueDate, VatOperation,
};

type Service = VatReturnService<InMemoryVatReturnStore, InMemoryLedger>;

struct Fixture {
    service: Service,
    store: Arc<InMemoryVatReturnStore>,
    ledger: Arc<InMemoryLedger>,
    company_id: CompanyId,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn line(number: &str, base: Decimal, vat: Decimal, operation: VatOperation) -> LedgerLine {
    LedgerLine {
        document_number: number.to_string(),
        document_type: DocumentType::Invoice,
        document_date: date(2025, 3, 12),
        vat_date: date(2025, 3, 12),
        counterparty_vat_number: Some("BG175074752".to_string()),
        counterparty_name: "Доставчик ООД".to_string(),
        description: "стоки".to_string(),
        tax_base: base,
        vat_amount: vat,
        operation,
    }
}

/// The reference period: 1000.00 at 20%, 50.00 full credit, 100.00 partial
/// credit at coefficient 0.500.
fn reference_lines() -> Vec<LedgerLine> {
    vec![
        line("1", dec!(1000.00), dec!(200.00), VatOperation::Sale(SalesCategory::Standard20)),
        line("10", dec!(250.00), dec!(50.00), VatOperation::Purchase(CreditRight::Full)),
        line("11", dec!(500.00), dec!(100.00), VatOperation::Purchase(CreditRight::Partial)),
    ]
}

async fn fixture(coefficient: Option<Decimal>) -> Fixture {
    let store = Arc::new(InMemoryVatReturnStore::new());
    let ledger = Arc::new(InMemoryLedger::new());
    let company_id = CompanyId::new();
    ledger
        .add_company(CompanyProfile {
            id: company_id,
            name: "Фирма ЕООД".to_string(),
            vat_number: "BG999999999".to_string(),
            submitter_name: "Иван Иванов".to_string(),
            credit_coefficient: coefficient.map(|c| CreditCoefficient::new(c).unwrap()),
        })
        .await;
    let service = VatReturnService::new(Arc::clone(&store), Arc::clone(&ledger))
        .with_due_date_policy(Arc::new(StatutoryDueDate::new(14, true)));
    Fixture {
        service,
        store,
        ledger,
        company_id,
    }
}

async fn calculated(f: &Fixture) -> VatReturnId {
    f.ledger.add_lines(f.company_id, reference_lines()).await;
    f.service.generate(f.company_id, 2025, 3).await.unwrap().id
}

#[tokio::test]
async fn test_generate_reference_scenario() {
    let f = fixture(Some(dec!(0.5))).await;
    f.ledger.add_lines(f.company_id, reference_lines()).await;

    let r = f.service.generate(f.company_id, 2025, 3).await.unwrap();
    assert_eq!(r.status, VatReturnStatus::Calculated);
    assert!(r.calculated_at.is_some());
    // 2025-04-14 is a Monday
    assert_eq!(r.due_date, date(2025, 4, 14));

    let d = r.declaration.unwrap();
    assert_eq!(d.output_vat_amount, dec!(200.00));
    assert_eq!(d.total_deductible_vat, dec!(100.00));
    assert_eq!(d.vat_to_pay, dec!(100.00));
    assert_eq!(d.vat_to_refund, dec!(0.00));
    assert_eq!(d.sales_document_count, 1);
    assert_eq!(d.purchase_document_count, 2);
    assert_eq!(d.settlement.paid_effectively, dec!(100.00));
}

#[tokio::test]
async fn test_generate_is_idempotent() {
    let f = fixture(Some(dec!(0.5))).await;
    f.ledger.add_lines(f.company_id, reference_lines()).await;

    let first = f.service.generate(f.company_id, 2025, 3).await.unwrap();
    let second = f.service.generate(f.company_id, 2025, 3).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.declaration, second.declaration);
    assert_eq!(f.store.count().await, 1);
}

#[tokio::test]
async fn test_generate_rejects_invalid_month() {
    let f = fixture(None).await;
    let err = f.service.generate(f.company_id, 2025, 13).await.unwrap_err();
    assert!(matches!(err, VatReturnError::InvalidPeriod { month: 13, .. }));
}

#[tokio::test]
async fn test_generate_unknown_company_is_not_found() {
    let f = fixture(None).await;
    let err = f.service.generate(CompanyId::new(), 2025, 3).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(f.store.count().await, 0);
}

#[tokio::test]
async fn test_failed_generate_keeps_previous_declaration() {
    let f = fixture(None).await;
    f.ledger
        .add_lines(
            f.company_id,
            vec![line("1", dec!(100), dec!(20), VatOperation::Sale(SalesCategory::Standard20))],
        )
        .await;
    let before = f.service.generate(f.company_id, 2025, 3).await.unwrap();

    // a partial-credit purchase without a coefficient cannot be aggregated
    f.ledger
        .add_lines(
            f.company_id,
            vec![line("7", dec!(50), dec!(10), VatOperation::Purchase(CreditRight::Partial))],
        )
        .await;
    let err = f.service.generate(f.company_id, 2025, 3).await.unwrap_err();
    assert!(matches!(err, VatReturnError::MissingCreditCoefficient));

    let after = f.service.get(before.id).await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_concurrent_generate_writes_once() {
    let f = fixture(Some(dec!(0.5))).await;
    f.ledger.add_lines(f.company_id, reference_lines()).await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = f.service.clone();
            let company_id = f.company_id;
            tokio::spawn(async move { service.generate(company_id, 2025, 3).await })
        })
        .collect();

    let results = futures::future::join_all(handles).await;
    let returns: Vec<_> = results
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(f.store.count().await, 1);
    assert!(returns.iter().all(|r| r.id == returns[0].id));
    assert!(returns.iter().all(|r| r.declaration == returns[0].declaration));
}

#[tokio::test]
async fn test_open_draft_and_duplicate() {
    let f = fixture(None).await;
    let draft = f.service.open_draft(f.company_id, 2025, 3).await.unwrap();
    assert_eq!(draft.status, VatReturnStatus::Draft);
    assert!(draft.declaration.is_none());

    let err = f.service.open_draft(f.company_id, 2025, 3).await.unwrap_err();
    assert_eq!(err.error_code(), "CONFLICT");

    // generating a draft period fills it in place
    let r = f.service.generate(f.company_id, 2025, 3).await.unwrap();
    assert_eq!(r.id, draft.id);
    assert_eq!(r.status, VatReturnStatus::Calculated);
}

#[tokio::test]
async fn test_open_draft_unknown_company() {
    let f = fixture(None).await;
    let err = f.service.open_draft(CompanyId::new(), 2025, 3).await.unwrap_err();
    assert!(matches!(err, VatReturnError::NotFound(_)));
}

#[tokio::test]
async fn test_submit_once() {
    let f = fixture(Some(dec!(0.5))).await;
    let id = calculated(&f).await;

    let submitted = f.service.submit(id).await.unwrap();
    assert_eq!(submitted.status, VatReturnStatus::Submitted);
    assert!(submitted.submitted_at.is_some());

    let err = f.service.submit(id).await.unwrap_err();
    assert!(matches!(
        err,
        VatReturnError::InvalidTransition {
            from: VatReturnStatus::Submitted,
            to: VatReturnStatus::Submitted
        }
    ));
}

#[tokio::test]
async fn test_submit_draft_is_invalid_transition() {
    let f = fixture(None).await;
    let draft = f.service.open_draft(f.company_id, 2025, 3).await.unwrap();
    let err = f.service.submit(draft.id).await.unwrap_err();
    assert_eq!(err.error_code(), "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_filed_return_is_immutable() {
    let f = fixture(Some(dec!(0.5))).await;
    let id = calculated(&f).await;
    f.service.submit(id).await.unwrap();

    let err = f.service.generate(f.company_id, 2025, 3).await.unwrap_err();
    assert_eq!(err.error_code(), "CONFLICT");

    let err = f
        .service
        .update(
            id,
            DeclarationUpdate {
                credit_coefficient: Some(dec!(0.3)),
                settlement: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "CONFLICT");

    let err = f.service.delete(id).await.unwrap_err();
    assert_eq!(err.error_code(), "CONFLICT");
    assert_eq!(f.store.count().await, 1);
}

#[tokio::test]
async fn test_record_external_status() {
    let f = fixture(Some(dec!(0.5))).await;
    let id = calculated(&f).await;

    let err = f
        .service
        .record_status(id, VatReturnStatus::Accepted)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_TRANSITION");

    f.service.submit(id).await.unwrap();
    let accepted = f
        .service
        .record_status(id, VatReturnStatus::Accepted)
        .await
        .unwrap();
    assert!(accepted.accepted_at.is_some());

    let paid = f.service.record_status(id, VatReturnStatus::Paid).await.unwrap();
    assert_eq!(paid.status, VatReturnStatus::Paid);
    assert!(paid.paid_at.is_some());

    let err = f
        .service
        .record_status(id, VatReturnStatus::Calculated)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_update_coefficient_resettles() {
    let f = fixture(Some(dec!(0.5))).await;
    let id = calculated(&f).await;

    let updated = f
        .service
        .update(
            id,
            DeclarationUpdate {
                credit_coefficient: Some(dec!(1)),
                settlement: None,
            },
        )
        .await
        .unwrap();
    let d = updated.declaration.unwrap();
    assert_eq!(d.credit_coefficient.value(), dec!(1.000));
    assert_eq!(d.total_deductible_vat, dec!(150.00));
    assert_eq!(d.vat_to_pay, dec!(50.00));
    assert_eq!(d.settlement.paid_effectively, dec!(50.00));
    assert!(d.is_balanced());
}

#[tokio::test]
async fn test_update_settlement_split() {
    let f = fixture(Some(dec!(0.5))).await;
    let id = calculated(&f).await;

    let updated = f
        .service
        .update(
            id,
            DeclarationUpdate {
                credit_coefficient: None,
                settlement: Some(Settlement {
                    paid_by_offset: dec!(30.00),
                    paid_effectively: dec!(70.00),
                    ..Settlement::default()
                }),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.declaration.unwrap().settlement.paid_by_offset, dec!(30.00));

    let err = f
        .service
        .update(
            id,
            DeclarationUpdate {
                credit_coefficient: None,
                settlement: Some(Settlement {
                    paid_effectively: dec!(99.00),
                    ..Settlement::default()
                }),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");

    // the rejected split left the stored one alone
    let stored = f.service.get(id).await.unwrap();
    assert_eq!(stored.declaration.unwrap().settlement.paid_by_offset, dec!(30.00));
}

#[tokio::test]
async fn test_update_rejects_out_of_range_coefficient() {
    let f = fixture(Some(dec!(0.5))).await;
    let id = calculated(&f).await;
    let err = f
        .service
        .update(
            id,
            DeclarationUpdate {
                credit_coefficient: Some(dec!(1.2)),
                settlement: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_update_draft_is_incomplete() {
    let f = fixture(None).await;
    let draft = f.service.open_draft(f.company_id, 2025, 3).await.unwrap();
    let err = f
        .service
        .update(draft.id, DeclarationUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, VatReturnError::IncompleteDeclaration { .. }));
}

#[tokio::test]
async fn test_delete_calculated_return() {
    let f = fixture(Some(dec!(0.5))).await;
    let id = calculated(&f).await;
    f.service.delete(id).await.unwrap();
    assert_eq!(f.store.count().await, 0);

    let err = f.service.get(id).await.unwrap_err();
    assert!(matches!(err, VatReturnError::NotFound(_)));
    let err = f.service.delete(id).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_list_newest_first() {
    let f = fixture(None).await;
    for month in [1, 3, 2] {
        f.service.open_draft(f.company_id, 2025, month).await.unwrap();
    }
    f.service.open_draft(f.company_id, 2024, 12).await.unwrap();

    let periods: Vec<(i32, u32)> = f
        .service
        .list_by_company(f.company_id)
        .await
        .unwrap()
        .iter()
        .map(|r| (r.period_year, r.period_month))
        .collect();
    assert_eq!(periods, [(2025, 3), (2025, 2), (2025, 1), (2024, 12)]);
}

#[tokio::test]
async fn test_export_draft_is_incomplete() {
    let f = fixture(None).await;
    let draft = f.service.open_draft(f.company_id, 2025, 3).await.unwrap();
    for kind in ExportKind::ALL {
        let err = f.service.export(draft.id, kind).await.unwrap_err();
        assert_eq!(err.error_code(), "INCOMPLETE_DECLARATION");
    }
}

#[tokio::test]
async fn test_export_does_not_mutate() {
    let f = fixture(Some(dec!(0.5))).await;
    let id = calculated(&f).await;
    let before = f.service.get(id).await.unwrap();

    for kind in ExportKind::ALL {
        let artifact = f.service.export(id, kind).await.unwrap();
        assert_eq!(artifact.file_name, kind.file_name());
        assert!(artifact.bytes.ends_with(b"\r\n"));
    }
    assert_eq!(f.service.get(id).await.unwrap(), before);
}

#[tokio::test]
async fn test_purchase_ledger_is_in_document_order() {
    let f = fixture(Some(dec!(0.5))).await;
    let id = calculated(&f).await;
    let artifact = f.service.export(id, ExportKind::PurchaseLedger).await.unwrap();
    let text = encoding::decode(&artifact.bytes);
    let records: Vec<&str> = text.split_terminator("\r\n").collect();
    assert_eq!(records.len(), 3);
    // sequence, then document type and number
    assert!(records[0][25..62].starts_with("00000000000000101"));
    assert!(records[0][42..62].starts_with("10 "));
    assert!(records[1][42..62].starts_with("11 "));
}

#[tokio::test]
async fn test_export_after_ledger_change_is_stale() {
    let f = fixture(Some(dec!(0.5))).await;
    let id = calculated(&f).await;
    f.ledger
        .add_lines(
            f.company_id,
            vec![line("2", dec!(10), dec!(2), VatOperation::Sale(SalesCategory::Standard20))],
        )
        .await;

    let err = f.service.export(id, ExportKind::SalesLedger).await.unwrap_err();
    assert_eq!(err.error_code(), "STALE_DECLARATION");
    // the declaration file does not depend on the ledger
    assert!(f.service.export(id, ExportKind::Declaration).await.is_ok());
    // the purchase ledger is unchanged
    assert!(f.service.export(id, ExportKind::PurchaseLedger).await.is_ok());
}

#[tokio::test]
async fn test_bundle_holds_the_three_files() {
    let f = fixture(Some(dec!(0.5))).await;
    let id = calculated(&f).await;

    let bundle = f.service.export_bundle(id).await.unwrap();
    assert_eq!(bundle.file_name, "VAT_2025_03.zip");
    assert!(bundle.warnings.is_empty());

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bundle.bytes)).unwrap();
    for kind in ExportKind::ALL {
        let single = f.service.export(id, kind).await.unwrap();
        let mut content = Vec::new();
        std::io::Read::read_to_end(&mut archive.by_name(kind.file_name()).unwrap(), &mut content)
            .unwrap();
        assert_eq!(content, single.bytes);
    }
}

#[tokio::test]
async fn test_bundle_of_draft_or_stale_return_fails() {
    let f = fixture(Some(dec!(0.5))).await;
    let draft = f.service.open_draft(f.company_id, 2025, 2).await.unwrap();
    let err = f.service.export_bundle(draft.id).await.unwrap_err();
    assert_eq!(err.error_code(), "INCOMPLETE_DECLARATION");

    let id = calculated(&f).await;
    f.ledger
        .add_lines(
            f.company_id,
            vec![line("2", dec!(10), dec!(2), VatOperation::Sale(SalesCategory::Standard20))],
        )
        .await;
    let err = f.service.export_bundle(id).await.unwrap_err();
    assert_eq!(err.error_code(), "STALE_DECLARATION");
}
