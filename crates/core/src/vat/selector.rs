//! Period transaction selector.
//!
//! Reads VAT-relevant ledger lines for one company and month. The ledger
//! itself lives behind [`LedgerSource`], implemented by the db crate.

use chrono::NaiveDate;
use std::cmp::Ordering;

use dds_shared::types::CompanyId;

use crate::vat::error::VatError;
use crate::vat::period::PeriodKey;
use crate::vat::types::{CompanyProfile, LedgerLine, VatRole};

/// Read-only access to the accounting ledger.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait LedgerSource: Send + Sync {
    /// Look up a company profile.
    fn company(
        &self,
        company_id: CompanyId,
    ) -> impl std::future::Future<Output = Result<Option<CompanyProfile>, VatError>> + Send;

    /// Lines of `role` whose VAT date lies in `from..=to`.
    fn lines(
        &self,
        company_id: CompanyId,
        from: NaiveDate,
        to: NaiveDate,
        role: VatRole,
    ) -> impl std::future::Future<Output = Result<Vec<LedgerLine>, VatError>> + Send;
}

/// Everything the aggregator and exporter need for one period.
#[derive(Debug, Clone)]
pub struct PeriodSelection {
    /// The company the period belongs to.
    pub company: CompanyProfile,
    /// Purchase lines in ledger order.
    pub purchases: Vec<LedgerLine>,
    /// Sales lines in ledger order.
    pub sales: Vec<LedgerLine>,
}

/// Selects the lines of one role for `period`, sorted by document number.
///
/// The result is filtered again on VAT date and role, so a source that
/// returns a wider range cannot leak lines into the period.
///
/// # Errors
///
/// Returns `VatError::CompanyNotFound` for an unknown company and
/// `VatError::Source` if the ledger cannot be read.
pub async fn select_lines<L: LedgerSource>(
    source: &L,
    period: &PeriodKey,
    role: VatRole,
) -> Result<Vec<LedgerLine>, VatError> {
    ensure_company(source, period.company_id()).await?;
    fetch_lines(source, period, role).await
}

/// Selects the company profile and both ledgers for `period`.
///
/// # Errors
///
/// Same as [`select_lines`].
pub async fn select_period<L: LedgerSource>(
    source: &L,
    period: &PeriodKey,
) -> Result<PeriodSelection, VatError> {
    let company = ensure_company(source, period.company_id()).await?;
    let purchases = fetch_lines(source, period, VatRole::Purchase).await?;
    let sales = fetch_lines(source, period, VatRole::Sales).await?;

    Ok(PeriodSelection {
        company,
        purchases,
        sales,
    })
}

async fn ensure_company<L: LedgerSource>(
    source: &L,
    company_id: CompanyId,
) -> Result<CompanyProfile, VatError> {
    source
        .company(company_id)
        .await?
        .ok_or(VatError::CompanyNotFound(company_id))
}

async fn fetch_lines<L: LedgerSource>(
    source: &L,
    period: &PeriodKey,
    role: VatRole,
) -> Result<Vec<LedgerLine>, VatError> {
    let mut lines: Vec<LedgerLine> = source
        .lines(
            period.company_id(),
            period.first_day(),
            period.last_day(),
            role,
        )
        .await?
        .into_iter()
        .filter(|line| period.contains(line.vat_date) && line.operation.role() == role)
        .collect();

    lines.sort_by(document_order);
    Ok(lines)
}

/// Ledger order: document number ascending, then document date.
pub fn document_order(a: &LedgerLine, b: &LedgerLine) -> Ordering {
    compare_document_numbers(&a.document_number, &b.document_number)
        .then_with(|| a.document_date.cmp(&b.document_date))
}

/// Compares document numbers, treating all-digit numbers by value.
///
/// `"9"` sorts before `"10"`. Numbers with the same value but different
/// zero padding fall back to plain string order to stay total.
pub fn compare_document_numbers(a: &str, b: &str) -> Ordering {
    let numeric = |s: &str| !s.is_empty() && s.bytes().all(|c| c.is_ascii_digit());
    if numeric(a) && numeric(b) {
        let a_trimmed = a.trim_start_matches('0');
        let b_trimmed = b.trim_start_matches('0');
        a_trimmed
            .len()
            .cmp(&b_trimmed.len())
            .then_with(|| a_trimmed.cmp(b_trimmed))
            .then_with(|| a.cmp(b))
    } else {
        a.cmp(b)
    }
}
