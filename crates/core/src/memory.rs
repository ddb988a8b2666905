//! In-memory adapters for the store and ledger ports.
//!
//! Used by tests and by the API tests. Both are cheap to share behind an
//! `Arc` and safe to use from concurrent tasks.

use std::collections::HashMap;

use chrono::NaiveDate;
use tokio::sync::RwLock;

use dds_shared::types::{CompanyId, VatReturnId};

use crate::returns::{StoreError, VatReturn, VatReturnStore};
use crate::vat::{CompanyProfile, LedgerLine, LedgerSource, VatError, VatRole};

/// Returns kept in a map, with the period uniqueness rule of the database.
#[derive(Debug, Default)]
pub struct InMemoryVatReturnStore {
    returns: RwLock<HashMap<VatReturnId, VatReturn>>,
}

impl InMemoryVatReturnStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored returns.
    pub async fn count(&self) -> usize {
        self.returns.read().await.len()
    }
}

impl VatReturnStore for InMemoryVatReturnStore {
    async fn find(&self, id: VatReturnId) -> Result<Option<VatReturn>, StoreError> {
        Ok(self.returns.read().await.get(&id).cloned())
    }

    async fn find_by_period(
        &self,
        company_id: CompanyId,
        year: i32,
        month: u32,
    ) -> Result<Option<VatReturn>, StoreError> {
        Ok(self
            .returns
            .read()
            .await
            .values()
            .find(|r| r.company_id == company_id && r.period_year == year && r.period_month == month)
            .cloned())
    }

    async fn list_by_company(&self, company_id: CompanyId) -> Result<Vec<VatReturn>, StoreError> {
        let mut returns: Vec<VatReturn> = self
            .returns
            .read()
            .await
            .values()
            .filter(|r| r.company_id == company_id)
            .cloned()
            .collect();
        returns.sort_by_key(|r| std::cmp::Reverse(r.period_order()));
        Ok(returns)
    }

    async fn insert(&self, vat_return: &VatReturn) -> Result<(), StoreError> {
        let mut returns = self.returns.write().await;
        let duplicate = returns.values().any(|r| {
            r.company_id == vat_return.company_id
                && r.period_year == vat_return.period_year
                && r.period_month == vat_return.period_month
        });
        if duplicate || returns.contains_key(&vat_return.id) {
            return Err(StoreError::Conflict(format!(
                "{}-{:02}",
                vat_return.period_year, vat_return.period_month
            )));
        }
        returns.insert(vat_return.id, vat_return.clone());
        Ok(())
    }

    async fn update(&self, vat_return: &VatReturn) -> Result<(), StoreError> {
        let mut returns = self.returns.write().await;
        let stored = returns
            .get_mut(&vat_return.id)
            .ok_or(StoreError::NotFound(vat_return.id))?;
        *stored = vat_return.clone();
        Ok(())
    }

    async fn delete(&self, id: VatReturnId) -> Result<bool, StoreError> {
        Ok(self.returns.write().await.remove(&id).is_some())
    }
}

/// A ledger held in memory.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    companies: RwLock<HashMap<CompanyId, CompanyProfile>>,
    lines: RwLock<HashMap<CompanyId, Vec<LedgerLine>>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a company profile.
    pub async fn add_company(&self, company: CompanyProfile) {
        self.companies.write().await.insert(company.id, company);
    }

    /// Appends lines to a company's ledger.
    pub async fn add_lines(&self, company_id: CompanyId, lines: Vec<LedgerLine>) {
        self.lines
            .write()
            .await
            .entry(company_id)
            .or_default()
            .extend(lines);
    }
}

impl LedgerSource for InMemoryLedger {
    async fn company(&self, company_id: CompanyId) -> Result<Option<CompanyProfile>, VatError> {
        Ok(self.companies.read().await.get(&company_id).cloned())
    }

    async fn lines(
        &self,
        company_id: CompanyId,
        from: NaiveDate,
        to: NaiveDate,
        role: VatRole,
    ) -> Result<Vec<LedgerLine>, VatError> {
        Ok(self
            .lines
            .read()
            .await
            .get(&company_id)
            .map(|lines| {
                lines
                    .iter()
                    .filter(|l| l.vat_date >= from && l.vat_date <= to)
                    .filter(|l| l.operation.role() == role)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::VatReturnStatus;
    use crate::vat::PeriodKey;

    fn draft(company_id: CompanyId, month: u32) -> VatReturn {
        let period = PeriodKey::new(company_id, 2025, month).unwrap();
        VatReturn::new(
            &period,
            VatReturnStatus::Draft,
            NaiveDate::from_ymd_opt(2025, month + 1, 14).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_period() {
        let store = InMemoryVatReturnStore::new();
        let company_id = CompanyId::new();
        store.insert(&draft(company_id, 3)).await.unwrap();
        let err = store.insert(&draft(company_id, 3)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        store.insert(&draft(CompanyId::new(), 3)).await.unwrap();
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryVatReturnStore::new();
        let err = store.update(&draft(CompanyId::new(), 3)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = InMemoryVatReturnStore::new();
        let company_id = CompanyId::new();
        for month in [2, 5, 3] {
            store.insert(&draft(company_id, month)).await.unwrap();
        }
        let months: Vec<u32> = store
            .list_by_company(company_id)
            .await
            .unwrap()
            .iter()
            .map(|r| r.period_month)
            .collect();
        assert_eq!(months, [5, 3, 2]);
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let store = InMemoryVatReturnStore::new();
        let r = draft(CompanyId::new(), 3);
        store.insert(&r).await.unwrap();
        assert!(store.delete(r.id).await.unwrap());
        assert!(!store.delete(r.id).await.unwrap());
    }
}
