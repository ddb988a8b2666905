//! Persistence port for VAT returns.

use dds_shared::types::{CompanyId, VatReturnId};

use crate::returns::error::StoreError;
use crate::returns::types::VatReturn;

/// Repository trait for VAT return persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
/// Permission checks live in the lifecycle service, not here.
pub trait VatReturnStore: Send + Sync {
    /// Find a return by ID.
    fn find(
        &self,
        id: VatReturnId,
    ) -> impl std::future::Future<Output = Result<Option<VatReturn>, StoreError>> + Send;

    /// Find the return of one company and month.
    fn find_by_period(
        &self,
        company_id: CompanyId,
        year: i32,
        month: u32,
    ) -> impl std::future::Future<Output = Result<Option<VatReturn>, StoreError>> + Send;

    /// List a company's returns, newest period first.
    fn list_by_company(
        &self,
        company_id: CompanyId,
    ) -> impl std::future::Future<Output = Result<Vec<VatReturn>, StoreError>> + Send;

    /// Insert a new return.
    ///
    /// Fails with `StoreError::Conflict` if the company already has a
    /// return for that month.
    fn insert(
        &self,
        vat_return: &VatReturn,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Replace a stored return, declaration included, in one write.
    ///
    /// Fails with `StoreError::NotFound` if the return does not exist.
    fn update(
        &self,
        vat_return: &VatReturn,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Delete a return. Returns false if it did not exist.
    fn delete(
        &self,
        id: VatReturnId,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;
}
