//! Ledger repository: read-only access to companies and VAT ledger lines.
//!
//! Implements the `LedgerSource` port. Rows that cannot be mapped to a
//! domain line (unknown operation or document type code) fail the whole
//! read rather than being skipped, so a declaration is never built from a
//! partial ledger.

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::debug;

use crate::entities::{companies, vat_ledger_lines};
use dds_core::vat::{
    CompanyProfile, CreditCoefficient, DocumentType, LedgerLine, LedgerSource, VatError,
    VatOperation, VatRole,
};
use dds_shared::types::CompanyId;

/// Ledger repository implementation.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Create a new ledger repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl LedgerSource for LedgerRepository {
    async fn company(&self, company_id: CompanyId) -> Result<Option<CompanyProfile>, VatError> {
        let model = companies::Entity::find_by_id(company_id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| VatError::source(e.to_string()))?;

        model.map(company_to_domain).transpose()
    }

    async fn lines(
        &self,
        company_id: CompanyId,
        from: NaiveDate,
        to: NaiveDate,
        role: VatRole,
    ) -> Result<Vec<LedgerLine>, VatError> {
        let models = vat_ledger_lines::Entity::find()
            .filter(vat_ledger_lines::Column::CompanyId.eq(company_id.into_inner()))
            .filter(vat_ledger_lines::Column::VatDate.between(from, to))
            .filter(vat_ledger_lines::Column::Operation.is_in(operation_codes(role)))
            .order_by_asc(vat_ledger_lines::Column::DocumentNumber)
            .order_by_asc(vat_ledger_lines::Column::DocumentDate)
            .all(&self.db)
            .await
            .map_err(|e| VatError::source(e.to_string()))?;

        debug!(
            company_id = %company_id,
            role = role.as_str(),
            %from,
            %to,
            rows = models.len(),
            "Ledger lines read"
        );
        models.into_iter().map(line_to_domain).collect()
    }
}

/// Storage codes of every operation belonging to `role`.
fn operation_codes(role: VatRole) -> Vec<&'static str> {
    VatOperation::ALL
        .iter()
        .filter(|op| op.role() == role)
        .map(VatOperation::as_str)
        .collect()
}

fn company_to_domain(model: companies::Model) -> Result<CompanyProfile, VatError> {
    let credit_coefficient = model
        .credit_coefficient
        .map(CreditCoefficient::new)
        .transpose()
        .map_err(|e| VatError::source(format!("company {}: {e}", model.id)))?;

    Ok(CompanyProfile {
        id: CompanyId::from_uuid(model.id),
        name: model.name,
        vat_number: model.vat_number,
        submitter_name: model.submitter_name,
        credit_coefficient,
    })
}

fn line_to_domain(model: vat_ledger_lines::Model) -> Result<LedgerLine, VatError> {
    let operation = VatOperation::parse(&model.operation).ok_or_else(|| {
        VatError::source(format!(
            "ledger line {}: unknown operation '{}'",
            model.id, model.operation
        ))
    })?;
    let document_type = DocumentType::from_code(&model.document_type).ok_or_else(|| {
        VatError::source(format!(
            "ledger line {}: unknown document type '{}'",
            model.id, model.document_type
        ))
    })?;

    Ok(LedgerLine {
        document_number: model.document_number,
        document_type,
        document_date: model.document_date,
        vat_date: model.vat_date,
        counterparty_vat_number: model.counterparty_vat_number.filter(|v| !v.trim().is_empty()),
        counterparty_name: model.counterparty_name,
        description: model.description,
        tax_base: model.tax_base,
        vat_amount: model.vat_amount,
        operation,
    })
}
