//! VAT return repository for database operations.
//!
//! Implements the `VatReturnStore` port using SeaORM. The declaration is
//! stored as one JSONB document so a recalculation replaces every figure in
//! a single row write.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::entities::{sea_orm_active_enums::VatReturnStatus as DbVatReturnStatus, vat_returns};
use dds_core::lifecycle::VatReturnStatus;
use dds_core::returns::{StoreError, VatReturn, VatReturnStore};
use dds_core::vat::VatDeclaration;
use dds_shared::types::{CompanyId, VatReturnId};

/// VAT return repository implementation.
#[derive(Debug, Clone)]
pub struct VatReturnRepository {
    db: DatabaseConnection,
}

impl VatReturnRepository {
    /// Create a new VAT return repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl VatReturnStore for VatReturnRepository {
    async fn find(&self, id: VatReturnId) -> Result<Option<VatReturn>, StoreError> {
        let model = vat_returns::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        model.map(to_domain).transpose()
    }

    async fn find_by_period(
        &self,
        company_id: CompanyId,
        year: i32,
        month: u32,
    ) -> Result<Option<VatReturn>, StoreError> {
        let model = vat_returns::Entity::find()
            .filter(vat_returns::Column::CompanyId.eq(company_id.into_inner()))
            .filter(vat_returns::Column::PeriodYear.eq(year))
            .filter(vat_returns::Column::PeriodMonth.eq(db_month(month)?))
            .one(&self.db)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        model.map(to_domain).transpose()
    }

    async fn list_by_company(&self, company_id: CompanyId) -> Result<Vec<VatReturn>, StoreError> {
        let models = vat_returns::Entity::find()
            .filter(vat_returns::Column::CompanyId.eq(company_id.into_inner()))
            .order_by_desc(vat_returns::Column::PeriodYear)
            .order_by_desc(vat_returns::Column::PeriodMonth)
            .all(&self.db)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        models.into_iter().map(to_domain).collect()
    }

    async fn insert(&self, vat_return: &VatReturn) -> Result<(), StoreError> {
        let active_model = to_active_model(vat_return)?;

        vat_returns::Entity::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::Conflict(format!(
                    "{}-{:02}",
                    vat_return.period_year, vat_return.period_month
                )),
                _ => StoreError::backend(e.to_string()),
            })?;

        Ok(())
    }

    async fn update(&self, vat_return: &VatReturn) -> Result<(), StoreError> {
        let active_model = to_active_model(vat_return)?;

        match active_model.update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(StoreError::NotFound(vat_return.id)),
            Err(e) => Err(StoreError::backend(e.to_string())),
        }
    }

    async fn delete(&self, id: VatReturnId) -> Result<bool, StoreError> {
        let result = vat_returns::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

fn db_month(month: u32) -> Result<i32, StoreError> {
    i32::try_from(month).map_err(|_| StoreError::backend(format!("invalid month {month}")))
}

fn to_active_model(vat_return: &VatReturn) -> Result<vat_returns::ActiveModel, StoreError> {
    let declaration = vat_return
        .declaration
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| StoreError::backend(format!("declaration encoding: {e}")))?;

    Ok(vat_returns::ActiveModel {
        id: Set(vat_return.id.into_inner()),
        company_id: Set(vat_return.company_id.into_inner()),
        period_year: Set(vat_return.period_year),
        period_month: Set(db_month(vat_return.period_month)?),
        status: Set(core_status_to_db(vat_return.status)),
        declaration: Set(declaration),
        due_date: Set(vat_return.due_date),
        created_at: Set(vat_return.created_at.into()),
        updated_at: Set(vat_return.updated_at.into()),
        calculated_at: Set(vat_return.calculated_at.map(Into::into)),
        submitted_at: Set(vat_return.submitted_at.map(Into::into)),
        accepted_at: Set(vat_return.accepted_at.map(Into::into)),
        paid_at: Set(vat_return.paid_at.map(Into::into)),
    })
}

fn to_domain(model: vat_returns::Model) -> Result<VatReturn, StoreError> {
    let declaration = model
        .declaration
        .map(serde_json::from_value::<VatDeclaration>)
        .transpose()
        .map_err(|e| StoreError::backend(format!("declaration of {}: {e}", model.id)))?;
    let period_month = u32::try_from(model.period_month)
        .map_err(|_| StoreError::backend(format!("invalid month {}", model.period_month)))?;

    Ok(VatReturn {
        id: VatReturnId::from_uuid(model.id),
        company_id: CompanyId::from_uuid(model.company_id),
        period_year: model.period_year,
        period_month,
        status: db_status_to_core(model.status),
        declaration,
        due_date: model.due_date,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
        calculated_at: model.calculated_at.map(|t| t.with_timezone(&Utc)),
        submitted_at: model.submitted_at.map(|t| t.with_timezone(&Utc)),
        accepted_at: model.accepted_at.map(|t| t.with_timezone(&Utc)),
        paid_at: model.paid_at.map(|t| t.with_timezone(&Utc)),
    })
}

/// Convert database status to core status.
fn db_status_to_core(status: DbVatReturnStatus) -> VatReturnStatus {
    match status {
        DbVatReturnStatus::Draft => VatReturnStatus::Draft,
        DbVatReturnStatus::Calculated => VatReturnStatus::Calculated,
        DbVatReturnStatus::Submitted => VatReturnStatus::Submitted,
        DbVatReturnStatus::Accepted => VatReturnStatus::Accepted,
        DbVatReturnStatus::Paid => VatReturnStatus::Paid,
    }
}

/// Convert core status to database status.
fn core_status_to_db(status: VatReturnStatus) -> DbVatReturnStatus {
    match status {
        VatReturnStatus::Draft => DbVatReturnStatus::Draft,
        VatReturnStatus::Calculated => DbVatReturnStatus::Calculated,
        VatReturnStatus::Submitted => DbVatReturnStatus::Submitted,
        VatReturnStatus::Accepted => DbVatReturnStatus::Accepted,
        VatReturnStatus::Paid => DbVatReturnStatus::Paid,
    }
}
