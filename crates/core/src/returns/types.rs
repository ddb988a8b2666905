//! VAT return record and update input.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dds_shared::types::{CompanyId, VatReturnId};

use crate::lifecycle::{LifecycleAction, VatReturnStatus};
use crate::vat::{PeriodKey, Settlement, VatDeclaration, VatError};

/// One company's VAT return for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatReturn {
    /// Return ID.
    pub id: VatReturnId,
    /// Declaring company.
    pub company_id: CompanyId,
    /// Period year.
    pub period_year: i32,
    /// Period month, 1-12.
    pub period_month: u32,
    /// Lifecycle status.
    pub status: VatReturnStatus,
    /// Aggregated figures. `None` while the return is a draft.
    pub declaration: Option<VatDeclaration>,
    /// Filing and payment deadline.
    pub due_date: NaiveDate,
    /// When the return was created.
    pub created_at: DateTime<Utc>,
    /// Last change of any kind.
    pub updated_at: DateTime<Utc>,
    /// Last aggregation.
    pub calculated_at: Option<DateTime<Utc>>,
    /// When the return was filed.
    pub submitted_at: Option<DateTime<Utc>>,
    /// When acceptance was recorded.
    pub accepted_at: Option<DateTime<Utc>>,
    /// When payment was recorded.
    pub paid_at: Option<DateTime<Utc>>,
}

impl VatReturn {
    /// A new return for `period` in `status`, stamped now.
    #[must_use]
    pub fn new(period: &PeriodKey, status: VatReturnStatus, due_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: VatReturnId::new(),
            company_id: period.company_id(),
            period_year: period.year(),
            period_month: period.month(),
            status,
            declaration: None,
            due_date,
            created_at: now,
            updated_at: now,
            calculated_at: None,
            submitted_at: None,
            accepted_at: None,
            paid_at: None,
        }
    }

    /// The period this return declares.
    ///
    /// # Errors
    ///
    /// Returns `VatError::InvalidPeriod` if the stored year or month is
    /// corrupt.
    pub fn period(&self) -> Result<PeriodKey, VatError> {
        PeriodKey::new(self.company_id, self.period_year, self.period_month)
    }

    /// Applies a validated transition: new status plus its timestamp.
    pub fn apply(&mut self, action: LifecycleAction) {
        let at = action.occurred_at();
        match action {
            LifecycleAction::Calculate { .. } => self.calculated_at = Some(at),
            LifecycleAction::Submit { .. } => self.submitted_at = Some(at),
            LifecycleAction::Accept { .. } => self.accepted_at = Some(at),
            LifecycleAction::MarkPaid { .. } => self.paid_at = Some(at),
        }
        self.status = action.new_status();
        self.updated_at = at;
    }

    /// Sort key for listings, newest period first.
    #[must_use]
    pub fn period_order(&self) -> (i32, u32) {
        (self.period_year, self.period_month)
    }
}

/// Editable declaration fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationUpdate {
    /// New credit coefficient; the declaration is re-settled.
    pub credit_coefficient: Option<Decimal>,
    /// Split of the result over codes 70-82.
    pub settlement: Option<Settlement>,
}

impl DeclarationUpdate {
    /// Returns true if nothing would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credit_coefficient.is_none() && self.settlement.is_none()
    }
}
