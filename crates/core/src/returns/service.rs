//! VAT return service: the control operations over a store and a ledger.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use dds_shared::types::{CompanyId, VatReturnId};

use crate::export::{ExportArtifact, ExportBundle, ExportInput, ExportKind, VatExporter, bundle};
use crate::lifecycle::{LifecycleService, VatReturnStatus};
use crate::returns::error::VatReturnError;
use crate::returns::locks::PeriodLocks;
use crate::returns::store::VatReturnStore;
use crate::returns::types::{DeclarationUpdate, VatReturn};
use crate::vat::{
    CompanyProfile, CreditCoefficient, DueDatePolicy, LedgerSource, PeriodKey, StatutoryDueDate,
    VatAggregator, select_lines, select_period,
};

/// Orchestrates selection, aggregation, lifecycle, and export.
///
/// Every mutating operation holds the period's write lock for its whole
/// read-modify-write; reads and exports hold the read lock.
pub struct VatReturnService<S: VatReturnStore, L: LedgerSource> {
    store: Arc<S>,
    ledger: Arc<L>,
    locks: Arc<PeriodLocks>,
    due_dates: Arc<dyn DueDatePolicy>,
    exporter: VatExporter,
}

impl<S: VatReturnStore, L: LedgerSource> Clone for VatReturnService<S, L> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ledger: Arc::clone(&self.ledger),
            locks: Arc::clone(&self.locks),
            due_dates: Arc::clone(&self.due_dates),
            exporter: self.exporter,
        }
    }
}

impl<S: VatReturnStore, L: LedgerSource> VatReturnService<S, L> {
    /// Create a service with the statutory due-date rule.
    #[must_use]
    pub fn new(store: Arc<S>, ledger: Arc<L>) -> Self {
        Self {
            store,
            ledger,
            locks: Arc::new(PeriodLocks::new()),
            due_dates: Arc::new(StatutoryDueDate::default()),
            exporter: VatExporter::default(),
        }
    }

    /// Replace the due-date policy.
    #[must_use]
    pub fn with_due_date_policy(mut self, policy: Arc<dyn DueDatePolicy>) -> Self {
        self.due_dates = policy;
        self
    }

    /// Replace the exporter, e.g. for another layout version.
    #[must_use]
    pub fn with_exporter(mut self, exporter: VatExporter) -> Self {
        self.exporter = exporter;
        self
    }

    /// Create an empty draft for a period.
    ///
    /// # Errors
    ///
    /// * `InvalidPeriod` for a malformed year or month
    /// * `NotFound` if the company is unknown to the ledger
    /// * `Conflict` if the period already has a return
    pub async fn open_draft(
        &self,
        company_id: CompanyId,
        year: i32,
        month: u32,
    ) -> Result<VatReturn, VatReturnError> {
        let period = PeriodKey::new(company_id, year, month)?;
        let _guard = self.locks.write(&period).await;

        if self.ledger.company(company_id).await?.is_none() {
            return Err(VatReturnError::NotFound(format!(
                "Company {company_id} not found"
            )));
        }
        if self.store.find_by_period(company_id, year, month).await?.is_some() {
            return Err(duplicate(&period));
        }

        let draft = VatReturn::new(
            &period,
            VatReturnStatus::Draft,
            self.due_dates.due_date(&period),
        );
        self.store.insert(&draft).await?;

        info!(
            vat_return_id = %draft.id,
            company_id = %company_id,
            period = %period.label(),
            "VAT return opened"
        );
        Ok(draft)
    }

    /// Aggregate the period's ledgers and store the result as CALCULATED.
    ///
    /// Creates the return if the period has none. The coefficient comes from
    /// the company profile; a coefficient set through [`Self::update`] lasts
    /// until the next run. The stored return is only written after
    /// aggregation succeeded, so a failure leaves the previous declaration
    /// untouched.
    ///
    /// # Errors
    ///
    /// * `InvalidPeriod` for a malformed year or month
    /// * `NotFound` if the company is unknown to the ledger
    /// * `Conflict` if the return has been filed
    /// * `MissingCreditCoefficient` if partial-credit purchases exist but no
    ///   coefficient is known
    pub async fn generate(
        &self,
        company_id: CompanyId,
        year: i32,
        month: u32,
    ) -> Result<VatReturn, VatReturnError> {
        let period = PeriodKey::new(company_id, year, month)?;
        let _guard = self.locks.write(&period).await;

        let existing = self.store.find_by_period(company_id, year, month).await?;
        let current = existing
            .as_ref()
            .map_or(VatReturnStatus::Draft, |r| r.status);
        let action = LifecycleService::calculate(current)?;

        let selection = select_period(self.ledger.as_ref(), &period).await?;
        let declaration = VatAggregator::aggregate(
            &selection.purchases,
            &selection.sales,
            selection.company.credit_coefficient,
        )?;

        let vat_return = match existing {
            Some(mut vat_return) => {
                vat_return.declaration = Some(declaration);
                vat_return.apply(action);
                self.store.update(&vat_return).await?;
                vat_return
            }
            None => {
                let mut vat_return = VatReturn::new(
                    &period,
                    VatReturnStatus::Draft,
                    self.due_dates.due_date(&period),
                );
                vat_return.declaration = Some(declaration);
                vat_return.apply(action);
                self.store.insert(&vat_return).await?;
                vat_return
            }
        };

        info!(
            vat_return_id = %vat_return.id,
            company_id = %company_id,
            period = %period.label(),
            purchases = selection.purchases.len(),
            sales = selection.sales.len(),
            "VAT return calculated"
        );
        Ok(vat_return)
    }

    /// Fetch a return.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown ID.
    pub async fn get(&self, id: VatReturnId) -> Result<VatReturn, VatReturnError> {
        let period = self.load(id).await?.period()?;
        let _guard = self.locks.read(&period).await;
        self.load(id).await
    }

    /// A company's returns, newest period first.
    ///
    /// # Errors
    ///
    /// Returns `Repository` if the store fails.
    pub async fn list_by_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<VatReturn>, VatReturnError> {
        let mut returns = self.store.list_by_company(company_id).await?;
        returns.sort_by_key(|r| std::cmp::Reverse(r.period_order()));
        Ok(returns)
    }

    /// Change the editable declaration fields.
    ///
    /// A new coefficient re-settles the declaration before the settlement
    /// split is applied.
    ///
    /// # Errors
    ///
    /// * `NotFound` for an unknown ID
    /// * `Conflict` once the return has been filed
    /// * `IncompleteDeclaration` for a draft
    /// * `Validation` for an out-of-range coefficient or a split that does
    ///   not add up
    pub async fn update(
        &self,
        id: VatReturnId,
        update: DeclarationUpdate,
    ) -> Result<VatReturn, VatReturnError> {
        let period = self.load(id).await?.period()?;
        let _guard = self.locks.write(&period).await;
        let mut vat_return = self.load(id).await?;

        let status = vat_return.status;
        LifecycleService::ensure_editable(status)?;
        let Some(declaration) = vat_return.declaration.as_mut() else {
            return Err(VatReturnError::IncompleteDeclaration { status });
        };

        let mut edited = declaration.clone();
        if let Some(value) = update.credit_coefficient {
            edited.credit_coefficient = CreditCoefficient::new(value)?;
            edited.settle();
        }
        if let Some(settlement) = update.settlement {
            edited.apply_settlement(settlement)?;
        }
        *declaration = edited;
        vat_return.updated_at = Utc::now();

        self.store.update(&vat_return).await?;
        info!(vat_return_id = %id, period = %period.label(), "VAT return updated");
        Ok(vat_return)
    }

    /// File a calculated return.
    ///
    /// # Errors
    ///
    /// * `NotFound` for an unknown ID
    /// * `InvalidTransition` unless the return is CALCULATED
    pub async fn submit(&self, id: VatReturnId) -> Result<VatReturn, VatReturnError> {
        let period = self.load(id).await?.period()?;
        let _guard = self.locks.write(&period).await;
        let mut vat_return = self.load(id).await?;

        let action = LifecycleService::submit(vat_return.status)?;
        vat_return.apply(action);
        self.store.update(&vat_return).await?;

        info!(
            vat_return_id = %id,
            period = %period.label(),
            status = %vat_return.status,
            "VAT return submitted"
        );
        Ok(vat_return)
    }

    /// Record ACCEPTED or PAID reported by reconciliation.
    ///
    /// # Errors
    ///
    /// * `NotFound` for an unknown ID
    /// * `InvalidTransition` for any other target or an illegal move
    pub async fn record_status(
        &self,
        id: VatReturnId,
        target: VatReturnStatus,
    ) -> Result<VatReturn, VatReturnError> {
        let period = self.load(id).await?.period()?;
        let _guard = self.locks.write(&period).await;
        let mut vat_return = self.load(id).await?;

        let action = LifecycleService::record_external(vat_return.status, target)?;
        vat_return.apply(action);
        self.store.update(&vat_return).await?;

        info!(
            vat_return_id = %id,
            period = %period.label(),
            status = %vat_return.status,
            "VAT return status recorded"
        );
        Ok(vat_return)
    }

    /// Delete a return that has not been filed.
    ///
    /// # Errors
    ///
    /// * `NotFound` for an unknown ID
    /// * `Conflict` once the return has been filed
    pub async fn delete(&self, id: VatReturnId) -> Result<(), VatReturnError> {
        let period = self.load(id).await?.period()?;
        {
            let _guard = self.locks.write(&period).await;
            let vat_return = self.load(id).await?;
            LifecycleService::ensure_deletable(vat_return.status)?;
            if !self.store.delete(id).await? {
                return Err(VatReturnError::not_found(id));
            }
        }
        self.locks.prune(&period);

        info!(vat_return_id = %id, period = %period.label(), "VAT return deleted");
        Ok(())
    }

    /// Render one of the three files. Nothing is written back.
    ///
    /// # Errors
    ///
    /// * `NotFound` for an unknown ID or company
    /// * `IncompleteDeclaration` while the return is a draft
    /// * `StaleDeclaration` if the ledger changed after the last calculation
    /// * `EncodingFailure` if an amount overflows its field
    pub async fn export(
        &self,
        id: VatReturnId,
        kind: ExportKind,
    ) -> Result<ExportArtifact, VatReturnError> {
        let period = self.load(id).await?.period()?;
        let _guard = self.locks.read(&period).await;
        let vat_return = self.load(id).await?;
        let company = self.company(&period).await?;

        self.render(&vat_return, &period, &company, kind).await
    }

    /// Render all three files into `VAT_YYYY_MM.zip`.
    ///
    /// The files are rendered under one read lock, so they always describe
    /// the same declaration.
    ///
    /// # Errors
    ///
    /// Same as [`export`](Self::export), plus `Archive` if the zip writer
    /// fails.
    pub async fn export_bundle(&self, id: VatReturnId) -> Result<ExportBundle, VatReturnError> {
        let period = self.load(id).await?.period()?;
        let _guard = self.locks.read(&period).await;
        let vat_return = self.load(id).await?;
        let company = self.company(&period).await?;

        let mut artifacts = Vec::with_capacity(ExportKind::ALL.len());
        for kind in ExportKind::ALL {
            artifacts.push(self.render(&vat_return, &period, &company, kind).await?);
        }
        Ok(bundle::bundle(&period, artifacts)?)
    }

    async fn render(
        &self,
        vat_return: &VatReturn,
        period: &PeriodKey,
        company: &CompanyProfile,
        kind: ExportKind,
    ) -> Result<ExportArtifact, VatReturnError> {
        let Some(declaration) = vat_return.declaration.as_ref() else {
            return Err(VatReturnError::IncompleteDeclaration {
                status: vat_return.status,
            });
        };
        let lines = match kind.ledger_role() {
            Some(role) => select_lines(self.ledger.as_ref(), period, role).await?,
            None => Vec::new(),
        };

        let artifact = self.exporter.export(
            kind,
            ExportInput {
                status: vat_return.status,
                period,
                company,
                declaration,
                lines: &lines,
            },
        )?;

        if !artifact.warnings.is_empty() {
            warn!(
                vat_return_id = %vat_return.id,
                file = artifact.file_name,
                warnings = artifact.warnings.len(),
                "Export altered fields to fit the layout"
            );
        }
        Ok(artifact)
    }

    async fn company(&self, period: &PeriodKey) -> Result<CompanyProfile, VatReturnError> {
        self.ledger
            .company(period.company_id())
            .await?
            .ok_or_else(|| {
                VatReturnError::NotFound(format!("Company {} not found", period.company_id()))
            })
    }

    async fn load(&self, id: VatReturnId) -> Result<VatReturn, VatReturnError> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| VatReturnError::not_found(id))
    }
}

fn duplicate(period: &PeriodKey) -> VatReturnError {
    VatReturnError::Conflict(format!(
        "VAT return for company {} period {} already exists",
        period.company_id(),
        period.label()
    ))
}
