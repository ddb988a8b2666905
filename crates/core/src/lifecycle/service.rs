//! Lifecycle service for VAT return state transitions.

use chrono::Utc;

use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::types::{LifecycleAction, VatReturnStatus};

/// Stateless guard over the VAT return state machine.
///
/// Every transition or mutation goes through these checks; the
/// repository never re-implements them.
pub struct LifecycleService;

impl LifecycleService {
    /// Store freshly aggregated figures.
    ///
    /// # Returns
    /// * `Ok(LifecycleAction::Calculate)` from Draft or Calculated
    /// * `Err(LifecycleError::Immutable)` once the return has been filed
    pub fn calculate(current: VatReturnStatus) -> Result<LifecycleAction, LifecycleError> {
        Self::ensure_editable(current)?;
        Ok(LifecycleAction::Calculate {
            new_status: VatReturnStatus::Calculated,
            calculated_at: Utc::now(),
        })
    }

    /// File a calculated return.
    ///
    /// # Returns
    /// * `Ok(LifecycleAction::Submit)` from Calculated
    /// * `Err(LifecycleError::InvalidTransition)` from any other status
    pub fn submit(current: VatReturnStatus) -> Result<LifecycleAction, LifecycleError> {
        match current {
            VatReturnStatus::Calculated => Ok(LifecycleAction::Submit {
                new_status: VatReturnStatus::Submitted,
                submitted_at: Utc::now(),
            }),
            _ => Err(LifecycleError::InvalidTransition {
                from: current,
                to: VatReturnStatus::Submitted,
            }),
        }
    }

    /// Record acceptance reported by the tax authority.
    pub fn accept(current: VatReturnStatus) -> Result<LifecycleAction, LifecycleError> {
        match current {
            VatReturnStatus::Submitted => Ok(LifecycleAction::Accept {
                new_status: VatReturnStatus::Accepted,
                accepted_at: Utc::now(),
            }),
            _ => Err(LifecycleError::InvalidTransition {
                from: current,
                to: VatReturnStatus::Accepted,
            }),
        }
    }

    /// Record settlement reported by reconciliation.
    pub fn mark_paid(current: VatReturnStatus) -> Result<LifecycleAction, LifecycleError> {
        match current {
            VatReturnStatus::Submitted | VatReturnStatus::Accepted => {
                Ok(LifecycleAction::MarkPaid {
                    new_status: VatReturnStatus::Paid,
                    paid_at: Utc::now(),
                })
            }
            _ => Err(LifecycleError::InvalidTransition {
                from: current,
                to: VatReturnStatus::Paid,
            }),
        }
    }

    /// Apply an externally reported status (Accepted or Paid).
    ///
    /// Any other target is rejected as an invalid transition.
    pub fn record_external(
        current: VatReturnStatus,
        target: VatReturnStatus,
    ) -> Result<LifecycleAction, LifecycleError> {
        match target {
            VatReturnStatus::Accepted => Self::accept(current),
            VatReturnStatus::Paid => Self::mark_paid(current),
            _ => Err(LifecycleError::InvalidTransition {
                from: current,
                to: target,
            }),
        }
    }

    /// Fails with `Immutable` unless declaration fields may be edited.
    pub fn ensure_editable(current: VatReturnStatus) -> Result<(), LifecycleError> {
        if current.is_editable() {
            Ok(())
        } else {
            Err(LifecycleError::Immutable { status: current })
        }
    }

    /// Fails with `Immutable` unless the return may be deleted.
    pub fn ensure_deletable(current: VatReturnStatus) -> Result<(), LifecycleError> {
        Self::ensure_editable(current)
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Draft → Calculated, Calculated → Calculated (aggregate)
    /// - Calculated → Submitted (submit)
    /// - Submitted → Accepted (accept)
    /// - Submitted → Paid, Accepted → Paid (mark paid)
    #[must_use]
    pub fn is_valid_transition(from: VatReturnStatus, to: VatReturnStatus) -> bool {
        matches!(
            (from, to),
            (
                VatReturnStatus::Draft | VatReturnStatus::Calculated,
                VatReturnStatus::Calculated
            ) | (VatReturnStatus::Calculated, VatReturnStatus::Submitted)
                | (VatReturnStatus::Submitted, VatReturnStatus::Accepted)
                | (
                    VatReturnStatus::Submitted | VatReturnStatus::Accepted,
                    VatReturnStatus::Paid
                )
        )
    }
}
