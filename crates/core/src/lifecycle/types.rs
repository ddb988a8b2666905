//! Lifecycle types for VAT returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a VAT return.
///
/// The valid transitions are:
/// - Draft → Calculated (aggregation)
/// - Calculated → Calculated (re-aggregation)
/// - Calculated → Submitted (submit)
/// - Submitted → Accepted (reconciliation)
/// - Submitted → Paid, Accepted → Paid (reconciliation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VatReturnStatus {
    /// Opened, not aggregated yet.
    Draft,
    /// Aggregated; may be recalculated or edited.
    Calculated,
    /// Filed with the tax authority (immutable).
    Submitted,
    /// Accepted by the tax authority (immutable).
    Accepted,
    /// Settled (immutable).
    Paid,
}

impl VatReturnStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Calculated => "CALCULATED",
            Self::Submitted => "SUBMITTED",
            Self::Accepted => "ACCEPTED",
            Self::Paid => "PAID",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Some(Self::Draft),
            "CALCULATED" => Some(Self::Calculated),
            "SUBMITTED" => Some(Self::Submitted),
            "ACCEPTED" => Some(Self::Accepted),
            "PAID" => Some(Self::Paid),
            _ => None,
        }
    }

    /// Returns true if the declaration may be edited, recalculated, or deleted.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Calculated)
    }

    /// Returns true once the return has been filed.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        !self.is_editable()
    }

    /// Returns true if an aggregation has produced figures.
    #[must_use]
    pub fn has_figures(&self) -> bool {
        !matches!(self, Self::Draft)
    }

    /// Display label used by the Bulgarian UI.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Чернова",
            Self::Calculated => "Изчислена",
            Self::Submitted => "Подадена",
            Self::Accepted => "Приета",
            Self::Paid => "Платена",
        }
    }

    /// Badge colour used by the UI.
    #[must_use]
    pub fn badge_color(&self) -> &'static str {
        match self {
            Self::Draft => "gray",
            Self::Calculated => "blue",
            Self::Submitted => "green",
            Self::Accepted => "teal",
            Self::Paid => "purple",
        }
    }
}

impl fmt::Display for VatReturnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated lifecycle transition with its timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Aggregation stored new figures.
    Calculate {
        /// Status after the transition.
        new_status: VatReturnStatus,
        /// When the figures were computed.
        calculated_at: DateTime<Utc>,
    },
    /// The return was filed.
    Submit {
        /// Status after the transition.
        new_status: VatReturnStatus,
        /// When the return was filed.
        submitted_at: DateTime<Utc>,
    },
    /// The authority accepted the return.
    Accept {
        /// Status after the transition.
        new_status: VatReturnStatus,
        /// When acceptance was recorded.
        accepted_at: DateTime<Utc>,
    },
    /// The return was settled.
    MarkPaid {
        /// Status after the transition.
        new_status: VatReturnStatus,
        /// When payment was recorded.
        paid_at: DateTime<Utc>,
    },
}

impl LifecycleAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> VatReturnStatus {
        match self {
            Self::Calculate { new_status, .. }
            | Self::Submit { new_status, .. }
            | Self::Accept { new_status, .. }
            | Self::MarkPaid { new_status, .. } => *new_status,
        }
    }

    /// Returns when the action happened.
    #[must_use]
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::Calculate { calculated_at: at, .. }
            | Self::Submit { submitted_at: at, .. }
            | Self::Accept { accepted_at: at, .. }
            | Self::MarkPaid { paid_at: at, .. } => *at,
        }
    }
}
