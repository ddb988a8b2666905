//! Property-based tests for LifecycleService.

use proptest::prelude::*;

use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::service::LifecycleService;
use crate::lifecycle::types::VatReturnStatus;

/// Strategy for generating random VatReturnStatus values.
fn arb_status() -> impl Strategy<Value = VatReturnStatus> {
    prop_oneof![
        Just(VatReturnStatus::Draft),
        Just(VatReturnStatus::Calculated),
        Just(VatReturnStatus::Submitted),
        Just(VatReturnStatus::Accepted),
        Just(VatReturnStatus::Paid),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every action the service produces is a valid transition.
    #[test]
    fn prop_actions_are_valid_transitions(status in arb_status()) {
        let attempts = [
            LifecycleService::calculate(status),
            LifecycleService::submit(status),
            LifecycleService::accept(status),
            LifecycleService::mark_paid(status),
        ];
        for action in attempts.into_iter().flatten() {
            prop_assert!(LifecycleService::is_valid_transition(status, action.new_status()));
        }
    }

    /// Submit succeeds exactly from Calculated.
    #[test]
    fn prop_submit_only_from_calculated(status in arb_status()) {
        let result = LifecycleService::submit(status);
        if status == VatReturnStatus::Calculated {
            prop_assert!(result.is_ok());
        } else {
            let is_invalid_transition =
                matches!(result, Err(LifecycleError::InvalidTransition { .. }));
            prop_assert!(is_invalid_transition);
        }
    }

    /// Edits and deletion are allowed exactly in the editable statuses.
    #[test]
    fn prop_mutation_guard(status in arb_status()) {
        let editable = matches!(status, VatReturnStatus::Draft | VatReturnStatus::Calculated);
        prop_assert_eq!(LifecycleService::ensure_editable(status).is_ok(), editable);
        prop_assert_eq!(LifecycleService::ensure_deletable(status).is_ok(), editable);
        if !editable {
            prop_assert_eq!(
                LifecycleService::ensure_editable(status),
                Err(LifecycleError::Immutable { status })
            );
        }
    }

    /// No sequence of actions leads from a filed return back to an editable one.
    #[test]
    fn prop_filed_returns_never_become_editable(
        steps in prop::collection::vec(0u8..4, 1..12)
    ) {
        let mut status = VatReturnStatus::Draft;
        let mut filed = false;
        for step in steps {
            let result = match step {
                0 => LifecycleService::calculate(status),
                1 => LifecycleService::submit(status),
                2 => LifecycleService::accept(status),
                _ => LifecycleService::mark_paid(status),
            };
            if let Ok(action) = result {
                status = action.new_status();
            }
            filed |= status.is_immutable();
            if filed {
                prop_assert!(status.is_immutable());
            }
        }
    }
}
