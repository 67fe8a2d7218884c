//! Coordinator reducer for the ticket purchase flow.
//!
//! Every path through the flow runs through `reduce`: counter taps, the
//! auto-repeat tick chain, inventory and wallet refreshes, the single purchase
//! call, and notification dismissal. The reducer mutates state and returns
//! effect descriptions; the store runtime executes them and feeds resulting
//! actions back in.

use crate::actions::TicketFlowAction;
use crate::availability::{refresh_identity_effect, refresh_inventory_effect};
use crate::environment::TicketFlowEnvironment;
use crate::notification::{MSG_TRANSACTION_FAILED, NotificationRequest};
use crate::purchase::{attempt_from_state, purchase_effect};
use crate::selection::REPEAT_PERIOD;
use crate::types::{InventorySnapshot, PurchaseOutcome, TicketFlowState};
use std::marker::PhantomData;
use ticketflow_core::effect::Effect;
use ticketflow_core::reducer::Reducer;
use ticketflow_core::{SmallVec, smallvec};

/// The flow coordinator reducer
///
/// Stateless; all flow state lives in [`TicketFlowState`].
pub struct TicketFlowReducer<E> {
    _environment: PhantomData<E>,
}

impl<E> TicketFlowReducer<E> {
    /// Create a new reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _environment: PhantomData,
        }
    }
}

impl<E> Default for TicketFlowReducer<E> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impl: the reducer is stateless, so Clone must not require E: Clone.
impl<E> Clone for TicketFlowReducer<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E> Reducer for TicketFlowReducer<E>
where
    E: TicketFlowEnvironment,
{
    type State = TicketFlowState;
    type Action = TicketFlowAction;
    type Environment = E;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut TicketFlowState,
        action: TicketFlowAction,
        env: &E,
    ) -> SmallVec<[Effect<TicketFlowAction>; 4]> {
        match action {
            TicketFlowAction::Increment => {
                state.selection.increment();
                tracing::debug!(count = state.selection.count, "Selection incremented");
                smallvec![Effect::None]
            },

            TicketFlowAction::Decrement => {
                state.selection.decrement();
                tracing::debug!(count = state.selection.count, "Selection decremented");
                smallvec![Effect::None]
            },

            TicketFlowAction::ResetSelection => {
                state.selection.reset();
                smallvec![Effect::None]
            },

            TicketFlowAction::BeginAutoRepeat(direction) => {
                // Idempotent: an already-running chain in this direction is
                // left alone, so a repeated press event never doubles the rate.
                if state.selection.begin_repeat(direction) {
                    let epoch = state.selection.repeat.epoch;
                    tracing::debug!(?direction, epoch, "Auto-repeat armed");
                    smallvec![Effect::delay(
                        REPEAT_PERIOD,
                        TicketFlowAction::AutoRepeatTick { direction, epoch },
                    )]
                } else {
                    smallvec![Effect::None]
                }
            },

            TicketFlowAction::EndAutoRepeat(direction) => {
                // The epoch bump (when anything was active) kills the sleeping
                // tick; no handle to cancel, nothing to leak.
                state.selection.end_repeat(direction);
                smallvec![Effect::None]
            },

            TicketFlowAction::AutoRepeatTick { direction, epoch } => {
                if state.selection.tick_is_live(direction, epoch) {
                    state.selection.step(direction);
                    smallvec![Effect::delay(
                        REPEAT_PERIOD,
                        TicketFlowAction::AutoRepeatTick { direction, epoch },
                    )]
                } else {
                    // Armed under a previous generation; arrives, does nothing.
                    tracing::debug!(?direction, epoch, "Stale auto-repeat tick discarded");
                    smallvec![Effect::None]
                }
            },

            TicketFlowAction::RefreshInventory(performance_id) => {
                if state.availability.inventory_is_stale(performance_id) {
                    state.availability.claim_inventory_key(performance_id);
                    tracing::info!(%performance_id, "Refreshing inventory");
                    smallvec![refresh_inventory_effect(env.box_office(), performance_id)]
                } else {
                    tracing::debug!(%performance_id, "Inventory already cached, skipping fetch");
                    smallvec![Effect::None]
                }
            },

            TicketFlowAction::InventoryLoaded {
                performance_id,
                sold_seats,
            } => {
                if state.availability.inventory_key != Some(performance_id) {
                    return smallvec![Effect::None];
                }
                let snapshot = InventorySnapshot::new(state.config.total_seats, sold_seats);
                state.availability.apply_inventory(snapshot);
                state.selection.set_bound(snapshot.remaining());
                tracing::info!(
                    %performance_id,
                    sold_seats = snapshot.sold_seats,
                    remaining = snapshot.remaining(),
                    "Inventory loaded"
                );
                smallvec![Effect::None]
            },

            TicketFlowAction::InventoryUnavailable { performance_id } => {
                if state.availability.inventory_key != Some(performance_id) {
                    return smallvec![Effect::None];
                }
                state.availability.inventory_unavailable();
                state.selection.fail_closed();
                tracing::warn!(%performance_id, "Inventory unavailable, selection bound closed");
                smallvec![Effect::None]
            },

            TicketFlowAction::RefreshIdentity(user_key) => {
                if state.availability.identity_is_stale(&user_key) {
                    state.availability.claim_identity_key(user_key.clone());
                    tracing::info!(%user_key, "Refreshing wallet balance");
                    smallvec![refresh_identity_effect(env.box_office(), user_key)]
                } else {
                    tracing::debug!(%user_key, "Wallet already cached, skipping fetch");
                    smallvec![Effect::None]
                }
            },

            TicketFlowAction::IdentityLoaded {
                user_key,
                point_balance,
            } => {
                if state.availability.identity_key.as_ref() != Some(&user_key) {
                    return smallvec![Effect::None];
                }
                state.availability.apply_balance(point_balance);
                tracing::info!(%user_key, %point_balance, "Wallet balance loaded");
                smallvec![Effect::None]
            },

            TicketFlowAction::IdentityUnavailable { user_key } => {
                if state.availability.identity_key.as_ref() != Some(&user_key) {
                    return smallvec![Effect::None];
                }
                state.availability.balance_unknown();
                smallvec![Effect::None]
            },

            TicketFlowAction::Submit => match attempt_from_state(state, env.clock().now()) {
                Some(attempt) => {
                    tracing::info!(
                        count = attempt.count,
                        total_price = %attempt.total_price,
                        "Submitting purchase"
                    );
                    smallvec![purchase_effect(env.box_office(), attempt)]
                },
                None => {
                    // Rejected locally; the remote service is never called for
                    // an empty selection.
                    state.last_outcome = Some(PurchaseOutcome::EmptySelection);
                    state.notification =
                        NotificationRequest::for_outcome(PurchaseOutcome::EmptySelection, 0);
                    tracing::info!("Submit with empty selection rejected locally");
                    smallvec![Effect::None]
                },
            },

            TicketFlowAction::PurchaseResolved {
                outcome,
                attempted_count,
            } => {
                state.last_outcome = Some(outcome);
                match NotificationRequest::for_outcome(outcome, attempted_count) {
                    Some(request) => {
                        state.notification = Some(request);
                        smallvec![Effect::None]
                    },
                    None => {
                        // Unexpected failure: immediate alert, selection kept
                        // so the user can retry by submitting again.
                        let shell = env.shell();
                        smallvec![Effect::future(async move {
                            shell.alert(MSG_TRANSACTION_FAILED).await;
                            None
                        })]
                    },
                }
            },

            TicketFlowAction::DismissNotification => {
                let Some(request) = state.notification.take() else {
                    return smallvec![Effect::None];
                };
                if request.attempted_count == 0 {
                    // Empty-selection notice: the user committed to nothing,
                    // the modal stays open.
                    return smallvec![Effect::None];
                }
                state.selection.reset();
                tracing::info!("Notification dismissed after purchase attempt, closing modal");
                let shell = env.shell();
                smallvec![Effect::future(async move {
                    shell.close_payment_modal(true).await;
                    None
                })]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::environment::ProductionTicketFlowEnvironment;
    use crate::gateway::MockBoxOffice;
    use crate::selection::RepeatDirection;
    use crate::shell::RecordingShell;
    use crate::types::{FlowConfig, PerformanceId, Points, UserKey};
    use std::sync::Arc;
    use ticketflow_testing::reducer_test::assertions::{
        assert_has_delay_effect, assert_has_future_effect, assert_no_effects,
    };
    use ticketflow_testing::{ReducerTest, test_clock};

    fn config() -> FlowConfig {
        FlowConfig {
            performance_id: PerformanceId::new(),
            title: "An Evening of Chamber Music".to_string(),
            unit_price: Points::new(1000),
            total_seats: 50,
            user_key: UserKey::new("user@example.com"),
        }
    }

    fn env() -> ProductionTicketFlowEnvironment {
        ProductionTicketFlowEnvironment::new(
            MockBoxOffice::shared(),
            RecordingShell::shared(),
            Arc::new(test_clock()),
        )
    }

    fn reducer() -> TicketFlowReducer<ProductionTicketFlowEnvironment> {
        TicketFlowReducer::new()
    }

    fn state_with_bound(bound: u32) -> TicketFlowState {
        let mut state = TicketFlowState::new(config());
        state.selection.max_selectable = bound;
        state
    }

    #[test]
    fn increment_steps_within_bound() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state_with_bound(5))
            .when_action(TicketFlowAction::Increment)
            .then_state(|state| assert_eq!(state.selection.count, 1))
            .then_effects(|effects| assert_no_effects(effects))
            .run();
    }

    #[test]
    fn increment_at_ceiling_is_noop() {
        let mut state = state_with_bound(2);
        state.selection.count = 2;

        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(TicketFlowAction::Increment)
            .then_state(|state| assert_eq!(state.selection.count, 2))
            .run();
    }

    #[test]
    fn begin_auto_repeat_arms_tick_chain() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state_with_bound(5))
            .when_action(TicketFlowAction::BeginAutoRepeat(RepeatDirection::Up))
            .then_state(|state| {
                assert_eq!(state.selection.repeat.active, Some(RepeatDirection::Up));
            })
            .then_effects(|effects| assert_has_delay_effect(effects))
            .run();
    }

    #[test]
    fn begin_auto_repeat_while_active_arms_nothing() {
        let mut state = state_with_bound(5);
        state.selection.begin_repeat(RepeatDirection::Up);

        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(TicketFlowAction::BeginAutoRepeat(RepeatDirection::Up))
            .then_effects(|effects| assert_no_effects(effects))
            .run();
    }

    #[test]
    fn live_tick_steps_and_rearms() {
        let mut state = state_with_bound(5);
        state.selection.begin_repeat(RepeatDirection::Up);
        let epoch = state.selection.repeat.epoch;

        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(TicketFlowAction::AutoRepeatTick {
                direction: RepeatDirection::Up,
                epoch,
            })
            .then_state(|state| assert_eq!(state.selection.count, 1))
            .then_effects(|effects| assert_has_delay_effect(effects))
            .run();
    }

    #[test]
    fn stale_tick_is_inert() {
        let mut state = state_with_bound(5);
        state.selection.begin_repeat(RepeatDirection::Up);
        let epoch = state.selection.repeat.epoch;
        state.selection.end_repeat(RepeatDirection::Up);

        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(TicketFlowAction::AutoRepeatTick {
                direction: RepeatDirection::Up,
                epoch,
            })
            .then_state(|state| assert_eq!(state.selection.count, 0))
            .then_effects(|effects| assert_no_effects(effects))
            .run();
    }

    #[test]
    fn end_auto_repeat_when_idle_is_safe() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state_with_bound(5))
            .when_action(TicketFlowAction::EndAutoRepeat(RepeatDirection::Down))
            .then_effects(|effects| assert_no_effects(effects))
            .run();
    }

    #[test]
    fn refresh_inventory_fetches_once_per_key() {
        let performance_id = config().performance_id;
        let mut state = TicketFlowState::new(config());
        let reducer = reducer();
        let env = env();

        let first = reducer.reduce(
            &mut state,
            TicketFlowAction::RefreshInventory(performance_id),
            &env,
        );
        assert_has_future_effect(&first);

        // Same key again: the cache is claimed, no second fetch.
        let second = reducer.reduce(
            &mut state,
            TicketFlowAction::RefreshInventory(performance_id),
            &env,
        );
        assert_no_effects(&second);
    }

    #[test]
    fn inventory_loaded_sets_bound_from_remaining() {
        let performance_id = config().performance_id;
        let mut state = TicketFlowState::new(config());
        state.availability.claim_inventory_key(performance_id);

        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(TicketFlowAction::InventoryLoaded {
                performance_id,
                sold_seats: 30,
            })
            .then_state(|state| {
                // 50 total - 30 sold
                assert_eq!(state.selection.max_selectable, 20);
            })
            .run();
    }

    #[test]
    fn inventory_loaded_for_other_performance_is_ignored() {
        let mut state = TicketFlowState::new(config());
        state.availability.claim_inventory_key(state.config.performance_id);
        state.selection.max_selectable = 7;

        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(TicketFlowAction::InventoryLoaded {
                performance_id: PerformanceId::new(),
                sold_seats: 49,
            })
            .then_state(|state| assert_eq!(state.selection.max_selectable, 7))
            .run();
    }

    #[test]
    fn inventory_unavailable_fails_closed() {
        let performance_id = config().performance_id;
        let mut state = state_with_bound(10);
        state.selection.count = 4;
        state.availability.claim_inventory_key(performance_id);

        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(TicketFlowAction::InventoryUnavailable { performance_id })
            .then_state(|state| {
                assert_eq!(state.selection.max_selectable, 0);
                // Count survives until the next mutation clamps it.
                assert_eq!(state.selection.count, 4);
            })
            .run();
    }

    #[test]
    fn refresh_identity_fetches_once_per_key() {
        let user_key = UserKey::new("user@example.com");
        let mut state = TicketFlowState::new(config());
        let reducer = reducer();
        let env = env();

        let first = reducer.reduce(
            &mut state,
            TicketFlowAction::RefreshIdentity(user_key.clone()),
            &env,
        );
        assert_has_future_effect(&first);

        let second = reducer.reduce(&mut state, TicketFlowAction::RefreshIdentity(user_key), &env);
        assert_no_effects(&second);
    }

    #[test]
    fn submit_with_empty_selection_is_rejected_locally() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state_with_bound(5))
            .when_action(TicketFlowAction::Submit)
            .then_state(|state| {
                assert_eq!(state.last_outcome, Some(PurchaseOutcome::EmptySelection));
                let notification = state.notification.as_ref().unwrap();
                assert_eq!(notification.attempted_count, 0);
            })
            .then_effects(|effects| assert_no_effects(effects))
            .run();
    }

    #[test]
    fn submit_with_selection_emits_purchase_effect() {
        let mut state = state_with_bound(5);
        state.selection.count = 3;

        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(TicketFlowAction::Submit)
            .then_effects(|effects| assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn purchase_resolved_purchased_opens_notification() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state_with_bound(5))
            .when_action(TicketFlowAction::PurchaseResolved {
                outcome: PurchaseOutcome::Purchased,
                attempted_count: 2,
            })
            .then_state(|state| {
                assert_eq!(state.last_outcome, Some(PurchaseOutcome::Purchased));
                let notification = state.notification.as_ref().unwrap();
                assert_eq!(notification.attempted_count, 2);
            })
            .then_effects(|effects| assert_no_effects(effects))
            .run();
    }

    #[test]
    fn purchase_resolved_failure_alerts_without_notification() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state_with_bound(5))
            .when_action(TicketFlowAction::PurchaseResolved {
                outcome: PurchaseOutcome::TransactionFailed,
                attempted_count: 2,
            })
            .then_state(|state| {
                assert_eq!(state.last_outcome, Some(PurchaseOutcome::TransactionFailed));
                assert!(state.notification.is_none());
            })
            .then_effects(|effects| assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn dismiss_after_attempt_closes_modal_and_resets() {
        let mut state = state_with_bound(5);
        state.selection.count = 2;
        state.notification =
            NotificationRequest::for_outcome(PurchaseOutcome::Purchased, 2);

        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(TicketFlowAction::DismissNotification)
            .then_state(|state| {
                assert!(state.notification.is_none());
                assert_eq!(state.selection.count, 0);
            })
            .then_effects(|effects| assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn dismiss_after_empty_notice_does_not_close() {
        let mut state = state_with_bound(5);
        state.notification =
            NotificationRequest::for_outcome(PurchaseOutcome::EmptySelection, 0);

        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state)
            .when_action(TicketFlowAction::DismissNotification)
            .then_state(|state| assert!(state.notification.is_none()))
            .then_effects(|effects| assert_no_effects(effects))
            .run();
    }

    #[test]
    fn dismiss_without_notification_is_noop() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(state_with_bound(5))
            .when_action(TicketFlowAction::DismissNotification)
            .then_effects(|effects| assert_no_effects(effects))
            .run();
    }
}
