//! Purchase orchestration.
//!
//! Submitting is a single remote call. The flow never pre-validates against
//! its cached inventory or balance snapshots; the server's check-and-debit is
//! the sole authority, and the three possible answers map one-to-one onto
//! purchase outcomes. Nothing retries automatically - a failed attempt leaves
//! the selection intact so the user can submit again.

use crate::actions::TicketFlowAction;
use crate::gateway::BoxOffice;
use crate::types::{PurchaseAttempt, PurchaseOutcome, TicketFlowState};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use ticketflow_core::effect::Effect;

/// Compose the purchase attempt for the current state
///
/// Returns `None` when nothing is selected - the empty-selection short-circuit
/// is decided here, before any remote call. `submitted_at` comes from the
/// environment clock, never from ambient time.
#[must_use]
pub fn attempt_from_state(
    state: &TicketFlowState,
    submitted_at: DateTime<Utc>,
) -> Option<PurchaseAttempt> {
    if state.selection.count == 0 {
        return None;
    }
    Some(PurchaseAttempt::new(
        state.config.performance_id,
        state.config.user_key.clone(),
        state.selection.count,
        state.config.unit_price,
        submitted_at,
    ))
}

/// Effect that runs one purchase attempt and reports the outcome
///
/// The server's three answers map directly: `Ok(true)` purchased, `Ok(false)`
/// insufficient points, `Err(_)` failed transaction.
pub fn purchase_effect(
    office: Arc<dyn BoxOffice>,
    attempt: PurchaseAttempt,
) -> Effect<TicketFlowAction> {
    Effect::future(async move {
        let count = attempt.count;
        let outcome = match office.purchase(attempt).await {
            Ok(true) => PurchaseOutcome::Purchased,
            Ok(false) => PurchaseOutcome::InsufficientPoints,
            Err(error) => {
                tracing::error!(%error, "Purchase transaction failed");
                PurchaseOutcome::TransactionFailed
            },
        };
        tracing::info!(count, ?outcome, "Purchase attempt resolved");
        Some(TicketFlowAction::PurchaseResolved {
            outcome,
            attempted_count: count,
        })
    })
}
