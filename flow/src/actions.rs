//! Actions driving the ticket purchase flow.
//!
//! Every state change in the flow happens through one of these actions, sent
//! through the store. User intents (taps, holds, submit, dismiss) and effect
//! feedback (fetch results, tick arrivals, purchase outcomes) share the one
//! enum so the reducer sees a single serialized stream.

use crate::selection::RepeatDirection;
use crate::types::{PerformanceId, Points, PurchaseOutcome, UserKey};

/// All actions understood by the flow coordinator
#[derive(Clone, Debug)]
pub enum TicketFlowAction {
    /// Single tap on the increment control
    Increment,
    /// Single tap on the decrement control
    Decrement,
    /// Clear the selection back to zero
    ResetSelection,
    /// Press-and-hold started on a stepper control
    ///
    /// Idempotent: re-sending while the same direction is already repeating
    /// arms nothing new.
    BeginAutoRepeat(RepeatDirection),
    /// Press-and-hold ended (release, pointer leaving the control, teardown)
    ///
    /// Safe to send when nothing is repeating.
    EndAutoRepeat(RepeatDirection),
    /// One tick of an armed auto-repeat chain
    ///
    /// Carries the epoch it was armed under; a tick whose epoch no longer
    /// matches the repeat state is discarded.
    AutoRepeatTick {
        /// Direction the chain was armed in
        direction: RepeatDirection,
        /// Repeat-state generation at arming time
        epoch: u64,
    },
    /// Refresh the seat inventory for a performance (memoized per id)
    RefreshInventory(PerformanceId),
    /// Inventory fetch succeeded
    InventoryLoaded {
        /// Performance the result belongs to
        performance_id: PerformanceId,
        /// Length of the sold-ticket list
        sold_seats: u32,
    },
    /// Inventory fetch failed; the selection bound fails closed
    InventoryUnavailable {
        /// Performance the failed fetch was for
        performance_id: PerformanceId,
    },
    /// Refresh the wallet balance for a user (memoized per key)
    RefreshIdentity(UserKey),
    /// Wallet fetch succeeded
    IdentityLoaded {
        /// User the balance belongs to
        user_key: UserKey,
        /// Current spendable balance
        point_balance: Points,
    },
    /// Wallet fetch failed; the balance stays unknown
    IdentityUnavailable {
        /// User the failed fetch was for
        user_key: UserKey,
    },
    /// Submit the current selection as one purchase attempt
    Submit,
    /// A purchase attempt resolved
    PurchaseResolved {
        /// How the attempt ended
        outcome: PurchaseOutcome,
        /// Seat count the attempt carried
        attempted_count: u32,
    },
    /// The user dismissed the active notification
    DismissNotification,
}
