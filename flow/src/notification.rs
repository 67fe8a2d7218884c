//! Notification channel boundary.
//!
//! The notification itself is displayed by an external collaborator; this flow
//! only decides what message to show, when to show it, and what dismissing it
//! means. At most one notification is active at a time - a new request simply
//! replaces the prior one.

use crate::types::PurchaseOutcome;
use serde::{Deserialize, Serialize};

/// Message shown when submitting with nothing selected
pub const MSG_EMPTY_SELECTION: &str = "Please select at least one ticket.";
/// Message shown when the remote service rejects for insufficient balance
pub const MSG_INSUFFICIENT_POINTS: &str = "Your point balance is insufficient.";
/// Message shown after a successful purchase
pub const MSG_PURCHASED: &str = "Your purchase is complete.";
/// Alert text for an unexpected transaction failure
pub const MSG_TRANSACTION_FAILED: &str = "The purchase could not be completed.";

/// A request to show the notification, owned by the purchase orchestration
///
/// `attempted_count` is the seat count of the attempt this notification
/// followed; dismissal only signals the container to close when it was
/// greater than zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// The message to display
    pub message: String,
    /// Seat count of the purchase attempt that produced this notification
    pub attempted_count: u32,
}

impl NotificationRequest {
    /// Build the notification for an outcome, if that outcome uses the channel
    ///
    /// `TransactionFailed` returns `None`: unexpected failures are surfaced as
    /// an immediate alert, not through the notification channel.
    #[must_use]
    pub fn for_outcome(outcome: PurchaseOutcome, attempted_count: u32) -> Option<Self> {
        let message = match outcome {
            PurchaseOutcome::EmptySelection => MSG_EMPTY_SELECTION,
            PurchaseOutcome::InsufficientPoints => MSG_INSUFFICIENT_POINTS,
            PurchaseOutcome::Purchased => MSG_PURCHASED,
            PurchaseOutcome::TransactionFailed => return None,
        };
        Some(Self {
            message: message.to_string(),
            attempted_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_outcomes_open_the_notification() {
        for (outcome, expected) in [
            (PurchaseOutcome::EmptySelection, MSG_EMPTY_SELECTION),
            (PurchaseOutcome::InsufficientPoints, MSG_INSUFFICIENT_POINTS),
            (PurchaseOutcome::Purchased, MSG_PURCHASED),
        ] {
            let request = NotificationRequest::for_outcome(outcome, 2);
            assert_eq!(request.map(|r| r.message), Some(expected.to_string()));
        }
    }

    #[test]
    fn transaction_failure_bypasses_the_channel() {
        assert_eq!(
            NotificationRequest::for_outcome(PurchaseOutcome::TransactionFailed, 2),
            None
        );
    }
}
