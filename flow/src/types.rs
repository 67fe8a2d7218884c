//! Domain types for the ticket purchase flow.
//!
//! This module contains the value objects and state types for the flow:
//! identifiers, the point currency, the cached inventory snapshot, the purchase
//! attempt composed at submission time, and the coordinator state that owns all
//! of it.

use crate::availability::AvailabilityState;
use crate::notification::NotificationRequest;
use crate::selection::SelectionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a performance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerformanceId(Uuid);

impl PerformanceId {
    /// Creates a new random `PerformanceId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `PerformanceId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PerformanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PerformanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a sold ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Creates a new random `TicketId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier for the purchasing user (an email address in practice)
///
/// The flow never inspects the key; it only forwards it to the wallet and
/// purchase operations.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserKey(String);

impl UserKey {
    /// Create a user key from any string-like identifier
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Value objects
// ============================================================================

/// Point currency - the user's spendable credit
///
/// Ticket prices and balances are denominated in whole points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Points(u64);

impl Points {
    /// Zero points
    pub const ZERO: Self = Self(0);

    /// Create a point amount
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// The raw point amount
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Multiply a per-ticket price by a seat count
    #[must_use]
    pub const fn times(&self, count: u32) -> Self {
        Self(self.0.saturating_mul(count as u64))
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} P", self.0)
    }
}

/// A sold-seat record returned by the inventory service
///
/// The flow uses the ticket list only for its length; the fields exist because
/// the service returns full records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoldSeat {
    /// The ticket occupying the seat
    pub ticket_id: TicketId,
}

/// Wallet profile returned by the user service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user this profile belongs to
    pub user_key: UserKey,
    /// Current spendable balance
    pub user_point: Points,
}

/// Read-only cached copy of the seat inventory for one performance
///
/// Owned by the external inventory service; this flow only caches it and never
/// writes it back, even after a successful purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Total sellable seats for the performance
    pub total_seats: u32,
    /// Seats already sold
    pub sold_seats: u32,
}

impl InventorySnapshot {
    /// Create a snapshot, clamping `sold` into `0..=total`
    #[must_use]
    pub const fn new(total_seats: u32, sold_seats: u32) -> Self {
        let sold_seats = if sold_seats > total_seats {
            total_seats
        } else {
            sold_seats
        };
        Self {
            total_seats,
            sold_seats,
        }
    }

    /// Seats still available for sale
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.total_seats - self.sold_seats
    }
}

/// Static facts about the performance being sold, supplied by the container
///
/// These are the props of the surrounding view: the flow treats them as
/// immutable for its lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// The performance tickets are sold for
    pub performance_id: PerformanceId,
    /// Display title of the performance
    pub title: String,
    /// Price of a single ticket, in points
    pub unit_price: Points,
    /// Total sellable seats (the inventory service reports only sold seats)
    pub total_seats: u32,
    /// The purchasing user
    pub user_key: UserKey,
}

/// A single purchase attempt, composed at submission time
///
/// Sent exactly once per submit and never retried automatically; the remote
/// call is the sole authority on availability and balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseAttempt {
    /// The performance being purchased
    pub performance_id: PerformanceId,
    /// The purchasing user
    pub user_key: UserKey,
    /// Number of seats requested
    pub count: u32,
    /// Price per seat
    pub unit_price: Points,
    /// `count * unit_price`, precomputed for the wire call
    pub total_price: Points,
    /// When the attempt was composed, from the environment clock
    pub submitted_at: DateTime<Utc>,
}

impl PurchaseAttempt {
    /// Compose an attempt from the current selection and config
    #[must_use]
    pub fn new(
        performance_id: PerformanceId,
        user_key: UserKey,
        count: u32,
        unit_price: Points,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            performance_id,
            user_key,
            count,
            unit_price,
            total_price: unit_price.times(count),
            submitted_at,
        }
    }
}

/// Terminal outcome of one purchase attempt
///
/// All outcomes end the attempt; none triggers an automatic retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOutcome {
    /// Submit with zero seats selected; rejected locally without a remote call
    EmptySelection,
    /// The remote check-and-debit succeeded
    Purchased,
    /// The remote service reported an insufficient point balance
    InsufficientPoints,
    /// The remote call failed unexpectedly (transport or server error)
    TransactionFailed,
}

// ============================================================================
// Coordinator state
// ============================================================================

/// The whole flow state, exclusively owned by the coordinator reducer
///
/// There are no ambient globals: selection, cached snapshots, and the active
/// notification all live here and are only mutated through reducer actions.
#[derive(Clone, Debug)]
pub struct TicketFlowState {
    /// Static performance facts from the container
    pub config: FlowConfig,
    /// Bounded counter and auto-repeat machine
    pub selection: SelectionState,
    /// Cached inventory snapshot and wallet balance
    pub availability: AvailabilityState,
    /// The active notification, at most one; a new request replaces it
    pub notification: Option<NotificationRequest>,
    /// Outcome of the most recent purchase attempt, render-facing
    pub last_outcome: Option<PurchaseOutcome>,
}

impl TicketFlowState {
    /// Create the initial state for a performance
    ///
    /// The selection bound starts at zero until the first inventory refresh
    /// lands: selecting against unknown inventory is not allowed.
    #[must_use]
    pub fn new(config: FlowConfig) -> Self {
        Self {
            config,
            selection: SelectionState::default(),
            availability: AvailabilityState::default(),
            notification: None,
            last_outcome: None,
        }
    }

    /// Total price of the current selection, render-facing
    #[must_use]
    pub const fn total_price(&self) -> Points {
        self.config.unit_price.times(self.selection.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_precomputes_total_price() {
        let attempt = PurchaseAttempt::new(
            PerformanceId::new(),
            UserKey::new("user@example.com"),
            3,
            Points::new(1000),
            Utc::now(),
        );
        assert_eq!(attempt.total_price, Points::new(3000));
    }

    #[test]
    fn snapshot_clamps_oversold() {
        let snapshot = InventorySnapshot::new(10, 12);
        assert_eq!(snapshot.sold_seats, 10);
        assert_eq!(snapshot.remaining(), 0);
    }

    #[test]
    fn snapshot_remaining() {
        let snapshot = InventorySnapshot::new(100, 37);
        assert_eq!(snapshot.remaining(), 63);
    }

    #[test]
    fn points_display() {
        assert_eq!(Points::new(1500).to_string(), "1500 P");
    }
}
