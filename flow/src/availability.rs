//! Cached external truths: seat inventory and point balance.
//!
//! Both snapshots are owned by external services; the flow holds read-only
//! cached copies, refreshed explicitly and memoized per key - a refresh for a
//! key that is already cached performs no fetch. The balance is advisory and
//! display-only; the purchase call is the sole authoritative check. The
//! inventory bound fails closed: when the fetch fails, the flow would rather
//! sell nothing than sell against a stale, possibly-too-large bound.

use crate::actions::TicketFlowAction;
use crate::gateway::BoxOffice;
use crate::types::{InventorySnapshot, PerformanceId, Points, UserKey};
use std::sync::Arc;
use ticketflow_core::effect::Effect;

/// Cached inventory and identity snapshots, keyed by their refresh arguments
#[derive(Clone, Debug, Default)]
pub struct AvailabilityState {
    /// Last successfully fetched inventory, `None` before the first load or
    /// after a failed one
    pub inventory: Option<InventorySnapshot>,
    /// Performance the inventory cache belongs to (memoization key)
    pub inventory_key: Option<PerformanceId>,
    /// Cached point balance; `None` means unknown (display omitted, purchase
    /// not blocked)
    pub point_balance: Option<Points>,
    /// User the balance cache belongs to (memoization key)
    pub identity_key: Option<UserKey>,
}

impl AvailabilityState {
    /// Whether a refresh for this performance must actually fetch
    #[must_use]
    pub fn inventory_is_stale(&self, performance_id: PerformanceId) -> bool {
        self.inventory_key != Some(performance_id)
    }

    /// Record that a fetch for this performance is underway
    ///
    /// The key is claimed at request time, so inventory is fetched once per
    /// distinct performance id even if the result has not landed yet.
    pub fn claim_inventory_key(&mut self, performance_id: PerformanceId) {
        self.inventory_key = Some(performance_id);
    }

    /// Install a fetched snapshot
    pub fn apply_inventory(&mut self, snapshot: InventorySnapshot) {
        self.inventory = Some(snapshot);
    }

    /// Drop the cached snapshot after a failed fetch
    pub fn inventory_unavailable(&mut self) {
        self.inventory = None;
    }

    /// Whether a refresh for this user must actually fetch
    #[must_use]
    pub fn identity_is_stale(&self, user_key: &UserKey) -> bool {
        self.identity_key.as_ref() != Some(user_key)
    }

    /// Record that a wallet fetch for this user is underway
    pub fn claim_identity_key(&mut self, user_key: UserKey) {
        self.identity_key = Some(user_key);
    }

    /// Install a fetched balance
    pub fn apply_balance(&mut self, balance: Points) {
        self.point_balance = Some(balance);
    }

    /// Mark the balance unknown after a failed fetch
    pub fn balance_unknown(&mut self) {
        self.point_balance = None;
    }
}

/// Effect that fetches the sold-ticket list and reports back
///
/// Only the list length is used. Failure is logged and reported as
/// `InventoryUnavailable`; the reducer then fails the bound closed.
pub fn refresh_inventory_effect(
    office: Arc<dyn BoxOffice>,
    performance_id: PerformanceId,
) -> Effect<TicketFlowAction> {
    Effect::future(async move {
        match office.ticket_list(performance_id).await {
            Ok(seats) => {
                let sold_seats = u32::try_from(seats.len()).unwrap_or(u32::MAX);
                Some(TicketFlowAction::InventoryLoaded {
                    performance_id,
                    sold_seats,
                })
            },
            Err(error) => {
                tracing::warn!(%performance_id, %error, "Inventory fetch failed, failing closed");
                Some(TicketFlowAction::InventoryUnavailable { performance_id })
            },
        }
    })
}

/// Effect that fetches the wallet profile and reports back
///
/// Failure is logged and leaves the balance unknown; the purchase path does
/// not depend on this cache.
pub fn refresh_identity_effect(
    office: Arc<dyn BoxOffice>,
    user_key: UserKey,
) -> Effect<TicketFlowAction> {
    Effect::future(async move {
        match office.user_profile(user_key.clone()).await {
            Ok(profile) => Some(TicketFlowAction::IdentityLoaded {
                user_key,
                point_balance: profile.user_point,
            }),
            Err(error) => {
                tracing::warn!(%user_key, %error, "Wallet fetch failed, balance unknown");
                Some(TicketFlowAction::IdentityUnavailable { user_key })
            },
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_memoized_per_key() {
        let mut availability = AvailabilityState::default();
        let performance = PerformanceId::new();

        assert!(availability.inventory_is_stale(performance));
        availability.claim_inventory_key(performance);
        assert!(!availability.inventory_is_stale(performance));

        // A different performance forces a fetch again.
        assert!(availability.inventory_is_stale(PerformanceId::new()));
    }

    #[test]
    fn identity_memoized_per_key() {
        let mut availability = AvailabilityState::default();
        let user = UserKey::new("user@example.com");

        assert!(availability.identity_is_stale(&user));
        availability.claim_identity_key(user.clone());
        assert!(!availability.identity_is_stale(&user));
        assert!(availability.identity_is_stale(&UserKey::new("other@example.com")));
    }

    #[test]
    fn failed_fetch_clears_snapshot() {
        let mut availability = AvailabilityState::default();
        availability.apply_inventory(InventorySnapshot::new(10, 2));
        availability.inventory_unavailable();
        assert_eq!(availability.inventory, None);
    }
}
