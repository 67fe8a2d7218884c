//! Box-office gateway for inventory, wallet, and purchase operations.
//!
//! This module provides the interface the flow consumes from the backing
//! ticketing service: the sold-ticket list for a performance, the user's wallet
//! profile, and the single authoritative purchase call. The purchase call must
//! check and debit atomically on the server side; the flow never pre-validates
//! against its cached snapshots.

use crate::types::{PerformanceId, PurchaseAttempt, SoldSeat, UserProfile};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Gateway call result
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway failure - transport or payload decoding
///
/// Lookup failures are recovered locally (fail-closed bound, unknown balance);
/// a purchase failure surfaces as a failed transaction.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The remote call could not be completed
    #[error("gateway transport error: {message}")]
    Transport {
        /// Underlying failure description
        message: String,
    },
    /// The remote response could not be interpreted
    #[error("gateway decode error: {message}")]
    Decode {
        /// Underlying failure description
        message: String,
    },
}

/// Box office service trait
///
/// Abstraction over the backing ticketing service. The flow only consumes
/// these three operations; the inventory and wallet ledgers themselves live
/// behind them.
pub trait BoxOffice: Send + Sync {
    /// Fetch the sold-ticket records for a performance
    ///
    /// The flow uses only the length of the returned list.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport or decode failure.
    fn ticket_list(
        &self,
        performance_id: PerformanceId,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<Vec<SoldSeat>>> + Send>>;

    /// Fetch the wallet profile for a user
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport or decode failure.
    fn user_profile(
        &self,
        user_key: crate::types::UserKey,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<UserProfile>> + Send>>;

    /// Execute one purchase attempt
    ///
    /// The server checks seat availability and point balance atomically.
    /// `Ok(false)` means the balance was insufficient; an error means the
    /// transaction failed for an unexpected reason.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport or server failure.
    fn purchase(
        &self,
        attempt: PurchaseAttempt,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<bool>> + Send>>;
}

/// Scripted purchase behavior for [`MockBoxOffice`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptedPurchase {
    /// `Ok(true)` - check-and-debit succeeded
    #[default]
    Succeed,
    /// `Ok(false)` - insufficient point balance
    InsufficientPoints,
    /// `Err(_)` - transport/server failure
    Fail,
}

/// Mock box office with scripted responses (for development and testing)
///
/// Records every purchase attempt and counts lookup calls, so tests can assert
/// on the composed attempt and on per-key fetch memoization.
#[derive(Debug, Default)]
pub struct MockBoxOffice {
    sold_seats: std::sync::Mutex<Vec<SoldSeat>>,
    ticket_list_fails: std::sync::atomic::AtomicBool,
    user_point: std::sync::Mutex<Option<crate::types::Points>>,
    user_profile_fails: std::sync::atomic::AtomicBool,
    purchase_script: std::sync::Mutex<ScriptedPurchase>,
    recorded_attempts: std::sync::Mutex<Vec<PurchaseAttempt>>,
    ticket_list_calls: std::sync::atomic::AtomicUsize,
    user_profile_calls: std::sync::atomic::AtomicUsize,
}

#[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable in a mock
impl MockBoxOffice {
    /// Creates a new mock with an empty performance and a succeeding purchase
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Script the number of seats already sold
    #[must_use]
    pub fn with_sold_seats(self, count: usize) -> Self {
        *self.sold_seats.lock().unwrap() = (0..count)
            .map(|_| SoldSeat {
                ticket_id: crate::types::TicketId::new(),
            })
            .collect();
        self
    }

    /// Script the inventory lookup to fail
    #[must_use]
    pub fn with_ticket_list_failure(self) -> Self {
        self.ticket_list_fails
            .store(true, std::sync::atomic::Ordering::SeqCst);
        self
    }

    /// Script the user's point balance
    #[must_use]
    pub fn with_user_point(self, points: crate::types::Points) -> Self {
        *self.user_point.lock().unwrap() = Some(points);
        self
    }

    /// Script the wallet lookup to fail
    #[must_use]
    pub fn with_user_profile_failure(self) -> Self {
        self.user_profile_fails
            .store(true, std::sync::atomic::Ordering::SeqCst);
        self
    }

    /// Script the purchase behavior
    #[must_use]
    pub fn with_purchase(self, script: ScriptedPurchase) -> Self {
        *self.purchase_script.lock().unwrap() = script;
        self
    }

    /// Purchase attempts received so far
    #[must_use]
    pub fn recorded_attempts(&self) -> Vec<PurchaseAttempt> {
        self.recorded_attempts.lock().unwrap().clone()
    }

    /// Number of `ticket_list` calls received
    #[must_use]
    pub fn ticket_list_calls(&self) -> usize {
        self.ticket_list_calls
            .load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Number of `user_profile` calls received
    #[must_use]
    pub fn user_profile_calls(&self) -> usize {
        self.user_profile_calls
            .load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable in a mock
impl BoxOffice for MockBoxOffice {
    fn ticket_list(
        &self,
        performance_id: PerformanceId,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<Vec<SoldSeat>>> + Send>> {
        self.ticket_list_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let fails = self
            .ticket_list_fails
            .load(std::sync::atomic::Ordering::SeqCst);
        let seats = self.sold_seats.lock().unwrap().clone();

        Box::pin(async move {
            if fails {
                tracing::warn!(%performance_id, "Mock inventory lookup failing as scripted");
                return Err(GatewayError::Transport {
                    message: "scripted inventory failure".to_string(),
                });
            }
            tracing::info!(%performance_id, sold = seats.len(), "Mock inventory lookup");
            Ok(seats)
        })
    }

    fn user_profile(
        &self,
        user_key: crate::types::UserKey,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<UserProfile>> + Send>> {
        self.user_profile_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let fails = self
            .user_profile_fails
            .load(std::sync::atomic::Ordering::SeqCst);
        let point = *self.user_point.lock().unwrap();

        Box::pin(async move {
            if fails {
                tracing::warn!(%user_key, "Mock wallet lookup failing as scripted");
                return Err(GatewayError::Transport {
                    message: "scripted wallet failure".to_string(),
                });
            }
            let user_point = point.unwrap_or(crate::types::Points::ZERO);
            tracing::info!(%user_key, %user_point, "Mock wallet lookup");
            Ok(UserProfile {
                user_key,
                user_point,
            })
        })
    }

    fn purchase(
        &self,
        attempt: PurchaseAttempt,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<bool>> + Send>> {
        let script = *self.purchase_script.lock().unwrap();
        self.recorded_attempts.lock().unwrap().push(attempt.clone());

        Box::pin(async move {
            match script {
                ScriptedPurchase::Succeed => {
                    tracing::info!(
                        count = attempt.count,
                        total_price = %attempt.total_price,
                        "Mock purchase succeeded"
                    );
                    Ok(true)
                },
                ScriptedPurchase::InsufficientPoints => {
                    tracing::info!(
                        count = attempt.count,
                        total_price = %attempt.total_price,
                        "Mock purchase rejected: insufficient points"
                    );
                    Ok(false)
                },
                ScriptedPurchase::Fail => {
                    tracing::warn!(count = attempt.count, "Mock purchase failing as scripted");
                    Err(GatewayError::Transport {
                        message: "scripted purchase failure".to_string(),
                    })
                },
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Points, UserKey};
    use chrono::Utc;

    #[tokio::test]
    async fn mock_purchase_success_records_attempt() {
        let office = MockBoxOffice::new();
        let attempt = PurchaseAttempt::new(
            PerformanceId::new(),
            UserKey::new("user@example.com"),
            2,
            Points::new(500),
            Utc::now(),
        );

        let result = office.purchase(attempt.clone()).await;

        assert!(result.unwrap());
        assert_eq!(office.recorded_attempts(), vec![attempt]);
    }

    #[tokio::test]
    async fn mock_scripted_insufficient_points() {
        let office = MockBoxOffice::new().with_purchase(ScriptedPurchase::InsufficientPoints);
        let attempt = PurchaseAttempt::new(
            PerformanceId::new(),
            UserKey::new("user@example.com"),
            1,
            Points::new(500),
            Utc::now(),
        );

        assert!(!office.purchase(attempt).await.unwrap());
    }

    #[tokio::test]
    async fn mock_ticket_list_failure() {
        let office = MockBoxOffice::new().with_ticket_list_failure();

        let result = office.ticket_list(PerformanceId::new()).await;

        assert!(result.is_err());
        assert_eq!(office.ticket_list_calls(), 1);
    }
}
