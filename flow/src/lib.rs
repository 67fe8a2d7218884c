//! # Ticketflow
//!
//! A ticket purchase flow built on the ticketflow reducer architecture:
//! a bounded seat selector with press-and-hold auto-repeat, cached inventory
//! and wallet snapshots, a single authoritative purchase call, and a
//! notification whose dismissal drives the surrounding modal.
//!
//! ## Structure
//!
//! - [`types`]: identifiers, value objects, and the coordinator state
//! - [`selection`]: the bounded counter and auto-repeat state machine
//! - [`availability`]: cached inventory/balance snapshots and their fetches
//! - [`purchase`]: attempt composition and the purchase effect
//! - [`notification`]: messages and the dismissal contract
//! - [`gateway`]: the box-office service boundary
//! - [`shell`]: outward signals to the containing view
//! - [`reducer`]: the coordinator reducer tying it all together
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ticketflow::prelude::*;
//! use ticketflow_core::environment::SystemClock;
//! use ticketflow_runtime::Store;
//!
//! # async fn example() -> Result<(), ticketflow_runtime::StoreError> {
//! let config = FlowConfig {
//!     performance_id: PerformanceId::new(),
//!     title: "An Evening of Chamber Music".to_string(),
//!     unit_price: Points::new(1000),
//!     total_seats: 50,
//!     user_key: UserKey::new("user@example.com"),
//! };
//! let env = ProductionTicketFlowEnvironment::new(
//!     MockBoxOffice::shared(),
//!     RecordingShell::shared(),
//!     Arc::new(SystemClock),
//! );
//! let store = Store::new(
//!     TicketFlowState::new(config.clone()),
//!     TicketFlowReducer::new(),
//!     env,
//! );
//!
//! store.send(TicketFlowAction::RefreshInventory(config.performance_id)).await?;
//! store.send(TicketFlowAction::Increment).await?;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod availability;
pub mod environment;
pub mod gateway;
pub mod notification;
pub mod purchase;
pub mod reducer;
pub mod selection;
pub mod shell;
pub mod types;

/// Commonly used items, re-exported for consumers
pub mod prelude {
    pub use crate::actions::TicketFlowAction;
    pub use crate::availability::AvailabilityState;
    pub use crate::environment::{ProductionTicketFlowEnvironment, TicketFlowEnvironment};
    pub use crate::gateway::{BoxOffice, GatewayError, MockBoxOffice, ScriptedPurchase};
    pub use crate::notification::NotificationRequest;
    pub use crate::reducer::TicketFlowReducer;
    pub use crate::selection::{REPEAT_PERIOD, RepeatDirection, SelectionState};
    pub use crate::shell::{FlowShell, RecordingShell, ShellEvent};
    pub use crate::types::{
        FlowConfig, InventorySnapshot, PerformanceId, Points, PurchaseAttempt, PurchaseOutcome,
        TicketFlowState, UserKey,
    };
}
