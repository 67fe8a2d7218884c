//! Ticket flow demo binary
//!
//! Walks one full purchase cycle against the mock box office: refresh
//! inventory and wallet, select seats with the auto-repeat chain, submit,
//! and dismiss the resulting notification.

use std::sync::Arc;
use std::time::Duration;
use ticketflow::prelude::*;
use ticketflow_core::environment::SystemClock;
use ticketflow_runtime::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ticketflow_runtime::StoreError> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticketflow=debug,ticketflow_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Ticket Flow: one purchase cycle ===\n");

    let config = FlowConfig {
        performance_id: PerformanceId::new(),
        title: "An Evening of Chamber Music".to_string(),
        unit_price: Points::new(1000),
        total_seats: 50,
        user_key: UserKey::new("user@example.com"),
    };

    let box_office = Arc::new(
        MockBoxOffice::new()
            .with_sold_seats(30)
            .with_user_point(Points::new(10_000)),
    );
    let shell = RecordingShell::shared();
    let env = ProductionTicketFlowEnvironment::new(
        box_office,
        Arc::clone(&shell) as Arc<dyn FlowShell>,
        Arc::new(SystemClock),
    );

    let store = Store::new(
        TicketFlowState::new(config.clone()),
        TicketFlowReducer::new(),
        env,
    );

    // Load external truths before selecting anything
    println!(">>> Refreshing inventory and wallet");
    let mut handle = store
        .send(TicketFlowAction::RefreshInventory(config.performance_id))
        .await?;
    handle.wait().await;
    let mut handle = store
        .send(TicketFlowAction::RefreshIdentity(config.user_key.clone()))
        .await?;
    handle.wait().await;

    let (bound, balance) = store
        .state(|s| (s.selection.max_selectable, s.availability.point_balance))
        .await;
    println!("Selectable seats: {bound}, balance: {balance:?}");

    // Hold the increment control for a few ticks
    println!("\n>>> Holding increment for ~350ms");
    store
        .send(TicketFlowAction::BeginAutoRepeat(RepeatDirection::Up))
        .await?;
    tokio::time::sleep(Duration::from_millis(350)).await;
    store
        .send(TicketFlowAction::EndAutoRepeat(RepeatDirection::Up))
        .await?;

    let (count, total) = store
        .state(|s| (s.selection.count, s.total_price()))
        .await;
    println!("Selected {count} seats, total {total}");

    // Submit; waiting on the handle covers the purchase effect and the
    // resolved outcome's trip back through the reducer
    println!("\n>>> Submitting purchase");
    let mut handle = store.send(TicketFlowAction::Submit).await?;
    handle.wait().await;

    let notification = store.state(|s| s.notification.clone()).await;
    if let Some(n) = notification {
        println!("Notification: {}", n.message);
    }

    // Dismissing after a real attempt signals the container to close
    println!("\n>>> Dismissing notification");
    let mut handle = store.send(TicketFlowAction::DismissNotification).await?;
    handle.wait().await;
    println!("Shell events: {:?}", shell.events());

    store.shutdown(Duration::from_secs(1)).await?;
    println!("\n=== Done ===");
    Ok(())
}
