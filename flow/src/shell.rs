//! Container shell - the flow's outward-facing signals.
//!
//! The flow does not render anything itself. When it needs the surrounding
//! view to react - tear down the payment modal after a completed purchase
//! cycle, or surface an unexpected failure as an immediate alert - it calls
//! through this trait. Both are fire-and-forget from the flow's perspective.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// Signals the flow sends to its container
pub trait FlowShell: Send + Sync {
    /// Ask the container to close the payment modal
    ///
    /// Invoked only when a notification following a non-empty purchase attempt
    /// is dismissed; a dismiss after an empty-selection notice never closes
    /// the modal because the user has not committed to anything.
    fn close_payment_modal(&self, close: bool) -> Pin<Box<dyn Future<Output = ()> + Send>>;

    /// Surface an immediate, non-modal alert
    ///
    /// Used for unexpected transaction failures, which bypass the notification
    /// channel reserved for business-rule outcomes.
    fn alert(&self, message: &str) -> Pin<Box<dyn Future<Output = ()> + Send>>;
}

/// Shell event captured by [`RecordingShell`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// `close_payment_modal` was invoked
    ClosePaymentModal(bool),
    /// `alert` was invoked
    Alert(String),
}

/// Shell that records every signal (for development and testing)
#[derive(Debug, Default)]
pub struct RecordingShell {
    events: Mutex<Vec<ShellEvent>>,
}

#[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable in a mock
impl RecordingShell {
    /// Creates a new recording shell
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Signals received so far
    #[must_use]
    pub fn events(&self) -> Vec<ShellEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable in a mock
impl FlowShell for RecordingShell {
    fn close_payment_modal(&self, close: bool) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        tracing::info!(close, "Shell: close payment modal");
        self.events
            .lock()
            .unwrap()
            .push(ShellEvent::ClosePaymentModal(close));
        Box::pin(async {})
    }

    fn alert(&self, message: &str) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        tracing::info!(message, "Shell: alert");
        self.events
            .lock()
            .unwrap()
            .push(ShellEvent::Alert(message.to_string()));
        Box::pin(async {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_shell_captures_events_in_order() {
        let shell = RecordingShell::new();

        shell.alert("boom").await;
        shell.close_payment_modal(true).await;

        assert_eq!(
            shell.events(),
            vec![
                ShellEvent::Alert("boom".to_string()),
                ShellEvent::ClosePaymentModal(true),
            ]
        );
    }
}
