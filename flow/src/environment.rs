//! Environment trait for the ticket flow reducer.

use crate::gateway::BoxOffice;
use crate::shell::FlowShell;
use std::sync::Arc;
use ticketflow_core::environment::Clock;

/// Environment dependencies for the ticket flow reducer.
///
/// Dependency injection via traits: the reducer only names the collaborators,
/// and different implementations can be provided for production, testing, etc.
/// The gateway and shell are handed out as `Arc` clones because effects move
/// them into spawned futures.
pub trait TicketFlowEnvironment: Send + Sync {
    /// The backing ticketing service.
    fn box_office(&self) -> Arc<dyn BoxOffice>;

    /// The container shell receiving close and alert signals.
    fn shell(&self) -> Arc<dyn FlowShell>;

    /// Clock for getting current time.
    ///
    /// Production uses `SystemClock`, tests use `FixedClock`.
    fn clock(&self) -> &dyn Clock;
}

/// Production environment for the ticket flow.
#[derive(Clone)]
pub struct ProductionTicketFlowEnvironment {
    box_office: Arc<dyn BoxOffice>,
    shell: Arc<dyn FlowShell>,
    clock: Arc<dyn Clock>,
}

impl ProductionTicketFlowEnvironment {
    /// Create a new production environment.
    #[must_use]
    pub fn new(
        box_office: Arc<dyn BoxOffice>,
        shell: Arc<dyn FlowShell>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            box_office,
            shell,
            clock,
        }
    }
}

impl TicketFlowEnvironment for ProductionTicketFlowEnvironment {
    fn box_office(&self) -> Arc<dyn BoxOffice> {
        Arc::clone(&self.box_office)
    }

    fn shell(&self) -> Arc<dyn FlowShell> {
        Arc::clone(&self.shell)
    }

    fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}
