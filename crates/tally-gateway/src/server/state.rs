//! Shared state of the HTTP ingress

use std::sync::Arc;

use tally_service::CommandRouter;

use crate::ingress::EventIngress;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    ingress: Arc<EventIngress>,
    commands: Arc<CommandRouter>,
}

impl AppState {
    pub fn new(ingress: EventIngress, commands: CommandRouter) -> Self {
        Self {
            ingress: Arc::new(ingress),
            commands: Arc::new(commands),
        }
    }

    /// Get the event ingress
    pub fn ingress(&self) -> &EventIngress {
        &self.ingress
    }

    /// Get the command router
    pub fn commands(&self) -> &CommandRouter {
        &self.commands
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("ingress", &self.ingress)
            .field("commands", &"CommandRouter")
            .finish()
    }
}
