pub mod config;
pub mod models;
pub mod observability;
pub mod routing;
pub mod services;
pub mod shell;
pub mod utils;
pub mod workflows;

use services::gateway::AuthGateway;
use services::session::SessionStore;
use std::sync::Arc;

/// Shared application state: the remote gateway plus the one cross-workflow
/// mutable resource, the session store.
pub struct App {
    pub gateway: Arc<dyn AuthGateway>,
    pub sessions: Box<dyn SessionStore>,
}

impl App {
    pub fn new(gateway: Arc<dyn AuthGateway>, sessions: Box<dyn SessionStore>) -> Self {
        Self { gateway, sessions }
    }
}
