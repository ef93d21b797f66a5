//! Home: the signed-in landing view. On mount it re-checks verification
//! status with the server, so a stale local assumption about the account
//! never survives a navigation here. An unverified account is warned and
//! offered a direct path into the verification view.

use crate::routing::Route;
use crate::services::error::GatewayError;
use crate::services::gateway::AuthGateway;
use crate::services::session::SessionStore;
use crate::workflows::expire_session;

pub struct HomeWorkflow {
    has_checked_once: bool,
    needs_verification: bool,
}

impl Default for HomeWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeWorkflow {
    pub fn new() -> Self {
        Self {
            has_checked_once: false,
            needs_verification: false,
        }
    }

    /// Whether the mounted account still has verification pending.
    pub fn needs_verification(&self) -> bool {
        self.needs_verification
    }

    /// Mount-time status check, guarded to fire at most once per workflow
    /// instance. The account stays on Home either way; an unverified one
    /// gets the warning affordance. Any failure to establish the status
    /// falls back to the login view rather than showing a possibly-wrong
    /// home state.
    pub async fn on_mount(
        &mut self,
        gateway: &dyn AuthGateway,
        sessions: &mut dyn SessionStore,
    ) -> Option<Route> {
        let Some(identity) = sessions.current() else {
            return Some(Route::Login);
        };

        if self.has_checked_once {
            return None;
        }
        self.has_checked_once = true;

        match gateway.check_verification_status(&identity.id).await {
            Ok(true) => None,
            Ok(false) => {
                self.needs_verification = true;
                None
            }
            Err(GatewayError::SessionExpired) => expire_session(sessions),
            Err(e) => {
                tracing::warn!("Verification status check failed: {}", e);
                Some(Route::Login)
            }
        }
    }

    /// The "verify now" affordance shown with the warning.
    pub fn verify_now(&self) -> Option<Route> {
        self.needs_verification.then_some(Route::VerifyAccount)
    }
}
