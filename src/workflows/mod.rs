//! Per-view workflow state machines.
//!
//! Each workflow is constructed when its view mounts and dropped when the
//! user navigates away; no workflow state survives navigation. Methods that
//! talk to the gateway return `Option<Route>` — a navigation request the
//! shell acts on, or `None` to stay put.

pub mod home;
pub mod login;
pub mod reset;
pub mod signup;
pub mod verify;

use crate::routing::Route;
use crate::services::session::SessionStore;

/// Exactly one of an error or an informational message is shown at a time
/// per workflow; assigning a new value replaces whatever was there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Feedback {
    #[default]
    None,
    Error(String),
    Info(String),
}

impl Feedback {
    pub fn error(message: impl Into<String>) -> Self {
        Feedback::Error(message.into())
    }

    pub fn info(message: impl Into<String>) -> Self {
        Feedback::Info(message.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Feedback::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Feedback::None => None,
            Feedback::Error(m) | Feedback::Info(m) => Some(m),
        }
    }
}

/// Uniform handling for an unauthorized reply on any authenticated call:
/// drop the local identity and land on the login view. Never silent.
pub(crate) fn expire_session(sessions: &mut dyn SessionStore) -> Option<Route> {
    if let Err(e) = sessions.clear() {
        tracing::error!("Failed to clear expired session: {}", e);
    }
    tracing::warn!("Session expired, redirecting to login");
    Some(Route::Login)
}
