//! Route definitions and the session-presence guard.

use crate::services::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Home,
    VerifyAccount,
    ForgotPassword,
}

impl Route {
    /// Protected views require a present identity before construction.
    pub fn is_protected(self) -> bool {
        matches!(self, Route::Home | Route::VerifyAccount)
    }
}

/// Evaluated synchronously before a view is constructed: a protected route
/// without a session resolves to the login entry point, so no protected
/// network call can fire ahead of the decision.
pub fn guard(route: Route, sessions: &dyn SessionStore) -> Route {
    if route.is_protected() && sessions.current().is_none() {
        tracing::debug!(?route, "no session, redirecting to login");
        Route::Login
    } else {
        route
    }
}
