//! Login: single-step credential submission.

use crate::models::Identity;
use crate::routing::Route;
use crate::services::error::GatewayError;
use crate::services::gateway::AuthGateway;
use crate::services::session::SessionStore;
use crate::utils::validation::{validate_email, validate_password};
use crate::workflows::Feedback;
use secrecy::{ExposeSecret, Secret};

pub struct LoginWorkflow {
    email: String,
    password: Secret<String>,
    remember_me: bool,
    loading: bool,
    feedback: Feedback,
}

impl Default for LoginWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginWorkflow {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: Secret::new(String::new()),
            remember_me: false,
            loading: false,
            feedback: Feedback::None,
        }
    }

    /// Run once when the view mounts: an already-authenticated user skips
    /// the form entirely.
    pub fn on_mount(&self, sessions: &dyn SessionStore) -> Option<Route> {
        sessions.current().map(|_| Route::Home)
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Secret::new(password.into());
    }

    pub fn set_remember_me(&mut self, remember_me: bool) {
        self.remember_me = remember_me;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    /// Submit the credentials. Reached identically from the button and from
    /// Enter in either field. A second submission while one is pending is a
    /// no-op.
    pub async fn submit(
        &mut self,
        gateway: &dyn AuthGateway,
        sessions: &mut dyn SessionStore,
    ) -> Option<Route> {
        if self.loading {
            return None;
        }

        if self.email.trim().is_empty() || self.password.expose_secret().trim().is_empty() {
            self.feedback = Feedback::error("Please fill in all fields.");
            return None;
        }
        if let Err(message) = validate_email(&self.email) {
            self.feedback = Feedback::error(message);
            return None;
        }
        if let Err(message) = validate_password(self.password.expose_secret()) {
            self.feedback = Feedback::error(message);
            return None;
        }

        self.feedback = Feedback::None;
        self.loading = true;
        let result = gateway
            .check_user_login(
                &self.email,
                self.password.expose_secret(),
                self.remember_me,
            )
            .await;
        self.loading = false;

        match result {
            Ok(login) => {
                let identity = Identity {
                    id: login.id,
                    email: login.email,
                };
                if let Err(e) = sessions.set(identity) {
                    tracing::error!("Failed to persist session: {}", e);
                    self.feedback =
                        Feedback::error("Something went wrong. Please try again later.");
                    return None;
                }
                tracing::info!(email = %self.email, "User logged in");

                // An unverified account goes to the verification view first.
                if login.verified {
                    Some(Route::Home)
                } else {
                    Some(Route::VerifyAccount)
                }
            }
            Err(GatewayError::Credential(message)) if !message.trim().is_empty() => {
                self.feedback = Feedback::error(message);
                None
            }
            Err(e) => {
                tracing::warn!("Login rejected: {}", e);
                self.feedback = Feedback::error("Invalid email or password. Please try again.");
                None
            }
        }
    }
}
