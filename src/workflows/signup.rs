//! Signup: account creation. Success does not auto-login; the user stays on
//! the signup view and logs in explicitly afterwards.

use crate::services::error::GatewayError;
use crate::services::gateway::AuthGateway;
use crate::utils::validation::{validate_email, validate_password};
use crate::workflows::Feedback;
use secrecy::{ExposeSecret, Secret};

pub struct SignupWorkflow {
    email: String,
    password: Secret<String>,
    confirm_password: Secret<String>,
    loading: bool,
    feedback: Feedback,
}

impl Default for SignupWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl SignupWorkflow {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: Secret::new(String::new()),
            confirm_password: Secret::new(String::new()),
            loading: false,
            feedback: Feedback::None,
        }
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Secret::new(password.into());
    }

    pub fn set_confirm_password(&mut self, password: impl Into<String>) {
        self.confirm_password = Secret::new(password.into());
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub async fn submit(&mut self, gateway: &dyn AuthGateway) {
        if self.loading {
            return;
        }

        if self.email.trim().is_empty()
            || self.password.expose_secret().trim().is_empty()
            || self.confirm_password.expose_secret().trim().is_empty()
        {
            self.feedback = Feedback::error("Please fill in all fields.");
            return;
        }
        if let Err(message) = validate_email(&self.email) {
            self.feedback = Feedback::error(message);
            return;
        }
        if let Err(message) = validate_password(self.password.expose_secret()) {
            self.feedback = Feedback::error(message);
            return;
        }
        if self.password.expose_secret() != self.confirm_password.expose_secret() {
            self.feedback = Feedback::error("Passwords do not match.");
            return;
        }

        self.feedback = Feedback::None;
        self.loading = true;
        let result = gateway
            .create_user(&self.email, self.password.expose_secret())
            .await;
        self.loading = false;

        match result {
            Ok(()) => {
                tracing::info!(email = %self.email, "User created");
                self.feedback = Feedback::info("User created successfully.");
            }
            Err(GatewayError::Credential(message)) if message.contains("Email already exists") => {
                self.feedback = Feedback::error(
                    "The email address is already taken. Please use a different email.",
                );
            }
            Err(e) => {
                tracing::warn!("Signup failed: {}", e);
                self.feedback = Feedback::error("An error occurred during signup.");
            }
        }
    }
}
