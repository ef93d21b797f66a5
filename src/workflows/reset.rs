//! Password recovery: a linear three-stage flow. Each stage is gated on the
//! previous one succeeding; there is no backward transition short of
//! constructing a fresh workflow.

use crate::models::RequestType;
use crate::routing::Route;
use crate::services::error::GatewayError;
use crate::services::gateway::AuthGateway;
use crate::services::session::SessionStore;
use crate::utils::validation::{validate_email, validate_password, validate_verification_code};
use crate::workflows::verify::REDIRECT_DELAY_SECONDS;
use crate::workflows::{expire_session, Feedback};
use secrecy::{ExposeSecret, Secret};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStage {
    EmailEntry,
    CodeEntry,
    PasswordEntry,
    /// Password changed; counting down to login.
    Done,
}

pub struct ResetWorkflow {
    stage: ResetStage,
    email: String,
    code: String,
    new_password: Secret<String>,
    confirm_password: Secret<String>,
    user_id: Option<String>,
    loading: bool,
    feedback: Feedback,
    redirect_remaining: u32,
}

impl Default for ResetWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl ResetWorkflow {
    pub fn new() -> Self {
        Self {
            stage: ResetStage::EmailEntry,
            email: String::new(),
            code: String::new(),
            new_password: Secret::new(String::new()),
            confirm_password: Secret::new(String::new()),
            user_id: None,
            loading: false,
            feedback: Feedback::None,
            redirect_remaining: 0,
        }
    }

    pub fn stage(&self) -> ResetStage {
        self.stage
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    pub fn set_new_password(&mut self, password: impl Into<String>) {
        self.new_password = Secret::new(password.into());
    }

    pub fn set_confirm_password(&mut self, password: impl Into<String>) {
        self.confirm_password = Secret::new(password.into());
    }

    /// Stage 1: confirm the email exists, then request a reset code. Once
    /// the email is confirmed the stage advances even if the send itself
    /// fails — the failure is reported and the user can re-enter the flow.
    pub async fn submit_email(
        &mut self,
        gateway: &dyn AuthGateway,
        sessions: &mut dyn SessionStore,
    ) -> Option<Route> {
        if self.loading || self.stage != ResetStage::EmailEntry {
            return None;
        }
        self.feedback = Feedback::None;
        if let Err(message) = validate_email(&self.email) {
            self.feedback = Feedback::error(message);
            return None;
        }

        self.loading = true;
        let looked_up = gateway.check_email(&self.email).await;

        let outcome = match looked_up {
            Ok(Some(user_id)) => {
                self.user_id = Some(user_id.clone());
                self.stage = ResetStage::CodeEntry;

                match gateway
                    .send_verification_code(&user_id, RequestType::Reset)
                    .await
                {
                    Ok(()) => {
                        self.feedback =
                            Feedback::info("A verification code has been sent to your email.");
                        None
                    }
                    Err(GatewayError::SessionExpired) => expire_session(sessions),
                    Err(e) => {
                        // Email existence is already confirmed; the stage
                        // stays advanced and only the send failure is shown.
                        tracing::warn!("Failed to send reset code: {}", e);
                        self.feedback =
                            Feedback::error("Something went wrong. Please try again later.");
                        None
                    }
                }
            }
            Ok(None) => {
                self.feedback =
                    Feedback::error("Email does not exist in our system. Please try again.");
                None
            }
            Err(GatewayError::SessionExpired) => expire_session(sessions),
            Err(e) => {
                tracing::warn!("Email lookup failed: {}", e);
                self.feedback = Feedback::error("Something went wrong. Please try again later.");
                None
            }
        };
        self.loading = false;
        outcome
    }

    /// Stage 2: redeem the reset code.
    pub async fn submit_code(
        &mut self,
        gateway: &dyn AuthGateway,
        sessions: &mut dyn SessionStore,
    ) -> Option<Route> {
        if self.loading || self.stage != ResetStage::CodeEntry {
            return None;
        }
        self.feedback = Feedback::None;
        if let Err(message) = validate_verification_code(&self.code) {
            self.feedback = Feedback::error(message);
            return None;
        }
        let Some(user_id) = self.user_id.clone() else {
            return None;
        };

        self.loading = true;
        let result = gateway
            .validate_code(&user_id, &self.code, RequestType::Reset)
            .await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.feedback = Feedback::info("Verification code is valid.");
                self.stage = ResetStage::PasswordEntry;
                None
            }
            Err(GatewayError::SessionExpired) => expire_session(sessions),
            Err(e) => {
                tracing::warn!("Reset code rejected: {}", e);
                self.feedback =
                    Feedback::error("Invalid or expired verification code. Please try again.");
                None
            }
        }
    }

    /// Stage 3: set the new password, then count down to login.
    pub async fn submit_password(
        &mut self,
        gateway: &dyn AuthGateway,
        sessions: &mut dyn SessionStore,
    ) -> Option<Route> {
        if self.loading || self.stage != ResetStage::PasswordEntry {
            return None;
        }
        self.feedback = Feedback::None;
        if let Err(message) = validate_password(self.new_password.expose_secret()) {
            self.feedback = Feedback::error(message);
            return None;
        }
        if self.new_password.expose_secret() != self.confirm_password.expose_secret() {
            self.feedback = Feedback::error("Passwords do not match.");
            return None;
        }
        let Some(user_id) = self.user_id.clone() else {
            return None;
        };

        self.loading = true;
        let result = gateway
            .update_password(&user_id, self.new_password.expose_secret())
            .await;
        self.loading = false;

        match result {
            Ok(()) => {
                tracing::info!("Password updated");
                self.feedback = Feedback::info(
                    "Password updated successfully. You will be redirected to the login page in 5 seconds.",
                );
                self.stage = ResetStage::Done;
                self.redirect_remaining = REDIRECT_DELAY_SECONDS;
                None
            }
            Err(GatewayError::SessionExpired) => expire_session(sessions),
            Err(e) => {
                tracing::warn!("Password update failed: {}", e);
                self.feedback = Feedback::error("Failed to update password. Please try again.");
                None
            }
        }
    }

    /// One simulated second of the post-update countdown.
    pub fn tick(&mut self) -> Option<Route> {
        if self.stage == ResetStage::Done && self.redirect_remaining > 0 {
            self.redirect_remaining -= 1;
            if self.redirect_remaining == 0 {
                return Some(Route::Login);
            }
        }
        None
    }

    /// Manual affordance shown alongside the countdown.
    pub fn skip_wait(&self) -> Option<Route> {
        (self.stage == ResetStage::Done).then_some(Route::Login)
    }
}
