//! Email verification: request a 6-digit code, redeem it, land on home.
//!
//! The view owns a send cooldown and a post-success redirect countdown; both
//! advance only through [`VerifyWorkflow::tick`], which the shell drives once
//! per second. Dropping the workflow therefore stops every timer with it.

use crate::models::RequestType;
use crate::routing::Route;
use crate::services::error::GatewayError;
use crate::services::gateway::AuthGateway;
use crate::services::session::SessionStore;
use crate::utils::validation::validate_verification_code;
use crate::workflows::{expire_session, Feedback};

/// Seconds the send affordance stays disabled after a successful send.
pub const SEND_COOLDOWN_SECONDS: u32 = 60;
/// Seconds between a successful redemption and the automatic redirect.
pub const REDIRECT_DELAY_SECONDS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyStage {
    /// Initial status check is in flight.
    Checking,
    /// No code sent yet; the send affordance is primary.
    AwaitSend,
    /// A code has been sent; the redeem affordance is primary.
    AwaitCode,
    /// Code accepted; counting down to home.
    Success,
}

pub struct VerifyWorkflow {
    stage: VerifyStage,
    has_checked_once: bool,
    sending: bool,
    verifying: bool,
    feedback: Feedback,
    code: String,
    code_error: Option<&'static str>,
    cooldown_remaining: u32,
    redirect_remaining: u32,
}

impl Default for VerifyWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl VerifyWorkflow {
    pub fn new() -> Self {
        Self {
            stage: VerifyStage::Checking,
            has_checked_once: false,
            sending: false,
            verifying: false,
            feedback: Feedback::None,
            code: String::new(),
            code_error: None,
            cooldown_remaining: 0,
            redirect_remaining: 0,
        }
    }

    pub fn stage(&self) -> VerifyStage {
        self.stage
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn code_error(&self) -> Option<&'static str> {
        self.code_error
    }

    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown_remaining
    }

    /// Whether the send affordance is currently enabled.
    pub fn can_send(&self) -> bool {
        self.cooldown_remaining == 0 && !self.sending
    }

    /// Mount-time status check, guarded to fire at most once per workflow
    /// instance no matter how often the view re-enters it. The guard resets
    /// only by constructing a fresh workflow on the next navigation.
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
            Ok(true) => Some(Route::Home),
            Ok(false) => {
                self.stage = VerifyStage::AwaitSend;
                None
            }
            // The session points at a user the server no longer knows.
            Err(GatewayError::NotFound) => Some(Route::Login),
            Err(GatewayError::SessionExpired) => expire_session(sessions),
            Err(e) => {
                // Show the form rather than trapping the user behind a
                // spinner; sending a code will surface its own errors.
                tracing::warn!("Verification status check failed: {}", e);
                self.stage = VerifyStage::AwaitSend;
                None
            }
        }
    }

    /// Request a verification code. Disabled while the cooldown runs or a
    /// send is in flight. A failed send cancels the cooldown so the user can
    /// retry immediately.
    pub async fn send_code(
        &mut self,
        gateway: &dyn AuthGateway,
        sessions: &mut dyn SessionStore,
    ) -> Option<Route> {
        if !self.can_send() {
            return None;
        }
        let Some(identity) = sessions.current() else {
            return Some(Route::Login);
        };

        self.feedback = Feedback::None;
        self.sending = true;
        self.cooldown_remaining = SEND_COOLDOWN_SECONDS;
        let result = gateway
            .send_verification_code(&identity.id, RequestType::Verify)
            .await;
        self.sending = false;

        match result {
            Ok(()) => {
                self.feedback = Feedback::info("Verification email has been sent successfully.");
                if self.stage == VerifyStage::AwaitSend {
                    self.stage = VerifyStage::AwaitCode;
                }
                None
            }
            Err(GatewayError::SessionExpired) => expire_session(sessions),
            Err(e) => {
                tracing::warn!("Failed to send verification code: {}", e);
                self.feedback =
                    Feedback::error("Failed to send the verification email. Please try again.");
                self.cooldown_remaining = 0;
                None
            }
        }
    }

    /// Edit the candidate code; clears the inline field error.
    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
        self.code_error = None;
    }

    /// Redeem the entered code. Only reachable once a code has actually been
    /// sent; before that the input is not on offer. No client-side retry
    /// limit: on rejection the input stays editable and the stage does not
    /// move.
    pub async fn submit_code(
        &mut self,
        gateway: &dyn AuthGateway,
        sessions: &mut dyn SessionStore,
    ) -> Option<Route> {
        if self.verifying || self.stage != VerifyStage::AwaitCode {
            return None;
        }
        if let Err(message) = validate_verification_code(&self.code) {
            self.code_error = Some(message);
            return None;
        }
        let Some(identity) = sessions.current() else {
            return Some(Route::Login);
        };

        self.verifying = true;
        let result = gateway
            .validate_code(&identity.id, &self.code, RequestType::Verify)
            .await;
        self.verifying = false;

        match result {
            Ok(()) => {
                self.stage = VerifyStage::Success;
                self.redirect_remaining = REDIRECT_DELAY_SECONDS;
                self.feedback =
                    Feedback::info("Verification successful! Redirecting in 5 seconds...");
                None
            }
            Err(GatewayError::SessionExpired) => expire_session(sessions),
            Err(GatewayError::Code(message)) if !message.trim().is_empty() => {
                self.feedback = Feedback::error(message);
                None
            }
            Err(e) => {
                tracing::warn!("Code validation failed: {}", e);
                self.feedback = Feedback::error("Verification failed. Please try again.");
                None
            }
        }
    }

    /// One simulated second. Drives the send cooldown and, after success,
    /// the redirect countdown.
    pub fn tick(&mut self) -> Option<Route> {
        if self.cooldown_remaining > 0 {
            self.cooldown_remaining -= 1;
        }
        if self.stage == VerifyStage::Success && self.redirect_remaining > 0 {
            self.redirect_remaining -= 1;
            if self.redirect_remaining == 0 {
                return Some(Route::Home);
            }
        }
        None
    }

    /// Immediate redirect affordance shown after a successful redemption.
    pub fn skip_wait(&self) -> Option<Route> {
        (self.stage == VerifyStage::Success).then_some(Route::Home)
    }
}
