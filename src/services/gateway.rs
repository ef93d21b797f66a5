use crate::models::{LoginResponse, RequestType};
use crate::services::error::GatewayError;
use async_trait::async_trait;

/// The network boundary every workflow talks through.
///
/// The server is authoritative for credentials, code validity and expiry;
/// the client only maps its answers onto workflow state. Implementations
/// must apply the unauthorized-response rule: any call other than
/// `check_user_login` that observes a 401-equivalent yields
/// [`GatewayError::SessionExpired`].
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Create an account. A duplicate email surfaces as
    /// `GatewayError::Credential` carrying the server's message.
    async fn create_user(&self, email: &str, password: &str) -> Result<(), GatewayError>;

    /// Verify credentials and open a server-side session.
    async fn check_user_login(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<LoginResponse, GatewayError>;

    /// Look up a user id by email. `Ok(None)` is the sentinel negative
    /// answer (email unknown), modeled as data rather than an error.
    async fn check_email(&self, email: &str) -> Result<Option<String>, GatewayError>;

    async fn send_verification_code(
        &self,
        user_id: &str,
        request_type: RequestType,
    ) -> Result<(), GatewayError>;

    async fn validate_code(
        &self,
        user_id: &str,
        code: &str,
        request_type: RequestType,
    ) -> Result<(), GatewayError>;

    async fn update_password(&self, user_id: &str, new_password: &str)
        -> Result<(), GatewayError>;

    /// Whether the account's email is verified. A 404-equivalent answer maps
    /// to `GatewayError::NotFound` (the session points at a deleted user).
    async fn check_verification_status(&self, user_id: &str) -> Result<bool, GatewayError>;

    async fn logout(&self) -> Result<(), GatewayError>;
}
