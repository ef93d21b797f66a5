use serde::{Deserialize, Serialize};

/// The minimal authenticated-user record held by the session store.
///
/// Verification status is deliberately absent: it is always re-queried from
/// the gateway, never cached on the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

/// Tag disambiguating which downstream effect a correct verification code
/// triggers on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    Verify,
    Reset,
    Change,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Verify => "VERIFY",
            RequestType::Reset => "RESET",
            RequestType::Change => "CHANGE",
        }
    }
}

/// Successful login result reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub id: String,
    pub email: String,
    pub verified: bool,
}
