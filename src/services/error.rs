use thiserror::Error;

/// Failures surfaced by the remote auth gateway.
///
/// `SessionExpired` is raised uniformly by the response-inspection layer for
/// any unauthorized reply outside the login call itself; workflows handle it
/// by clearing the session and redirecting to login rather than locally.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("session expired")]
    SessionExpired,

    /// Rejected login or signup, carrying the server-provided message.
    #[error("{0}")]
    Credential(String),

    /// Invalid or expired verification code, carrying the server message.
    #[error("{0}")]
    Code(String),

    /// The server no longer knows the user the local session points at.
    #[error("not found")]
    NotFound,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Failures of the persisted session file.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file format: {0}")]
    Format(#[from] serde_json::Error),
}
