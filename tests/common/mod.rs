//! Common test utilities: a scripted gateway double and fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use portal_client::models::{Identity, LoginResponse, RequestType};
use portal_client::services::error::GatewayError;
use portal_client::services::gateway::AuthGateway;
use portal_client::services::session::{MemorySessionStore, SessionStore};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Gateway double driven by queued responses. Every call pops the next
/// scripted result for its operation; an unscripted call panics, which
/// doubles as the assertion that no unexpected network traffic happens.
#[derive(Default)]
pub struct MockGateway {
    create_user_results: Mutex<VecDeque<Result<(), GatewayError>>>,
    login_results: Mutex<VecDeque<Result<LoginResponse, GatewayError>>>,
    check_email_results: Mutex<VecDeque<Result<Option<String>, GatewayError>>>,
    send_code_results: Mutex<VecDeque<Result<(), GatewayError>>>,
    validate_code_results: Mutex<VecDeque<Result<(), GatewayError>>>,
    update_password_results: Mutex<VecDeque<Result<(), GatewayError>>>,
    status_results: Mutex<VecDeque<Result<bool, GatewayError>>>,

    pub status_calls: AtomicUsize,
    pub send_code_calls: Mutex<Vec<(String, RequestType)>>,
    pub validate_code_calls: Mutex<Vec<(String, String, RequestType)>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_create_user(&self, result: Result<(), GatewayError>) {
        self.create_user_results.lock().unwrap().push_back(result);
    }

    pub fn queue_login(&self, result: Result<LoginResponse, GatewayError>) {
        self.login_results.lock().unwrap().push_back(result);
    }

    pub fn queue_check_email(&self, result: Result<Option<String>, GatewayError>) {
        self.check_email_results.lock().unwrap().push_back(result);
    }

    pub fn queue_send_code(&self, result: Result<(), GatewayError>) {
        self.send_code_results.lock().unwrap().push_back(result);
    }

    pub fn queue_validate_code(&self, result: Result<(), GatewayError>) {
        self.validate_code_results.lock().unwrap().push_back(result);
    }

    pub fn queue_update_password(&self, result: Result<(), GatewayError>) {
        self.update_password_results.lock().unwrap().push_back(result);
    }

    pub fn queue_status(&self, result: Result<bool, GatewayError>) {
        self.status_results.lock().unwrap().push_back(result);
    }

    fn take<T>(
        queue: &Mutex<VecDeque<Result<T, GatewayError>>>,
        operation: &str,
    ) -> Result<T, GatewayError> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected {operation} call"))
    }
}

#[async_trait]
impl AuthGateway for MockGateway {
    async fn create_user(&self, _email: &str, _password: &str) -> Result<(), GatewayError> {
        Self::take(&self.create_user_results, "create_user")
    }

    async fn check_user_login(
        &self,
        _email: &str,
        _password: &str,
        _remember_me: bool,
    ) -> Result<LoginResponse, GatewayError> {
        Self::take(&self.login_results, "check_user_login")
    }

    async fn check_email(&self, _email: &str) -> Result<Option<String>, GatewayError> {
        Self::take(&self.check_email_results, "check_email")
    }

    async fn send_verification_code(
        &self,
        user_id: &str,
        request_type: RequestType,
    ) -> Result<(), GatewayError> {
        self.send_code_calls
            .lock()
            .unwrap()
            .push((user_id.to_string(), request_type));
        Self::take(&self.send_code_results, "send_verification_code")
    }

    async fn validate_code(
        &self,
        user_id: &str,
        code: &str,
        request_type: RequestType,
    ) -> Result<(), GatewayError> {
        self.validate_code_calls.lock().unwrap().push((
            user_id.to_string(),
            code.to_string(),
            request_type,
        ));
        Self::take(&self.validate_code_results, "validate_code")
    }

    async fn update_password(
        &self,
        _user_id: &str,
        _new_password: &str,
    ) -> Result<(), GatewayError> {
        Self::take(&self.update_password_results, "update_password")
    }

    async fn check_verification_status(&self, _user_id: &str) -> Result<bool, GatewayError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Self::take(&self.status_results, "check_verification_status")
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}

pub fn identity() -> Identity {
    Identity {
        id: "42".to_string(),
        email: "a@b.com".to_string(),
    }
}

pub fn login_response(verified: bool) -> LoginResponse {
    LoginResponse {
        id: "42".to_string(),
        email: "a@b.com".to_string(),
        verified,
    }
}

/// A store already holding the fixture identity.
pub fn session_with_identity() -> MemorySessionStore {
    let mut sessions = MemorySessionStore::new();
    sessions.set(identity()).unwrap();
    sessions
}
