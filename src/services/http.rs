//! reqwest-backed gateway implementation.
//!
//! All authenticated state lives in the server session cookie; the client
//! carries it via the cookie store. Unauthorized and not-found replies are
//! mapped in one place so every call site sees the same taxonomy.

use crate::config::GatewaySettings;
use crate::models::{LoginResponse, RequestType};
use crate::services::error::GatewayError;
use crate::services::gateway::AuthGateway;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(settings: &GatewaySettings) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
        })
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<Response, GatewayError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            tracing::error!("POST {} failed: {}", url, e);
            GatewayError::Transport(e)
        })?;

        Ok(response)
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response, GatewayError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("GET {} failed: {}", url, e);
                GatewayError::Transport(e)
            })?;

        Ok(response)
    }
}

/// Unauthorized check applied to every call except login, where a 401 means
/// "wrong password" rather than a dead session.
fn ensure_authorized(response: &Response) -> Result<(), GatewayError> {
    if response.status() == StatusCode::UNAUTHORIZED {
        Err(GatewayError::SessionExpired)
    } else {
        Ok(())
    }
}

async fn body_message(response: Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(text) if !text.trim().is_empty() => text,
        _ => format!("status {status}"),
    }
}

/// Server ids arrive as JSON numbers or strings depending on endpoint.
fn id_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl AuthGateway for HttpGateway {
    async fn create_user(&self, email: &str, password: &str) -> Result<(), GatewayError> {
        let response = self
            .post(
                "/authentication/create-user",
                serde_json::json!({ "email": email, "password": password }),
            )
            .await?;
        ensure_authorized(&response)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(GatewayError::Credential(body_message(response).await))
        }
    }

    async fn check_user_login(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<LoginResponse, GatewayError> {
        let response = self
            .post(
                "/authentication/check-user-login",
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "rememberMe": remember_me,
                }),
            )
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Credential(body_message(response).await));
        }

        let body: serde_json::Value = response.json().await?;
        let id = id_string(&body["id"])
            .ok_or_else(|| GatewayError::Unexpected("login response missing id".to_string()))?;
        let email = body["email"].as_str().unwrap_or(email).to_string();
        let verified = body["verified"].as_bool().unwrap_or(false);

        Ok(LoginResponse {
            id,
            email,
            verified,
        })
    }

    async fn check_email(&self, email: &str) -> Result<Option<String>, GatewayError> {
        let response = self
            .get("/authentication/check-email", &[("email", email)])
            .await?;
        ensure_authorized(&response)?;

        // The sentinel negative answer arrives either as a 404 or as -1.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(GatewayError::Unexpected(body_message(response).await));
        }

        let body: serde_json::Value = response.json().await?;
        Ok(id_string(&body).filter(|id| id != "-1"))
    }

    async fn send_verification_code(
        &self,
        user_id: &str,
        request_type: RequestType,
    ) -> Result<(), GatewayError> {
        let response = self
            .post(
                "/verification-code-manager/create-code",
                serde_json::json!({ "userId": user_id, "requestType": request_type.as_str() }),
            )
            .await?;
        ensure_authorized(&response)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(GatewayError::Unexpected(body_message(response).await))
        }
    }

    async fn validate_code(
        &self,
        user_id: &str,
        code: &str,
        request_type: RequestType,
    ) -> Result<(), GatewayError> {
        let response = self
            .post(
                "/verification-code-manager/validate",
                serde_json::json!({
                    "userId": user_id,
                    "verificationCode": code,
                    "requestType": request_type.as_str(),
                }),
            )
            .await?;
        ensure_authorized(&response)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(GatewayError::Code(body_message(response).await))
        }
    }

    async fn update_password(
        &self,
        user_id: &str,
        new_password: &str,
    ) -> Result<(), GatewayError> {
        let response = self
            .post(
                "/authentication/update-password",
                serde_json::json!({ "id": user_id, "newPassword": new_password }),
            )
            .await?;
        ensure_authorized(&response)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(GatewayError::Unexpected(body_message(response).await))
        }
    }

    async fn check_verification_status(&self, user_id: &str) -> Result<bool, GatewayError> {
        let response = self
            .get(
                &format!("/verification-code-manager/is-verified/{user_id}"),
                &[],
            )
            .await?;
        ensure_authorized(&response)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound);
        }
        if !response.status().is_success() {
            return Err(GatewayError::Unexpected(body_message(response).await));
        }

        let verified: bool = response.json().await?;
        Ok(verified)
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        let response = self
            .post("/authentication/logout", serde_json::json!({}))
            .await?;
        ensure_authorized(&response)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(GatewayError::Unexpected(body_message(response).await))
        }
    }
}
