//! Client for the backend's login and registration endpoints.
//!
//! The backend owns accounts and credential verification; this client
//! only carries requests across and hands the returned user object to
//! [`TabSession::authenticate`](crate::session::TabSession::authenticate).
//! Network failures surface as rejected operations with a readable
//! message; there is no automatic retry.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use validator::Validate;

use eventhub_core::config::backend::BackendConfig;
use eventhub_core::error::AppError;
use eventhub_core::result::AppResult;
use eventhub_core::types::IdentityPayload;

/// Registration form submitted to `POST /users/register`.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Given name.
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    /// Family name.
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    /// Account email, also the login identifier.
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    /// Account password.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Contact number.
    #[validate(length(min = 1, message = "Mobile number is required"))]
    pub mobile: String,
    /// Student id, for student accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    /// Department, for student accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Envelope returned by both auth endpoints.
#[derive(Debug, Clone, Deserialize)]
struct AuthResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    user: Option<IdentityPayload>,
}

/// REST client for the event backend's user endpoints.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    /// Create a client for the configured backend.
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    eventhub_core::error::ErrorKind::Internal,
                    format!("Failed to build HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Authenticate credentials against `POST /users/login`.
    ///
    /// Returns the backend's user object on success. The caller feeds it
    /// into the tab session; this client persists nothing.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<IdentityPayload> {
        let url = format!("{}/users/login", self.base_url);
        debug!(%url, email, "Logging in");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    eventhub_core::error::ErrorKind::ExternalService,
                    format!("Login request failed: {e}"),
                    e,
                )
            })?;

        self.unwrap_user(response, "Login failed").await
    }

    /// Create an account via `POST /users/register`.
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<IdentityPayload> {
        request
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let url = format!("{}/users/register", self.base_url);
        debug!(%url, email = %request.email, "Registering");

        let response = self.http.post(&url).json(request).send().await.map_err(|e| {
            AppError::with_source(
                eventhub_core::error::ErrorKind::ExternalService,
                format!("Registration request failed: {e}"),
                e,
            )
        })?;

        self.unwrap_user(response, "Registration failed").await
    }

    /// Decode the auth envelope and extract the user object, mapping
    /// backend rejections to authentication errors carrying the
    /// backend's message.
    async fn unwrap_user(
        &self,
        response: reqwest::Response,
        fallback: &str,
    ) -> AppResult<IdentityPayload> {
        let status = response.status();
        let body: AuthResponse = response.json().await.map_err(|e| {
            warn!(%status, error = %e, "Unreadable auth response");
            AppError::with_source(
                eventhub_core::error::ErrorKind::ExternalService,
                format!("Unreadable response from backend ({status}): {e}"),
                e,
            )
        })?;

        if !body.success {
            return Err(AppError::authentication(
                body.message.unwrap_or_else(|| fallback.to_string()),
            ));
        }

        body.user
            .ok_or_else(|| AppError::authentication(format!("{fallback}: no user returned")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@x.test".to_string(),
            password: "hunter22".to_string(),
            mobile: "0400000000".to_string(),
            student_id: Some("s123".to_string()),
            department: None,
        }
    }

    #[test]
    fn test_register_request_validates() {
        assert!(register_request().validate().is_ok());

        let mut bad_email = register_request();
        bad_email.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());

        let mut short_password = register_request();
        short_password.password = "abc".to_string();
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_auth_response_decodes_backend_shapes() {
        let ok: AuthResponse = serde_json::from_str(
            r#"{
                "success": true,
                "message": "Login successful",
                "user": {
                    "id": "64f0",
                    "email": "a@x.test",
                    "fullName": "Ada Lovelace",
                    "role": "coordinator",
                    "mobile": "0400000000"
                }
            }"#,
        )
        .unwrap();
        assert!(ok.success);
        assert_eq!(ok.user.unwrap().role, "coordinator");

        let rejected: AuthResponse =
            serde_json::from_str(r#"{"success":false,"message":"Invalid email or password"}"#)
                .unwrap();
        assert!(!rejected.success);
        assert!(rejected.user.is_none());
    }
}
