use crate::domain::models::*;
use crate::domain::traits::IdentityProvider;
use crate::infrastructure::http;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Email/password accounts through the Identity Toolkit REST API.
pub struct ReqwestIdentityProvider {
    api_key: String,
    base_url: String,
    http_client: Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
    #[serde(default)]
    refresh_token: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl ReqwestIdentityProvider {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.identity_base_url.clone(),
            http_client: http::build_client(config.http_timeout_secs)?,
        })
    }

    async fn password_request(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> AppResult<AuthSession> {
        let action = format!("accounts:{}", method);
        let url = http::endpoint(&self.base_url, &["v1", action.as_str()])?;
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };

        let response = self
            .http_client
            .post(url)
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::warn!("Identity request {} failed to send: {}", method, e);
                AppError::Identity(ProviderErrorCode::new(
                    ProviderErrorCode::NETWORK_REQUEST_FAILED,
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorEnvelope>().await {
                Ok(envelope) => envelope.error.message,
                Err(_) => status.to_string(),
            };
            log::debug!("Identity request {} rejected: {} {}", method, status, message);
            return Err(AppError::Identity(code_for_message(&message)));
        }

        let account: AccountResponse = response.json().await.map_err(|e| {
            log::error!("Unreadable identity response for {}: {}", method, e);
            AppError::Identity(ProviderErrorCode::new(ProviderErrorCode::INTERNAL_ERROR))
        })?;

        Ok(AuthSession {
            uid: account.local_id,
            email: account.email.unwrap_or_else(|| email.to_string()),
            id_token: account.id_token,
            refresh_token: account.refresh_token,
        })
    }
}

/// Maps an Identity Toolkit error message (e.g. `EMAIL_EXISTS` or
/// `WEAK_PASSWORD : Password should be at least 6 characters`) to the
/// `auth/...` code used for notifications.
pub fn code_for_message(message: &str) -> ProviderErrorCode {
    if message.starts_with("API key not valid") {
        return ProviderErrorCode::new("auth/invalid-api-key");
    }
    let head = message.split([' ', ':']).next().unwrap_or_default();
    let code = match head {
        "EMAIL_EXISTS" => "auth/email-already-in-use",
        "INVALID_EMAIL" => "auth/invalid-email",
        "WEAK_PASSWORD" => "auth/weak-password",
        "MISSING_PASSWORD" => "auth/missing-password",
        "MISSING_EMAIL" => "auth/missing-email",
        "EMAIL_NOT_FOUND" => "auth/user-not-found",
        "INVALID_PASSWORD" => "auth/wrong-password",
        "INVALID_LOGIN_CREDENTIALS" => "auth/invalid-credential",
        "USER_DISABLED" => "auth/user-disabled",
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "auth/too-many-requests",
        "OPERATION_NOT_ALLOWED" => "auth/operation-not-allowed",
        "API_KEY_INVALID" => "auth/invalid-api-key",
        _ => ProviderErrorCode::INTERNAL_ERROR,
    };
    ProviderErrorCode::new(code)
}

#[async_trait]
impl IdentityProvider for ReqwestIdentityProvider {
    async fn register(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        self.password_request("signUp", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        self.password_request("signInWithPassword", email, password).await
    }
}
