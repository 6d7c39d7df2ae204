use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const USERS_COLLECTION: &str = "users";
pub const LOCAL_AUTH_PROVIDER: &str = "local";
pub const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Identity provider error: {0}")]
    Identity(ProviderErrorCode),
    #[error("Document store error: {0}")]
    Store(String),
    #[error("Profile for account {uid} was not written: {reason}")]
    ProfileWrite { uid: String, reason: String },
    #[error("Catalog API error: {0}")]
    Catalog(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Text suitable for a toast. Identity failures are reduced to the
    /// provider's reason, everything else uses the display form.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Identity(code) => code.notification_text(),
            AppError::ProfileWrite { .. } => "could not save profile".to_string(),
            other => other.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Structured identity error code of the form `<namespace>/<reason-with-dashes>`,
/// e.g. `auth/email-already-in-use`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderErrorCode(String);

impl ProviderErrorCode {
    pub const NETWORK_REQUEST_FAILED: &'static str = "auth/network-request-failed";
    pub const INTERNAL_ERROR: &'static str = "auth/internal-error";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `auth/email-already-in-use` becomes `email already in use`.
    pub fn notification_text(&self) -> String {
        let reason = self.0.split('/').nth(1).unwrap_or(self.0.as_str());
        reason.split('-').collect::<Vec<_>>().join(" ")
    }
}

impl std::fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub uid: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "authProvider")]
    pub auth_provider: String,
}

impl UserProfile {
    pub fn local(uid: String, name: String, email: String) -> Self {
        Self {
            uid,
            name,
            email,
            auth_provider: LOCAL_AUTH_PROVIDER.to_string(),
        }
    }

    pub fn to_fields(&self) -> DocumentFields {
        BTreeMap::from([
            ("uid".to_string(), self.uid.clone()),
            ("name".to_string(), self.name.clone()),
            ("authProvider".to_string(), self.auth_provider.clone()),
            ("email".to_string(), self.email.clone()),
        ])
    }
}

/// String-valued document fields, keyed by field name.
pub type DocumentFields = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRef {
    /// Full resource path, e.g. `projects/p/databases/(default)/documents/users/abc`.
    pub name: String,
    pub id: String,
}

impl DocumentRef {
    pub fn from_name(name: String) -> Self {
        let id = name.rsplit('/').next().unwrap_or_default().to_string();
        Self { name, id }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct TrailerMetadata {
    pub name: String,
    pub key: String,
    pub published_at: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

impl TrailerMetadata {
    pub fn embed_url(&self) -> String {
        format!("{}{}", YOUTUBE_EMBED_BASE, self.key)
    }

    /// First ten characters of the publish timestamp (the calendar date).
    pub fn published_date(&self) -> String {
        self.published_at.chars().take(10).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: String,
    pub project_id: String,
    pub catalog_token: String,
    pub identity_base_url: String,
    pub firestore_base_url: String,
    pub catalog_base_url: String,
    pub http_timeout_secs: u64,
    pub featured_titles: Vec<String>,
    pub session: Option<AuthSession>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            project_id: String::new(),
            catalog_token: String::new(),
            identity_base_url: "https://identitytoolkit.googleapis.com".to_string(),
            firestore_base_url: "https://firestore.googleapis.com".to_string(),
            catalog_base_url: "https://api.themoviedb.org/3".to_string(),
            http_timeout_secs: 10,
            featured_titles: vec![
                "550".to_string(),
                "603".to_string(),
                "157336".to_string(),
            ],
            session: None,
        }
    }
}

impl AppConfig {
    pub const ENV_API_KEY: &'static str = "STREAMLET_FIREBASE_API_KEY";
    pub const ENV_PROJECT_ID: &'static str = "STREAMLET_FIREBASE_PROJECT_ID";
    pub const ENV_CATALOG_TOKEN: &'static str = "STREAMLET_TMDB_TOKEN";

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Names of required settings that are still empty.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.is_empty() {
            missing.push("api_key");
        }
        if self.project_id.is_empty() {
            missing.push("project_id");
        }
        if self.catalog_token.is_empty() {
            missing.push("catalog_token");
        }
        missing
    }

    /// Apply environment overrides on top of the file values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        if let Some(v) = pick(Self::ENV_API_KEY) {
            self.api_key = v;
        }
        if let Some(v) = pick(Self::ENV_PROJECT_ID) {
            self.project_id = v;
        }
        if let Some(v) = pick(Self::ENV_CATALOG_TOKEN) {
            self.catalog_token = v;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    Player { id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_text_drops_namespace_and_dashes() {
        let code = ProviderErrorCode::new("auth/email-already-in-use");
        assert_eq!(code.notification_text(), "email already in use");
        assert_eq!(ProviderErrorCode::new("a/b-c").notification_text(), "b c");
        assert_eq!(
            ProviderErrorCode::new("auth/weak-password").notification_text(),
            "weak password"
        );
    }

    #[test]
    fn notification_text_without_namespace_uses_whole_code() {
        assert_eq!(
            ProviderErrorCode::new("internal-error").notification_text(),
            "internal error"
        );
    }

    #[test]
    fn identity_error_user_message_is_sanitized() {
        let err = AppError::Identity(ProviderErrorCode::new("auth/invalid-email"));
        assert_eq!(err.user_message(), "invalid email");
    }

    #[test]
    fn embed_url_uses_key() {
        let meta = TrailerMetadata {
            key: "dQw4w9WgXcQ".into(),
            ..Default::default()
        };
        assert_eq!(meta.embed_url(), "https://www.youtube.com/embed/dQw4w9WgXcQ");
    }

    #[test]
    fn published_date_is_first_ten_characters() {
        let meta = TrailerMetadata {
            published_at: "2024-05-15T10:00:00Z".into(),
            ..Default::default()
        };
        assert_eq!(meta.published_date(), "2024-05-15");

        let short = TrailerMetadata {
            published_at: "2024".into(),
            ..Default::default()
        };
        assert_eq!(short.published_date(), "2024");
    }

    #[test]
    fn trailer_metadata_reads_type_field() {
        let meta: TrailerMetadata = serde_json::from_str(
            r#"{"name":"Official Trailer","key":"abc","published_at":"2024-05-15T10:00:00Z","type":"Trailer","site":"YouTube"}"#,
        )
        .unwrap();
        assert_eq!(meta.video_type, "Trailer");
        assert_eq!(meta.name, "Official Trailer");
    }

    #[test]
    fn profile_fields_match_document_shape() {
        let profile = UserProfile::local("u1".into(), "Ann".into(), "ann@example.com".into());
        let fields = profile.to_fields();
        assert_eq!(fields.get("authProvider").map(String::as_str), Some("local"));
        assert_eq!(fields.get("uid").map(String::as_str), Some("u1"));
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn document_ref_takes_trailing_segment() {
        let doc = DocumentRef::from_name("projects/p/databases/(default)/documents/users/xyz".into());
        assert_eq!(doc.id, "xyz");
    }

    #[test]
    fn env_overrides_replace_non_empty_values() {
        let config = AppConfig {
            api_key: "file-key".into(),
            project_id: "file-project".into(),
            ..Default::default()
        }
        .with_overrides(|name| match name {
            AppConfig::ENV_API_KEY => Some(" env-key ".into()),
            AppConfig::ENV_PROJECT_ID => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.project_id, "file-project");
        assert!(config.catalog_token.is_empty());
        assert_eq!(config.missing_settings(), vec!["catalog_token"]);
    }

    #[test]
    fn partial_config_file_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"api_key":"k"}"#).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.http_timeout_secs, 10);
        assert!(!config.is_authenticated());
    }
}
