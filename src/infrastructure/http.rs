use crate::domain::models::{AppError, AppResult};
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub fn build_client(timeout_secs: u64) -> AppResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Appends percent-encoded path segments to `base`.
pub fn endpoint(base: &str, segments: &[&str]) -> AppResult<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| AppError::Config(format!("Invalid base URL {}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| AppError::Config(format!("Base URL cannot have a path: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
