use crate::domain::models::*;
use crate::domain::traits::DocumentStore;
use crate::infrastructure::http;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};

const DEFAULT_DATABASE: &str = "(default)";

/// Document inserts through the Firestore REST API, authorised with the
/// signed-in user's ID token.
pub struct ReqwestDocumentStore {
    api_key: String,
    project_id: String,
    base_url: String,
    http_client: Client,
}

impl ReqwestDocumentStore {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            api_key: config.api_key.clone(),
            project_id: config.project_id.clone(),
            base_url: config.firestore_base_url.clone(),
            http_client: http::build_client(config.http_timeout_secs)?,
        })
    }
}

fn encode_fields(fields: &DocumentFields) -> Value {
    let encoded: Map<String, Value> = fields
        .iter()
        .map(|(name, value)| (name.clone(), json!({ "stringValue": value })))
        .collect();
    json!({ "fields": encoded })
}

#[async_trait]
impl DocumentStore for ReqwestDocumentStore {
    async fn insert_document(
        &self,
        collection: &str,
        fields: &DocumentFields,
        id_token: &str,
    ) -> AppResult<DocumentRef> {
        #[derive(Deserialize)]
        struct CreatedDocument {
            name: String,
        }

        #[derive(Deserialize)]
        struct ErrorEnvelope {
            error: ErrorBody,
        }

        #[derive(Deserialize)]
        struct ErrorBody {
            message: String,
        }

        let url = http::endpoint(
            &self.base_url,
            &[
                "v1",
                "projects",
                self.project_id.as_str(),
                "databases",
                DEFAULT_DATABASE,
                "documents",
                collection,
            ],
        )?;

        let response = self
            .http_client
            .post(url)
            .query(&[("key", &self.api_key)])
            .bearer_auth(id_token)
            .json(&encode_fields(fields))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorEnvelope>().await {
                Ok(envelope) => envelope.error.message,
                Err(_) => String::new(),
            };
            return Err(AppError::Store(format!(
                "Failed to insert into {}: {} {}",
                collection, status, message
            )));
        }

        let created: CreatedDocument = response.json().await.map_err(AppError::Network)?;
        Ok(DocumentRef::from_name(created.name))
    }
}
