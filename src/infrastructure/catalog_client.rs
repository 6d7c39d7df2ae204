use crate::domain::models::*;
use crate::domain::traits::CatalogClient;
use crate::infrastructure::http;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const CATALOG_LANGUAGE: &str = "en-US";

/// Movie video listings from the TMDB v3 API, using a static read token.
pub struct ReqwestCatalogClient {
    token: String,
    base_url: String,
    http_client: Client,
}

impl ReqwestCatalogClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            token: config.catalog_token.clone(),
            base_url: config.catalog_base_url.clone(),
            http_client: http::build_client(config.http_timeout_secs)?,
        })
    }
}

#[async_trait]
impl CatalogClient for ReqwestCatalogClient {
    async fn movie_videos(&self, id: &str) -> AppResult<Vec<TrailerMetadata>> {
        #[derive(Deserialize)]
        struct VideosResponse {
            #[serde(default)]
            results: Vec<TrailerMetadata>,
        }

        let url = http::endpoint(&self.base_url, &["movie", id, "videos"])?;

        let response = self
            .http_client
            .get(url)
            .query(&[("language", CATALOG_LANGUAGE)])
            .header("accept", "application/json")
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Catalog(format!(
                "Failed to get videos for {}: {}",
                id,
                response.status()
            )));
        }

        let data: VideosResponse = response.json().await.map_err(AppError::Network)?;
        Ok(data.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: String) -> ReqwestCatalogClient {
        let config = AppConfig {
            catalog_token: "read-token".into(),
            catalog_base_url: base_url,
            ..Default::default()
        };
        ReqwestCatalogClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn videos_request_carries_language_and_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/550/videos"))
            .and(query_param("language", "en-US"))
            .and(header("authorization", "Bearer read-token"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 550,
                "results": [
                    {
                        "iso_639_1": "en",
                        "name": "Fight Club | #TBT Trailer",
                        "key": "BdJKm16Co6M",
                        "site": "YouTube",
                        "type": "Trailer",
                        "official": true,
                        "published_at": "2024-05-15T10:00:00.000Z"
                    },
                    {
                        "name": "Teaser",
                        "key": "second",
                        "type": "Teaser",
                        "published_at": "2019-01-01T00:00:00.000Z"
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let videos = client(server.uri()).movie_videos("550").await.unwrap();

        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].key, "BdJKm16Co6M");
        assert_eq!(videos[0].video_type, "Trailer");
        assert_eq!(videos[0].published_date(), "2024-05-15");
    }

    #[tokio::test]
    async fn missing_results_decode_as_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/1/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
            .mount(&server)
            .await;

        let videos = client(server.uri()).movie_videos("1").await.unwrap();
        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn unknown_movie_is_a_catalog_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "status_code": 34,
                "status_message": "The resource you requested could not be found."
            })))
            .mount(&server)
            .await;

        let err = client(server.uri()).movie_videos("999999999").await.unwrap_err();
        assert!(matches!(err, AppError::Catalog(_)));
    }
}
