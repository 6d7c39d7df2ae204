use crate::domain::models::*;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an email/password account. The returned session is signed in.
    async fn register(&self, email: &str, password: &str) -> AppResult<AuthSession>;
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_document(
        &self,
        collection: &str,
        fields: &DocumentFields,
        id_token: &str,
    ) -> AppResult<DocumentRef>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Video metadata for a movie, in the order the catalog returns it.
    async fn movie_videos(&self, id: &str) -> AppResult<Vec<TrailerMetadata>>;
}

#[cfg_attr(test, automock)]
pub trait ConfigStore: Send + Sync {
    fn load(&self) -> AppResult<AppConfig>;
    fn save(&self, config: &AppConfig) -> AppResult<()>;
}
