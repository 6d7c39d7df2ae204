use crate::domain::models::*;
use crate::domain::traits::CatalogClient;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// History steps taken by the player's back arrow.
pub const BACK_STEPS: usize = 2;

pub struct TrailerService {
    catalog: Arc<dyn CatalogClient>,
}

impl TrailerService {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    /// First video the catalog lists for `id`, if any.
    pub async fn fetch_trailer(&self, id: &str) -> AppResult<Option<TrailerMetadata>> {
        let videos = self.catalog.movie_videos(id).await?;
        log::debug!("Catalog returned {} videos for {}", videos.len(), id);
        Ok(videos.into_iter().next())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrailerState {
    Awaiting,
    Loaded(TrailerMetadata),
    /// The catalog has no videos for this title.
    Unavailable,
}

/// One visit to the player screen. The catalog request lives exactly as long
/// as the view: dropping the view aborts it.
pub struct TrailerView {
    id: String,
    generation: u64,
    state: TrailerState,
    request: Option<JoinHandle<()>>,
}

impl TrailerView {
    /// Creates the view and issues its single catalog request. `on_done`
    /// receives this view's generation and the outcome.
    pub fn open<F>(
        id: String,
        generation: u64,
        service: Arc<TrailerService>,
        runtime: &Handle,
        on_done: F,
    ) -> Self
    where
        F: FnOnce(u64, AppResult<Option<TrailerMetadata>>) + Send + 'static,
    {
        let request_id = id.clone();
        let request = runtime.spawn(async move {
            let outcome = service.fetch_trailer(&request_id).await;
            on_done(generation, outcome);
        });

        Self {
            id,
            generation,
            state: TrailerState::Awaiting,
            request: Some(request),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &TrailerState {
        &self.state
    }

    /// Applies a request outcome. Outcomes for another generation, or arriving
    /// after the view has left `Awaiting`, are ignored. Returns whether the
    /// state changed.
    pub fn apply(&mut self, generation: u64, outcome: AppResult<Option<TrailerMetadata>>) -> bool {
        if generation != self.generation || self.state != TrailerState::Awaiting {
            log::debug!("Discarding stale trailer result for generation {}", generation);
            return false;
        }
        self.request = None;

        match outcome {
            Ok(Some(meta)) => {
                self.state = TrailerState::Loaded(meta);
                true
            }
            Ok(None) => {
                log::info!("No trailer available for {}", self.id);
                self.state = TrailerState::Unavailable;
                true
            }
            Err(e) => {
                log::error!("Failed to fetch trailer for {}: {}", self.id, e);
                false
            }
        }
    }

    pub fn embed_url(&self) -> Option<String> {
        match &self.state {
            TrailerState::Loaded(meta) => Some(meta.embed_url()),
            _ => None,
        }
    }
}

impl Drop for TrailerView {
    fn drop(&mut self) {
        if let Some(request) = self.request.take() {
            request.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::MockCatalogClient;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn meta(key: &str, published_at: &str) -> TrailerMetadata {
        TrailerMetadata {
            name: format!("Trailer {}", key),
            key: key.to_string(),
            published_at: published_at.to_string(),
            video_type: "Trailer".to_string(),
        }
    }

    struct SlowCatalog;

    #[async_trait]
    impl CatalogClient for SlowCatalog {
        async fn movie_videos(&self, _id: &str) -> AppResult<Vec<TrailerMetadata>> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(vec![meta("late", "2024-01-01T00:00:00Z")])
        }
    }

    #[tokio::test]
    async fn fetch_selects_first_result() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_movie_videos()
            .withf(|id| id == "550")
            .times(1)
            .returning(|_| {
                Ok(vec![
                    meta("first", "2024-05-15T10:00:00Z"),
                    meta("second", "2023-01-01T00:00:00Z"),
                ])
            });

        let service = TrailerService::new(Arc::new(catalog));
        let trailer = service.fetch_trailer("550").await.unwrap().unwrap();

        assert_eq!(trailer.key, "first");
        assert_eq!(trailer.embed_url(), "https://www.youtube.com/embed/first");
        assert_eq!(trailer.published_date(), "2024-05-15");
    }

    #[tokio::test]
    async fn view_loads_once_and_stays_loaded() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_movie_videos()
            .times(1)
            .returning(|_| Ok(vec![meta("abc", "2024-05-15T10:00:00Z")]));
        let service = Arc::new(TrailerService::new(Arc::new(catalog)));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut view = TrailerView::open("550".into(), 7, service, &Handle::current(), move |g, o| {
            let _ = tx.send((g, o));
        });
        assert_eq!(view.state(), &TrailerState::Awaiting);
        assert_eq!(view.embed_url(), None);

        let (generation, outcome) = rx.recv().await.unwrap();
        assert!(view.apply(generation, outcome));
        assert_eq!(view.embed_url().as_deref(), Some("https://www.youtube.com/embed/abc"));

        assert!(!view.apply(7, Ok(Some(meta("other", "")))));
        assert_eq!(view.embed_url().as_deref(), Some("https://www.youtube.com/embed/abc"));
    }

    #[tokio::test]
    async fn empty_results_mark_trailer_unavailable() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_movie_videos().returning(|_| Ok(Vec::new()));
        let service = Arc::new(TrailerService::new(Arc::new(catalog)));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut view = TrailerView::open("1".into(), 1, service, &Handle::current(), move |g, o| {
            let _ = tx.send((g, o));
        });
        let (generation, outcome) = rx.recv().await.unwrap();

        assert!(view.apply(generation, outcome));
        assert_eq!(view.state(), &TrailerState::Unavailable);
        assert_eq!(view.embed_url(), None);
    }

    #[tokio::test]
    async fn transport_error_keeps_view_awaiting() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_movie_videos()
            .returning(|_| Err(AppError::Catalog("502 Bad Gateway".into())));
        let service = Arc::new(TrailerService::new(Arc::new(catalog)));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut view = TrailerView::open("1".into(), 1, service, &Handle::current(), move |g, o| {
            let _ = tx.send((g, o));
        });
        let (generation, outcome) = rx.recv().await.unwrap();

        assert!(!view.apply(generation, outcome));
        assert_eq!(view.state(), &TrailerState::Awaiting);
    }

    #[tokio::test]
    async fn stale_generation_is_ignored() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_movie_videos().returning(|_| Ok(Vec::new()));
        let service = Arc::new(TrailerService::new(Arc::new(catalog)));

        let mut view = TrailerView::open("1".into(), 2, service, &Handle::current(), |_, _| {});
        assert!(!view.apply(1, Ok(Some(meta("old", "")))));
        assert_eq!(view.state(), &TrailerState::Awaiting);
    }

    #[tokio::test]
    async fn dropping_the_view_cancels_the_request() {
        let service = Arc::new(TrailerService::new(Arc::new(SlowCatalog)));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let view = TrailerView::open("1".into(), 1, service, &Handle::current(), move |g, o| {
            let _ = tx.send((g, o));
        });
        drop(view);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(rx.try_recv().is_err());
    }
}
