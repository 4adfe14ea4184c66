//! Single-article detail view.

use std::fmt::Write;
use std::sync::Arc;

use articles_core::{ApiError, Article, ArticlesApi, Transport};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::lifecycle::{Lifecycle, Requests};
use crate::state::DetailState;
use crate::view::{render_article, View, LOADING};

#[derive(Debug)]
enum DetailMessage {
    Fetched {
        generation: u64,
        result: Result<Article, ApiError>,
    },
    Deleted {
        id: Uuid,
        result: Result<Option<serde_json::Value>, ApiError>,
    },
}

pub struct ArticleDetails<T> {
    api: Arc<ArticlesApi<T>>,
    article_id: Uuid,
    state: DetailState,
    delete_error: Option<Arc<ApiError>>,
    lifecycle: Lifecycle,
    requests: Requests<DetailMessage>,
    in_flight: Option<CancellationToken>,
    generation: u64,
}

impl<T: Transport + 'static> ArticleDetails<T> {
    pub fn new(api: Arc<ArticlesApi<T>>, article_id: Uuid) -> Self {
        Self {
            api,
            article_id,
            state: DetailState::Loading,
            delete_error: None,
            lifecycle: Lifecycle::default(),
            requests: Requests::default(),
            in_flight: None,
            generation: 0,
        }
    }

    pub fn mount(&mut self) {
        if self.lifecycle.is_mounted() {
            return;
        }
        self.lifecycle.mount();
        self.fetch();
    }

    /// Unmount the view. Requests still running are cancelled and results
    /// already delivered are dropped unapplied.
    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
        self.in_flight = None;
        self.generation += 1;
        let dropped = self.requests.drain();
        if dropped > 0 {
            debug!(dropped, "results discarded on unmount");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle.is_mounted()
    }

    pub fn article_id(&self) -> Uuid {
        self.article_id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn article(&self) -> Option<&Article> {
        match &self.state {
            DetailState::Loaded(article) => Some(article),
            _ => None,
        }
    }

    pub fn delete_error(&self) -> Option<&ApiError> {
        self.delete_error.as_deref()
    }

    /// Point the view at another article; refetches when the id changed.
    pub fn set_article_id(&mut self, id: Uuid) -> bool {
        if id == self.article_id {
            return false;
        }
        self.article_id = id;
        self.state = DetailState::Loading;
        self.delete_error = None;
        if self.lifecycle.is_mounted() {
            self.fetch();
        }
        true
    }

    fn fetch(&mut self) {
        let Some(token) = self.lifecycle.request_token() else {
            return;
        };
        if let Some(previous) = self.in_flight.replace(token.clone()) {
            previous.cancel();
        }
        self.generation += 1;
        let generation = self.generation;
        let id = self.article_id;
        let api = Arc::clone(&self.api);
        debug!(%id, generation, "fetching article");
        self.requests.spawn(token, async move {
            let result = api.get_article_by_id(id).await;
            DetailMessage::Fetched { generation, result }
        });
    }

    /// Delete the article this view shows.
    pub fn delete(&mut self) {
        let id = self.article_id;
        let Some(token) = self.lifecycle.request_token() else {
            warn!(%id, "delete ignored: detail view is not mounted");
            return;
        };
        let api = Arc::clone(&self.api);
        self.requests.spawn(token, async move {
            let result = api.delete_article(id).await;
            DetailMessage::Deleted { id, result }
        });
    }

    fn apply(&mut self, message: DetailMessage) {
        if !self.lifecycle.is_mounted() {
            debug!(?message, "detail view is not mounted; result discarded");
            return;
        }
        match message {
            DetailMessage::Fetched { generation, .. } if generation != self.generation => {
                debug!(generation, current = self.generation, "stale fetch discarded");
            }
            DetailMessage::Fetched { result, .. } => {
                self.in_flight = None;
                self.state = match result {
                    Ok(article) => DetailState::Loaded(article),
                    Err(err) => DetailState::Failed(Arc::new(err)),
                };
            }
            DetailMessage::Deleted { id, .. } if id != self.article_id => {
                debug!(%id, "delete confirmed for an article no longer shown");
            }
            DetailMessage::Deleted { id, result: Ok(_) } => {
                self.delete_error = None;
                self.state = DetailState::Deleted(id);
            }
            DetailMessage::Deleted { id, result: Err(err) } => {
                warn!(%id, error = %err, "delete failed");
                self.delete_error = Some(Arc::new(err));
            }
        }
    }

    /// Apply every result that has already arrived; returns how many.
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Some(message) = self.requests.try_next() {
            self.apply(message);
            applied += 1;
        }
        applied
    }

    /// Wait for the next result and apply it. Returns `false` when nothing
    /// is in flight.
    pub async fn next_update(&mut self) -> bool {
        match self.requests.next().await {
            Some(message) => {
                self.apply(message);
                true
            }
            None => false,
        }
    }

    pub async fn settle(&mut self) {
        while self.next_update().await {}
    }
}

impl<T> View for ArticleDetails<T> {
    fn render(&self) -> String {
        let mut out = String::new();
        match &self.state {
            DetailState::Loading => {
                let _ = writeln!(out, "{LOADING}");
            }
            DetailState::Loaded(article) => render_article(&mut out, article),
            DetailState::Failed(err) if err.is_not_found() => {
                let _ = writeln!(out, "Article {} not found.", self.article_id);
            }
            DetailState::Failed(err) => {
                let _ = writeln!(out, "Error: {err}");
            }
            DetailState::Deleted(id) => {
                let _ = writeln!(out, "Article {id} deleted.");
            }
        }
        if let Some(err) = &self.delete_error {
            let _ = writeln!(out, "Error: {err}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{api, article_json, respond, StubTransport, BASE_URL};
    use articles_core::HttpMethod;

    const ID: Uuid = Uuid::from_u128(0x505646b3_4c9e_4ec4_9865_3f7805874b54);

    /// Serves any id as an article titled after its position; deletes succeed
    /// and afterwards the id is gone.
    fn backend() -> StubTransport {
        let deleted = std::sync::Mutex::new(Vec::<String>::new());
        StubTransport::new(move |req| {
            let id = req.path.rsplit('/').next().unwrap_or_default().to_string();
            match req.method {
                HttpMethod::Delete => {
                    deleted.lock().unwrap().push(id);
                    respond(204, "")
                }
                HttpMethod::Get if deleted.lock().unwrap().contains(&id) => {
                    respond(404, r#"{"message":"article not found"}"#)
                }
                HttpMethod::Get => {
                    let id: Uuid = id.parse().unwrap();
                    respond(200, article_json(id, &format!("article {id}"), false))
                }
                _ => respond(405, ""),
            }
        })
    }

    #[tokio::test]
    async fn mount_fetches_the_article() {
        let mut details = ArticleDetails::new(api(backend()), ID);
        assert_eq!(details.render(), "Loading...\n");
        details.mount();
        details.settle().await;

        let article = details.article().unwrap();
        assert_eq!(article.id, ID);
        let requests = details.api.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, format!("{BASE_URL}/{ID}"));
    }

    #[tokio::test]
    async fn id_change_refetches() {
        let mut details = ArticleDetails::new(api(backend()), ID);
        details.mount();
        details.settle().await;

        let other = Uuid::from_u128(7);
        assert!(!details.set_article_id(ID));
        assert!(details.set_article_id(other));
        assert!(matches!(details.state(), DetailState::Loading));
        details.settle().await;
        assert_eq!(details.article().unwrap().id, other);
        assert_eq!(details.api.transport().requests().len(), 2);
    }

    #[tokio::test]
    async fn delete_moves_to_deleted() {
        let mut details = ArticleDetails::new(api(backend()), ID);
        details.mount();
        details.settle().await;

        details.delete();
        details.settle().await;
        assert!(matches!(details.state(), DetailState::Deleted(id) if *id == ID));
        assert_eq!(details.render(), format!("Article {ID} deleted.\n"));
    }

    #[tokio::test]
    async fn missing_article_renders_not_found() {
        let transport = StubTransport::new(|_| respond(404, "{}"));
        let mut details = ArticleDetails::new(api(transport), ID);
        details.mount();
        details.settle().await;

        let DetailState::Failed(err) = details.state() else {
            panic!("expected failure");
        };
        assert!(err.to_string().contains(&ID.to_string()));
        assert_eq!(details.render(), format!("Article {ID} not found.\n"));
    }

    #[tokio::test]
    async fn unmount_discards_in_flight_fetch() {
        let mut details = ArticleDetails::new(api(StubTransport::new(|_| None)), ID);
        details.mount();
        details.unmount();
        details.settle().await;
        assert!(matches!(details.state(), DetailState::Loading));
        assert_eq!(details.apply_pending(), 0);
    }

    #[tokio::test]
    async fn unmount_drops_results_that_already_arrived() {
        let mut details = ArticleDetails::new(api(backend()), ID);
        details.mount();
        while details.requests.delivered() == 0 {
            tokio::task::yield_now().await;
        }
        details.unmount();
        assert_eq!(details.apply_pending(), 0);
        details.settle().await;
        assert!(matches!(details.state(), DetailState::Loading));

        details.mount();
        details.settle().await;
        assert_eq!(details.article().unwrap().id, ID);
    }

    #[tokio::test]
    async fn delete_confirmed_before_unmount_is_not_applied() {
        let mut details = ArticleDetails::new(api(backend()), ID);
        details.mount();
        details.settle().await;
        details.delete();
        while details.requests.delivered() == 0 {
            tokio::task::yield_now().await;
        }
        details.unmount();
        details.settle().await;
        assert!(matches!(details.state(), DetailState::Loaded(_)));
    }

    #[tokio::test]
    async fn delete_while_unmounted_is_ignored() {
        let mut details = ArticleDetails::new(api(backend()), ID);
        details.delete();
        assert!(!details.next_update().await);
        assert!(details.api.transport().requests().is_empty());
    }
}
