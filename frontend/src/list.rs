//! Filterable article list.
//!
//! Fetches on mount and on every filter change. A newer fetch supersedes any
//! fetch still in flight. Deleting an entry removes it locally once the
//! server confirms.

use std::fmt::Write;
use std::sync::Arc;

use articles_core::{ApiError, Article, ArticleFilter, ArticlesApi, Transport};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::lifecycle::{Lifecycle, Requests};
use crate::state::LoadState;
use crate::view::{render_article, View, LOADING};

pub const DEFAULT_LIMIT: u32 = 10;

/// Filter the list view starts with: `limit = 10`, nothing else.
pub fn default_filter() -> ArticleFilter {
    ArticleFilter {
        limit: Some(DEFAULT_LIMIT),
        ..Default::default()
    }
}

#[derive(Debug)]
enum ListMessage {
    Fetched {
        generation: u64,
        result: Result<Vec<Article>, ApiError>,
    },
    Deleted {
        id: Uuid,
        result: Result<Option<serde_json::Value>, ApiError>,
    },
}

pub struct ArticlesList<T> {
    api: Arc<ArticlesApi<T>>,
    filter: ArticleFilter,
    state: LoadState<Vec<Article>>,
    delete_error: Option<Arc<ApiError>>,
    lifecycle: Lifecycle,
    requests: Requests<ListMessage>,
    in_flight: Option<CancellationToken>,
    generation: u64,
}

impl<T: Transport + 'static> ArticlesList<T> {
    pub fn new(api: Arc<ArticlesApi<T>>) -> Self {
        Self::with_filter(api, default_filter())
    }

    pub fn with_filter(api: Arc<ArticlesApi<T>>, filter: ArticleFilter) -> Self {
        Self {
            api,
            filter,
            state: LoadState::Loading,
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

    pub fn filter(&self) -> &ArticleFilter {
        &self.filter
    }

    pub fn state(&self) -> &LoadState<Vec<Article>> {
        &self.state
    }

    /// Articles currently shown; empty until the first fetch lands.
    pub fn articles(&self) -> &[Article] {
        self.state.loaded().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn delete_error(&self) -> Option<&ApiError> {
        self.delete_error.as_deref()
    }

    /// Replace the filter set. Refetches only when it actually changed and
    /// the view is mounted; returns whether it changed.
    pub fn set_filter(&mut self, filter: ArticleFilter) -> bool {
        if filter == self.filter {
            return false;
        }
        self.filter = filter;
        if self.lifecycle.is_mounted() {
            self.fetch();
        }
        true
    }

    /// Edit the filter set in place; see `set_filter`.
    pub fn update_filter(&mut self, edit: impl FnOnce(&mut ArticleFilter)) -> bool {
        let mut filter = self.filter.clone();
        edit(&mut filter);
        self.set_filter(filter)
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
        let api = Arc::clone(&self.api);
        let filter = self.filter.clone();
        debug!(generation, ?filter, "fetching articles");
        self.requests.spawn(token, async move {
            let result = api.get_articles(&filter).await;
            ListMessage::Fetched { generation, result }
        });
    }

    /// Ask the server to delete `id`. The entry disappears once the delete
    /// succeeds.
    pub fn delete(&mut self, id: Uuid) {
        let Some(token) = self.lifecycle.request_token() else {
            warn!(%id, "delete ignored: list is not mounted");
            return;
        };
        let api = Arc::clone(&self.api);
        self.requests.spawn(token, async move {
            let result = api.delete_article(id).await;
            ListMessage::Deleted { id, result }
        });
    }

    fn apply(&mut self, message: ListMessage) {
        if !self.lifecycle.is_mounted() {
            debug!(?message, "list is not mounted; result discarded");
            return;
        }
        match message {
            ListMessage::Fetched { generation, .. } if generation != self.generation => {
                debug!(generation, current = self.generation, "stale fetch discarded");
            }
            ListMessage::Fetched { result, .. } => {
                self.in_flight = None;
                self.state = match result {
                    Ok(articles) => LoadState::Loaded(articles),
                    Err(err) => LoadState::Failed(Arc::new(err)),
                };
            }
            ListMessage::Deleted { id, result: Ok(_) } => {
                self.delete_error = None;
                if let LoadState::Loaded(articles) = &mut self.state {
                    articles.retain(|article| article.id != id);
                }
            }
            ListMessage::Deleted { id, result: Err(err) } => {
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

    /// Wait until every in-flight request has been applied or discarded.
    pub async fn settle(&mut self) {
        while self.next_update().await {}
    }
}

impl<T> View for ArticlesList<T> {
    fn render(&self) -> String {
        let mut out = String::new();
        match &self.state {
            LoadState::Loading => {
                let _ = writeln!(out, "{LOADING}");
            }
            LoadState::Failed(err) => {
                let _ = writeln!(out, "Error: {err}");
            }
            LoadState::Loaded(articles) if articles.is_empty() => {
                out.push_str("No articles.\n");
            }
            LoadState::Loaded(articles) => {
                for (index, article) in articles.iter().enumerate() {
                    if index > 0 {
                        out.push('\n');
                    }
                    render_article(&mut out, article);
                }
            }
        }
        if let Some(err) = &self.delete_error {
            let _ = writeln!(out, "Error: {err}");
        }
        out
    }
}
