//! Asynchronous articles API: `build → execute → parse` for each operation.
//!
//! # Design
//! `ArticlesApi` pairs the stateless `ArticlesClient` with a `Transport`.
//! It never recovers from errors; every failure is logged and returned to
//! the caller. No retries are attempted.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::ArticlesClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Article, ArticleDraft, ArticleFilter};

#[derive(Debug, Clone)]
pub struct ArticlesApi<T> {
    client: ArticlesClient,
    transport: T,
}

impl ArticlesApi<ReqwestTransport> {
    /// API backed by reqwest, configured from `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(ArticlesClient::from_config(config), ReqwestTransport::new())
    }
}

impl<T: Transport> ArticlesApi<T> {
    pub fn new(client: ArticlesClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ArticlesClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.path, "sending request");
        let response = self.transport.execute(request).await.map_err(|e| {
            warn!(error = %e, "transport failure");
            ApiError::Transport(e)
        })?;
        debug!(status = response.status, "received response");
        Ok(response)
    }

    pub async fn create_article(&self, draft: &ArticleDraft) -> Result<Article, ApiError> {
        let request = self.client.build_create_article(draft)?;
        let response = self.send(request).await?;
        self.client
            .parse_create_article(response)
            .inspect_err(log_failure)
    }

    pub async fn get_articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>, ApiError> {
        let request = self.client.build_get_articles(filter)?;
        let response = self.send(request).await?;
        self.client
            .parse_get_articles(response)
            .inspect_err(log_failure)
    }

    pub async fn get_article_by_id(&self, id: Uuid) -> Result<Article, ApiError> {
        let request = self.client.build_get_article(id);
        let response = self.send(request).await?;
        self.client
            .parse_get_article(id, response)
            .inspect_err(log_failure)
    }

    pub async fn update_article(&self, id: Uuid, draft: &ArticleDraft) -> Result<Article, ApiError> {
        let request = self.client.build_update_article(id, draft)?;
        let response = self.send(request).await?;
        self.client
            .parse_update_article(id, response)
            .inspect_err(log_failure)
    }

    pub async fn delete_article(&self, id: Uuid) -> Result<Option<serde_json::Value>, ApiError> {
        let request = self.client.build_delete_article(id);
        let response = self.send(request).await?;
        self.client
            .parse_delete_article(id, response)
            .inspect_err(log_failure)
    }
}

fn log_failure(err: &ApiError) {
    warn!(error = %err, "request failed");
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::TransportError;
    use crate::http::HttpMethod;

    /// Replies with a canned response and records every request.
    struct Canned {
        status: u16,
        body: &'static str,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for Canned {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.to_string(),
            })
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused").into())
        }
    }

    fn api<T: Transport>(transport: T) -> ArticlesApi<T> {
        ArticlesApi::new(ArticlesClient::new("http://localhost:1200/articles"), transport)
    }

    #[tokio::test]
    async fn create_returns_server_article_unchanged() {
        let body = r#"{"id":"00000000-0000-0000-0000-000000000009","title":"Server title","published":true}"#;
        let api = api(Canned::new(201, body));
        let draft = ArticleDraft {
            title: "Client title".to_string(),
            ..Default::default()
        };
        let article = api.create_article(&draft).await.unwrap();
        assert_eq!(article, serde_json::from_str::<Article>(body).unwrap());

        let seen = api.transport().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Post);
        let sent: ArticleDraft = serde_json::from_str(seen[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, draft);
    }

    #[tokio::test]
    async fn get_by_id_not_found_names_id() {
        let api = api(Canned::new(404, r#"{"message":"article not found"}"#));
        let id = Uuid::from_u128(0xfeed);
        let err = api.get_article_by_id(id).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains(&id.to_string()));
        assert!(err.to_string().contains("article not found"));
    }

    #[tokio::test]
    async fn transport_failure_propagates_source() {
        let api = api(Unreachable);
        let err = api.get_articles(&ArticleFilter::default()).await.unwrap_err();
        let ApiError::Transport(source) = err else {
            panic!("expected transport error");
        };
        let io = source.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::ConnectionRefused);
    }

    #[tokio::test]
    async fn delete_with_empty_body_resolves_none() {
        let api = api(Canned::new(204, ""));
        let body = api.delete_article(Uuid::nil()).await.unwrap();
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn update_failure_is_not_retried() {
        let api = api(Canned::new(503, "unavailable"));
        let err = api
            .update_article(Uuid::nil(), &ArticleDraft::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 503, .. }));
        assert_eq!(api.transport().seen.lock().unwrap().len(), 1);
    }
}
