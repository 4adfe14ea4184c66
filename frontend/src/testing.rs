//! Test doubles for driving views without a server.

use std::sync::{Arc, Mutex};

use articles_core::{
    ArticlesApi, ArticlesClient, HttpRequest, HttpResponse, Transport, TransportError,
};
use async_trait::async_trait;
use uuid::Uuid;

type Handler = dyn Fn(&HttpRequest) -> Option<HttpResponse> + Send + Sync;

/// Records every request and answers through a handler. A handler returning
/// `None` leaves the request hanging forever.
pub struct StubTransport {
    handler: Box<Handler>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn new(
        handler: impl Fn(&HttpRequest) -> Option<HttpResponse> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let reply = (self.handler)(&request);
        self.seen.lock().unwrap().push(request);
        match reply {
            Some(response) => Ok(response),
            None => std::future::pending().await,
        }
    }
}

pub const BASE_URL: &str = "http://stub/articles";

pub fn api(transport: StubTransport) -> Arc<ArticlesApi<StubTransport>> {
    Arc::new(ArticlesApi::new(ArticlesClient::new(BASE_URL), transport))
}

pub fn respond(status: u16, body: impl Into<String>) -> Option<HttpResponse> {
    Some(HttpResponse {
        status,
        headers: Vec::new(),
        body: body.into(),
    })
}

pub fn article_json(id: Uuid, title: &str, published: bool) -> String {
    serde_json::json!({
        "id": id,
        "title": title,
        "content": format!("<p>{title}</p>"),
        "published": published,
    })
    .to_string()
}
