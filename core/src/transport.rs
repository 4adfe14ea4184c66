//! Executes `HttpRequest` values against the network.
//!
//! `Transport` is the seam between the deterministic client and real I/O.
//! Non-2xx statuses are returned as data, never as errors, so status
//! interpretation stays in `ArticlesClient::parse_*`.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by a shared `reqwest::Client`.
///
/// No timeout or retry policy is configured; requests rely on reqwest's
/// defaults.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(reqwest_method(request.method), &request.path);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_map_one_to_one() {
        assert_eq!(reqwest_method(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(reqwest_method(HttpMethod::Post), reqwest::Method::POST);
        assert_eq!(reqwest_method(HttpMethod::Put), reqwest::Method::PUT);
        assert_eq!(reqwest_method(HttpMethod::Patch), reqwest::Method::PATCH);
        assert_eq!(reqwest_method(HttpMethod::Delete), reqwest::Method::DELETE);
    }

    #[tokio::test]
    async fn unreachable_host_surfaces_transport_error() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let transport = ReqwestTransport::new();
        let result = transport
            .execute(HttpRequest {
                method: HttpMethod::Get,
                path: format!("http://{addr}/articles"),
                headers: Vec::new(),
                body: None,
            })
            .await;
        let err = result.unwrap_err();
        assert!(err.downcast_ref::<reqwest::Error>().is_some());
    }
}
