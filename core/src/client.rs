//! Stateless HTTP request builder and response parser for the articles API.
//!
//! # Design
//! `ArticlesClient` holds only the resource URL and the verb used for updates,
//! and carries no mutable state between calls. Each CRUD operation is split
//! into a `build_*` method that produces an `HttpRequest` and a `parse_*`
//! method that consumes an `HttpResponse`. A `Transport` executes the actual
//! round-trip, keeping this layer deterministic and free of I/O.

use reqwest::Url;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ApiError, Operation};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Article, ArticleDraft, ArticleFilter};

const JSON_CONTENT_TYPE: (&str, &str) = ("content-type", "application/json");

/// Synchronous, stateless client for the articles resource.
///
/// `base_url` is the collection URL itself (e.g. `http://host/articles`);
/// single articles live at `{base_url}/{id}`.
#[derive(Debug, Clone)]
pub struct ArticlesClient {
    base_url: String,
    update_method: HttpMethod,
}

impl ArticlesClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            update_method: HttpMethod::Put,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url).with_update_method(config.update_method)
    }

    pub fn with_update_method(mut self, method: HttpMethod) -> Self {
        self.update_method = method;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn update_method(&self) -> HttpMethod {
        self.update_method
    }

    fn article_url(&self, id: Uuid) -> String {
        format!("{}/{id}", self.base_url)
    }

    pub fn build_create_article(&self, draft: &ArticleDraft) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.base_url.clone(),
            headers: json_headers(),
            body: Some(encode(draft)?),
        })
    }

    /// Absent filter fields are left out of the query entirely; an empty
    /// filter produces the bare collection URL.
    pub fn build_get_articles(&self, filter: &ArticleFilter) -> Result<HttpRequest, ApiError> {
        let pairs = filter.query_pairs();
        let path = if pairs.is_empty() {
            self.base_url.clone()
        } else {
            let mut url = Url::parse(&self.base_url).map_err(|e| ApiError::InvalidUrl {
                url: self.base_url.clone(),
                reason: e.to_string(),
            })?;
            if url.cannot_be_a_base() {
                return Err(ApiError::InvalidUrl {
                    url: self.base_url.clone(),
                    reason: "URL cannot carry a query".to_string(),
                });
            }
            url.query_pairs_mut().extend_pairs(pairs);
            url.to_string()
        };
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn build_get_article(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.article_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_update_article(
        &self,
        id: Uuid,
        draft: &ArticleDraft,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: self.update_method,
            path: self.article_url(id),
            headers: json_headers(),
            body: Some(encode(draft)?),
        })
    }

    pub fn build_delete_article(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.article_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_create_article(&self, response: HttpResponse) -> Result<Article, ApiError> {
        decode(Operation::Create, response)
    }

    pub fn parse_get_articles(&self, response: HttpResponse) -> Result<Vec<Article>, ApiError> {
        decode(Operation::List, response)
    }

    pub fn parse_get_article(&self, id: Uuid, response: HttpResponse) -> Result<Article, ApiError> {
        decode(Operation::Get(id), response)
    }

    pub fn parse_update_article(
        &self,
        id: Uuid,
        response: HttpResponse,
    ) -> Result<Article, ApiError> {
        decode(Operation::Update(id), response)
    }

    /// Returns the JSON body the server sent back, or `None` when it was empty.
    pub fn parse_delete_article(
        &self,
        id: Uuid,
        response: HttpResponse,
    ) -> Result<Option<serde_json::Value>, ApiError> {
        let operation = Operation::Delete(id);
        check_status(operation, &response)?;
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|source| ApiError::Deserialization { operation, source })
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![(JSON_CONTENT_TYPE.0.to_string(), JSON_CONTENT_TYPE.1.to_string())]
}

fn encode(draft: &ArticleDraft) -> Result<String, ApiError> {
    serde_json::to_string(draft).map_err(ApiError::Serialization)
}

fn decode<T: DeserializeOwned>(operation: Operation, response: HttpResponse) -> Result<T, ApiError> {
    check_status(operation, &response)?;
    serde_json::from_str(&response.body)
        .map_err(|source| ApiError::Deserialization { operation, source })
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(operation: Operation, response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound {
            operation,
            body: response.body.clone(),
        });
    }
    Err(ApiError::Http {
        operation,
        status: response.status,
        body: response.body.clone(),
    })
}
