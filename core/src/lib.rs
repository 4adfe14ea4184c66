//! API client core for the articles service.
//!
//! # Overview
//! `ArticlesClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern).
//! `ArticlesApi` drives it through a `Transport` to expose the five async
//! operations: create, list with filters, get by id, update and delete.
//!
//! # Design
//! - `ArticlesClient` is stateless; it holds the resource URL and the update
//!   verb only.
//! - Each CRUD operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Absent filter values never reach the query string.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::ArticlesApi;
pub use client::ArticlesClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, Operation, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
pub use types::{Article, ArticleDraft, ArticleFilter};
