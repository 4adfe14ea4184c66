//! Error types for the articles API client.
//!
//! # Design
//! Every variant that stems from a server answer carries the `Operation` that
//! was attempted, so the rendered message always names what failed and, for
//! single-article calls, the article id. `NotFound` gets a dedicated variant
//! because views distinguish a missing article from any other failure.
//! Transport failures keep the original error as their source.

use std::fmt;

use uuid::Uuid;

/// Boxed error produced by a `Transport` implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The logical operation a request was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Get(Uuid),
    Update(Uuid),
    Delete(Uuid),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create article"),
            Operation::List => write!(f, "fetch articles"),
            Operation::Get(id) => write!(f, "fetch article with ID {id}"),
            Operation::Update(id) => write!(f, "update article with ID {id}"),
            Operation::Delete(id) => write!(f, "delete article with ID {id}"),
        }
    }
}

/// Errors returned by `ArticlesClient` and `ArticlesApi`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("failed to {operation}: not found: {body}")]
    NotFound { operation: Operation, body: String },

    /// The server returned a non-2xx status other than 404.
    #[error("failed to {operation}: HTTP {status}: {body}")]
    Http {
        operation: Operation,
        status: u16,
        body: String,
    },

    /// A success body could not be decoded into the expected type.
    #[error("failed to {operation}: invalid response body: {source}")]
    Deserialization {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    /// The request payload could not be encoded as JSON.
    #[error("failed to encode request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The configured base URL cannot carry a query string.
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request never produced an HTTP response.
    #[error("{0}")]
    Transport(#[source] TransportError),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// The operation this error belongs to, when it came from a server answer.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            ApiError::NotFound { operation, .. }
            | ApiError::Http { operation, .. }
            | ApiError::Deserialization { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}
