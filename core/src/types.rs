//! Domain DTOs for the articles API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any drift between the two crates. `Article` is what
//! the server returns and is decoded leniently (server metadata is optional).
//! `ArticleDraft` is what the client authors and sends verbatim on create and
//! update. `ArticleFilter` only ever shapes a list query.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single article as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Rich text; opaque to this crate.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Uuid>,
    #[serde(default)]
    pub co_authors: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request payload for creating or replacing an article.
///
/// `tags` may carry empty entries while the user is still typing; they are
/// sent as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub description: String,
    pub content: String,
    pub published: bool,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Uuid>,
    #[serde(default)]
    pub co_authors: Vec<Uuid>,
}

impl From<&Article> for ArticleDraft {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            description: article.description.clone(),
            content: article.content.clone(),
            published: article.published,
            tags: article.tags.clone(),
            author: article.author,
            co_authors: article.co_authors.clone(),
        }
    }
}

/// Optional constraints narrowing a list query. Absent fields are never sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_before: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_after: Option<DateTime<Utc>>,
}

impl ArticleFilter {
    pub const PUBLISHED: &'static str = "published";
    pub const AUTHOR_ID: &'static str = "author_id";
    pub const LIMIT: &'static str = "limit";
    pub const PUBLISHED_BEFORE: &'static str = "published_before";
    pub const PUBLISHED_AFTER: &'static str = "published_after";

    /// Query pairs for every present field, in a fixed key order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(published) = self.published {
            pairs.push((Self::PUBLISHED, published.to_string()));
        }
        if let Some(author_id) = self.author_id {
            pairs.push((Self::AUTHOR_ID, author_id.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push((Self::LIMIT, limit.to_string()));
        }
        if let Some(before) = self.published_before {
            pairs.push((Self::PUBLISHED_BEFORE, timestamp(before)));
        }
        if let Some(after) = self.published_after {
            pairs.push((Self::PUBLISHED_AFTER, timestamp(after)));
        }
        pairs
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
