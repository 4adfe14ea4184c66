use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub content: String,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Uuid>,
    pub co_authors: Vec<Uuid>,
}

/// Create and full-replace payload. Missing fields take their zero value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ArticleInput {
    pub title: String,
    pub description: String,
    pub content: String,
    pub published: bool,
    pub tags: Vec<String>,
    pub author: Option<Uuid>,
    pub co_authors: Vec<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub published: Option<bool>,
    pub author_id: Option<Uuid>,
    pub limit: Option<usize>,
    pub published_before: Option<DateTime<Utc>>,
    pub published_after: Option<DateTime<Utc>>,
}

impl ListParams {
    fn matches(&self, article: &Article) -> bool {
        if self.published.is_some_and(|p| p != article.published) {
            return false;
        }
        if self.author_id.is_some() && self.author_id != article.author {
            return false;
        }
        // An unpublished article has no publish time and never satisfies a
        // time bound.
        if let Some(before) = self.published_before {
            if !article.published_at.is_some_and(|at| at < before) {
                return false;
            }
        }
        if let Some(after) = self.published_after {
            if !article.published_at.is_some_and(|at| at > after) {
                return false;
            }
        }
        true
    }
}

/// Error body returned for every non-2xx answer.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    pub error: String,
}

fn not_found(id: Uuid) -> Response {
    let status = StatusCode::NOT_FOUND;
    let body = ErrorBody {
        status: status.as_u16(),
        message: "article not found".to_string(),
        error: format!("no article with id {id}"),
    };
    (status, Json(body)).into_response()
}

/// Articles in insertion order, which is also the listing order.
pub type Db = Arc<RwLock<Vec<Article>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/articles", get(list_articles).post(create_article))
        .route(
            "/articles/{id}",
            get(get_article).put(update_article).delete(delete_article),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock articles server listening");
    }
    axum::serve(listener, app()).await
}

async fn list_articles(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Article>> {
    debug!(?params, "list articles");
    let articles = db.read().await;
    let matching = articles
        .iter()
        .filter(|article| params.matches(article))
        .take(params.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    Json(matching)
}

async fn create_article(
    State(db): State<Db>,
    Json(input): Json<ArticleInput>,
) -> (StatusCode, Json<Article>) {
    let now = Utc::now();
    let article = Article {
        id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
        published_at: input.published.then_some(now),
        title: input.title,
        description: input.description,
        content: input.content,
        published: input.published,
        tags: input.tags,
        author: input.author,
        co_authors: input.co_authors,
    };
    info!(id = %article.id, "created article");
    db.write().await.push(article.clone());
    (StatusCode::CREATED, Json(article))
}

async fn get_article(State(db): State<Db>, Path(id): Path<Uuid>) -> Response {
    let articles = db.read().await;
    match articles.iter().find(|article| article.id == id) {
        Some(article) => Json(article.clone()).into_response(),
        None => not_found(id),
    }
}

async fn update_article(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<ArticleInput>,
) -> Response {
    let mut articles = db.write().await;
    let Some(article) = articles.iter_mut().find(|article| article.id == id) else {
        return not_found(id);
    };
    let now = Utc::now();
    article.published_at = match (article.published_at, input.published) {
        (_, false) => None,
        (Some(at), true) => Some(at),
        (None, true) => Some(now),
    };
    article.updated_at = now;
    article.title = input.title;
    article.description = input.description;
    article.content = input.content;
    article.published = input.published;
    article.tags = input.tags;
    article.author = input.author;
    article.co_authors = input.co_authors;
    info!(%id, "updated article");
    Json(article.clone()).into_response()
}

async fn delete_article(State(db): State<Db>, Path(id): Path<Uuid>) -> Response {
    let mut articles = db.write().await;
    match articles.iter().position(|article| article.id == id) {
        Some(index) => {
            articles.remove(index);
            info!(%id, "deleted article");
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(id),
    }
}
