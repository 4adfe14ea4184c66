//! Headless front end for the articles service.
//!
//! # Overview
//! Three independent views share one `ArticlesApi`: `CreateArticleForm`
//! authors and submits a draft, `ArticlesList` shows a filtered list and
//! `ArticleDetails` shows one article. Each view owns its state and renders
//! itself to text; the `articles` binary drives them from the command line.
//!
//! # Design
//! - Views call the API on mount or on user action and update their own
//!   state from the response. There is no cache and no cross-view
//!   invalidation.
//! - Requests run on spawned tasks tied to the view's `Lifecycle`;
//!   unmounting cancels them and their results are never applied.
//! - Results travel back over a channel and are applied by `next_update`,
//!   `settle` or `apply_pending`.

pub mod app;
pub mod cli;
pub mod details;
pub mod form;
pub mod lifecycle;
pub mod list;
pub mod state;
pub mod view;

#[cfg(test)]
mod testing;

pub use app::{App, DEMO_ARTICLE_ID, SAMPLE_AUTHORS};
pub use details::ArticleDetails;
pub use form::{CreateArticleForm, FormError};
pub use list::ArticlesList;
pub use state::{DetailState, LoadState, SubmitState};
pub use view::View;
