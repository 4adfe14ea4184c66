//! UI states shared by the views.

use std::sync::Arc;

use articles_core::{ApiError, Article};
use uuid::Uuid;

/// State of a view that loads data on mount.
#[derive(Debug, Clone)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(Arc<ApiError>),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            LoadState::Failed(err) => Some(&**err),
            _ => None,
        }
    }
}

/// Outcome of the creation form's last submission.
#[derive(Debug, Clone, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Pending,
    Success(Article),
    Failed(Arc<ApiError>),
}

/// State of the detail view.
#[derive(Debug, Clone)]
pub enum DetailState {
    Loading,
    Loaded(Article),
    Failed(Arc<ApiError>),
    /// The article was deleted from this view.
    Deleted(Uuid),
}
