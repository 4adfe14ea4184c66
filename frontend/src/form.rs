//! Article creation form.
//!
//! Holds a draft and the fixed author list it may pick from. Submission is
//! awaited and its outcome is kept in `SubmitState`.

use std::fmt::Write;
use std::sync::Arc;

use articles_core::{ArticleDraft, ArticlesApi, Transport};
use tracing::{info, warn};
use uuid::Uuid;

use crate::lifecycle::Lifecycle;
use crate::state::SubmitState;
use crate::view::View;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("tag index {index} is out of range ({len} tags)")]
    TagOutOfRange { index: usize, len: usize },
    #[error("{0} is not one of the available authors")]
    UnknownAuthor(Uuid),
}

pub struct CreateArticleForm<T> {
    api: Arc<ArticlesApi<T>>,
    authors: Vec<Uuid>,
    draft: ArticleDraft,
    submit_state: SubmitState,
    lifecycle: Lifecycle,
}

/// A fresh draft: everything empty, one blank tag slot.
pub fn initial_draft() -> ArticleDraft {
    ArticleDraft {
        tags: vec![String::new()],
        ..Default::default()
    }
}

impl<T: Transport> CreateArticleForm<T> {
    pub fn new(api: Arc<ArticlesApi<T>>, authors: Vec<Uuid>) -> Self {
        Self {
            api,
            authors,
            draft: initial_draft(),
            submit_state: SubmitState::Idle,
            lifecycle: Lifecycle::default(),
        }
    }

    pub fn mount(&mut self) {
        self.lifecycle.mount();
    }

    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn draft(&self) -> &ArticleDraft {
        &self.draft
    }

    pub fn authors(&self) -> &[Uuid] {
        &self.authors
    }

    pub fn submit_state(&self) -> &SubmitState {
        &self.submit_state
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    /// Rich content from the editor, stored verbatim.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.draft.content = content.into();
    }

    pub fn set_published(&mut self, published: bool) {
        self.draft.published = published;
    }

    /// Append an empty tag slot.
    pub fn add_tag(&mut self) {
        self.draft.tags.push(String::new());
    }

    pub fn set_tag(&mut self, index: usize, value: impl Into<String>) -> Result<(), FormError> {
        let len = self.draft.tags.len();
        let tag = self
            .draft
            .tags
            .get_mut(index)
            .ok_or(FormError::TagOutOfRange { index, len })?;
        *tag = value.into();
        Ok(())
    }

    pub fn remove_tag(&mut self, index: usize) -> Result<String, FormError> {
        let len = self.draft.tags.len();
        if index >= len {
            return Err(FormError::TagOutOfRange { index, len });
        }
        Ok(self.draft.tags.remove(index))
    }

    fn known(&self, id: Uuid) -> Result<Uuid, FormError> {
        if self.authors.contains(&id) {
            Ok(id)
        } else {
            Err(FormError::UnknownAuthor(id))
        }
    }

    pub fn select_author(&mut self, id: Uuid) -> Result<(), FormError> {
        self.draft.author = Some(self.known(id)?);
        Ok(())
    }

    pub fn clear_author(&mut self) {
        self.draft.author = None;
    }

    /// Replace the co-author selection. Nothing changes if any id is unknown.
    pub fn set_co_authors(&mut self, ids: Vec<Uuid>) -> Result<(), FormError> {
        for id in &ids {
            self.known(*id)?;
        }
        self.draft.co_authors = ids;
        Ok(())
    }

    /// Flip one co-author in or out of the selection; returns whether it is
    /// now selected.
    pub fn toggle_co_author(&mut self, id: Uuid) -> Result<bool, FormError> {
        self.known(id)?;
        let co_authors = &mut self.draft.co_authors;
        match co_authors.iter().position(|c| *c == id) {
            Some(index) => {
                co_authors.remove(index);
                Ok(false)
            }
            None => {
                co_authors.push(id);
                Ok(true)
            }
        }
    }

    /// Send the current draft and wait for the outcome.
    ///
    /// On success the draft is reset; on failure it is kept for another try.
    /// If the form is unmounted while the request is in flight the result is
    /// dropped and the state returns to `Idle`.
    pub async fn submit(&mut self) -> &SubmitState {
        let Some(token) = self.lifecycle.request_token() else {
            warn!("submit ignored: form is not mounted");
            return &self.submit_state;
        };
        self.submit_state = SubmitState::Pending;
        let api = Arc::clone(&self.api);
        let draft = self.draft.clone();

        let result = tokio::select! {
            _ = token.cancelled() => None,
            result = api.create_article(&draft) => Some(result),
        };

        self.submit_state = match result {
            None => SubmitState::Idle,
            Some(Ok(article)) => {
                info!(id = %article.id, "article created");
                self.draft = initial_draft();
                SubmitState::Success(article)
            }
            Some(Err(err)) => {
                warn!(error = %err, "error submitting article");
                SubmitState::Failed(Arc::new(err))
            }
        };
        &self.submit_state
    }
}

impl<T> View for CreateArticleForm<T> {
    fn render(&self) -> String {
        let draft = &self.draft;
        let mut out = String::new();
        let _ = writeln!(out, "Title: {}", draft.title);
        let _ = writeln!(out, "Description: {}", draft.description);
        let _ = writeln!(out, "Content: {}", draft.content);
        let _ = writeln!(out, "Published: [{}]", if draft.published { "x" } else { " " });
        for (index, tag) in draft.tags.iter().enumerate() {
            let _ = writeln!(out, "Tag {}: {}", index + 1, tag);
        }
        match draft.author {
            Some(author) => {
                let _ = writeln!(out, "Author: {author}");
            }
            None => out.push_str("Author: (select author)\n"),
        }
        for author in &self.authors {
            let mark = if draft.co_authors.contains(author) { "x" } else { " " };
            let _ = writeln!(out, "Co-author [{mark}] {author}");
        }
        match &self.submit_state {
            SubmitState::Idle => {}
            SubmitState::Pending => out.push_str("Submitting...\n"),
            SubmitState::Success(article) => {
                let _ = writeln!(out, "Created article {}", article.id);
            }
            SubmitState::Failed(err) => {
                let _ = writeln!(out, "Error: {err}");
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SAMPLE_AUTHORS;
    use crate::testing::{api, article_json, respond, StubTransport};
    use articles_core::HttpMethod;

    fn form(transport: StubTransport) -> CreateArticleForm<StubTransport> {
        let mut form = CreateArticleForm::new(api(transport), SAMPLE_AUTHORS.to_vec());
        form.mount();
        form
    }

    fn created() -> StubTransport {
        StubTransport::new(|_| respond(201, article_json(Uuid::from_u128(5), "Hello", false)))
    }

    #[test]
    fn starts_with_one_empty_tag() {
        let form = form(created());
        assert_eq!(form.draft().tags, vec![String::new()]);
        assert!(form.draft().author.is_none());
        assert!(matches!(form.submit_state(), SubmitState::Idle));
    }

    #[test]
    fn tags_can_be_added_edited_and_removed_anywhere() {
        let mut form = form(created());
        form.add_tag();
        form.add_tag();
        form.set_tag(0, "a").unwrap();
        form.set_tag(1, "b").unwrap();
        form.set_tag(2, "c").unwrap();
        assert_eq!(form.remove_tag(1).unwrap(), "b");
        assert_eq!(form.draft().tags, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(
            form.set_tag(5, "x"),
            Err(FormError::TagOutOfRange { index: 5, len: 2 })
        );
        assert!(form.remove_tag(2).is_err());
    }

    #[test]
    fn authors_must_come_from_the_supplied_list() {
        let mut form = form(created());
        let stranger = Uuid::from_u128(99);
        assert_eq!(form.select_author(stranger), Err(FormError::UnknownAuthor(stranger)));
        form.select_author(SAMPLE_AUTHORS[2]).unwrap();
        assert_eq!(form.draft().author, Some(SAMPLE_AUTHORS[2]));

        assert!(form
            .set_co_authors(vec![SAMPLE_AUTHORS[0], stranger])
            .is_err());
        assert!(form.draft().co_authors.is_empty());

        assert!(form.toggle_co_author(SAMPLE_AUTHORS[1]).unwrap());
        assert!(form.toggle_co_author(SAMPLE_AUTHORS[3]).unwrap());
        assert!(!form.toggle_co_author(SAMPLE_AUTHORS[1]).unwrap());
        assert_eq!(form.draft().co_authors, vec![SAMPLE_AUTHORS[3]]);
    }

    #[tokio::test]
    async fn submit_posts_the_exact_draft_shape() {
        let mut form = form(created());
        form.set_title("Hello");
        form.set_content("<p>World</p>");
        form.set_published(false);
        form.set_tag(0, "intro").unwrap();
        form.select_author(SAMPLE_AUTHORS[0]).unwrap();
        form.set_co_authors(Vec::new()).unwrap();

        let state = form.submit().await;
        assert!(matches!(state, SubmitState::Success(a) if a.id == Uuid::from_u128(5)));

        let requests = form.api.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "title": "Hello",
                "description": "",
                "content": "<p>World</p>",
                "published": false,
                "tags": ["intro"],
                "author": SAMPLE_AUTHORS[0],
                "co_authors": [],
            })
        );
    }

    #[tokio::test]
    async fn success_resets_the_draft() {
        let mut form = form(created());
        form.set_title("Hello");
        form.add_tag();
        form.submit().await;
        assert_eq!(form.draft(), &initial_draft());
    }

    #[tokio::test]
    async fn failure_keeps_the_draft_and_reports() {
        let mut form = form(StubTransport::new(|_| respond(500, "database down")));
        form.set_title("Keep me");
        let state = form.submit().await;
        let SubmitState::Failed(err) = state else {
            panic!("expected failure");
        };
        assert!(err.to_string().contains("database down"));
        assert_eq!(form.draft().title, "Keep me");
        assert!(form.render().contains("Error: failed to create article"));
    }

    #[tokio::test]
    async fn unmounted_form_does_not_submit() {
        let mut form = CreateArticleForm::new(api(created()), SAMPLE_AUTHORS.to_vec());
        let state = form.submit().await;
        assert!(matches!(state, SubmitState::Idle));
        assert!(form.api.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn unmount_during_submit_discards_the_result() {
        let mut form = form(StubTransport::new(|_| None));
        let handle = form.lifecycle().handle().unwrap();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            handle.cancel();
        });
        let state = form.submit().await;
        assert!(matches!(state, SubmitState::Idle));
        assert_eq!(form.api.transport().requests().len(), 1);
        assert!(!form.lifecycle().is_mounted());
    }

    #[tokio::test]
    async fn remount_after_cancelled_handle_submits_again() {
        let mut form = form(created());
        form.lifecycle().handle().unwrap().cancel();
        form.set_title("Second try");
        assert!(matches!(form.submit().await, SubmitState::Idle));
        assert!(form.api.transport().requests().is_empty());

        form.mount();
        assert!(matches!(form.submit().await, SubmitState::Success(_)));
        assert_eq!(form.api.transport().requests().len(), 1);
    }

    #[test]
    fn render_shows_selection() {
        let mut form = form(created());
        form.set_title("T");
        form.set_published(true);
        form.select_author(SAMPLE_AUTHORS[0]).unwrap();
        form.toggle_co_author(SAMPLE_AUTHORS[1]).unwrap();
        let out = form.render();
        assert!(out.contains("Title: T\n"));
        assert!(out.contains("Published: [x]\n"));
        assert!(out.contains("Tag 1: \n"));
        assert!(out.contains(&format!("Author: {}\n", SAMPLE_AUTHORS[0])));
        assert!(out.contains(&format!("Co-author [x] {}\n", SAMPLE_AUTHORS[1])));
        assert!(out.contains(&format!("Co-author [ ] {}\n", SAMPLE_AUTHORS[2])));
    }
}
