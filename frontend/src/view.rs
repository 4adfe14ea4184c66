//! Plain-text rendering shared by the views.

use std::fmt::Write;

use articles_core::Article;

/// Anything that can draw itself.
pub trait View {
    fn render(&self) -> String;
}

pub const LOADING: &str = "Loading...";

/// Append the article card used by both the list and the detail view.
pub fn render_article(out: &mut String, article: &Article) {
    let _ = writeln!(out, "Title: {}", article.title);
    let _ = writeln!(out, "Article ID: {}", article.id);
    if !article.description.is_empty() {
        let _ = writeln!(out, "{}", article.description);
    }
    let _ = writeln!(out, "{}", article.content);
    if !article.tags.is_empty() {
        let _ = writeln!(out, "Tags: {}", article.tags.join(", "));
    }
    let _ = writeln!(out, "Is published: {}", article.published);
}
