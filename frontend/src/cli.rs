//! Command-line front end driving the views.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use articles_core::{ArticleDraft, ArticleFilter, ArticlesApi, Transport};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use crate::app::{App, DEMO_ARTICLE_ID, SAMPLE_AUTHORS};
use crate::details::ArticleDetails;
use crate::form::CreateArticleForm;
use crate::list::{default_filter, ArticlesList};
use crate::state::{DetailState, LoadState, SubmitState};
use crate::view::{render_article, View};

#[derive(Debug, Parser)]
#[command(name = "articles", version, about = "Create, browse and delete articles")]
pub struct Cli {
    /// Articles resource URL; overrides ARTICLES_BACKEND_URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill in the creation form and submit it
    Create(ArticleFields),
    /// Show the article list
    List(FilterArgs),
    /// Show one article
    Show { id: Uuid },
    /// Replace fields of an existing article
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: ArticleFields,
    },
    /// Delete an article from its detail view
    Delete { id: Uuid },
    /// Render the form, the list and one article together
    App {
        #[arg(long, default_value_t = DEMO_ARTICLE_ID)]
        article_id: Uuid,
    },
}

#[derive(Debug, Default, Args)]
pub struct ArticleFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Rich content (HTML)
    #[arg(long)]
    pub content: Option<String>,
    #[arg(long)]
    pub published: Option<bool>,
    /// Repeat for several tags
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    #[arg(long)]
    pub author: Option<Uuid>,
    /// Repeat for several co-authors
    #[arg(long = "co-author")]
    pub co_authors: Vec<Uuid>,
}

impl ArticleFields {
    /// Overwrite every field given on the command line.
    fn apply_to(self, draft: &mut ArticleDraft) {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(content) = self.content {
            draft.content = content;
        }
        if let Some(published) = self.published {
            draft.published = published;
        }
        if !self.tags.is_empty() {
            draft.tags = self.tags;
        }
        if self.author.is_some() {
            draft.author = self.author;
        }
        if !self.co_authors.is_empty() {
            draft.co_authors = self.co_authors;
        }
    }
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub published: Option<bool>,
    #[arg(long)]
    pub author_id: Option<Uuid>,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub published_before: Option<DateTime<Utc>>,
    #[arg(long)]
    pub published_after: Option<DateTime<Utc>>,
}

impl From<FilterArgs> for ArticleFilter {
    fn from(args: FilterArgs) -> Self {
        ArticleFilter {
            published: args.published,
            author_id: args.author_id,
            limit: args.limit.or(default_filter().limit),
            published_before: args.published_before,
            published_after: args.published_after,
        }
    }
}

/// Execute `command` against `api` and return what should be printed.
pub async fn run<T: Transport + 'static>(
    command: Command,
    api: Arc<ArticlesApi<T>>,
) -> Result<String> {
    match command {
        Command::Create(fields) => create(api, fields).await,
        Command::List(filter) => {
            let mut list = ArticlesList::with_filter(api, filter.into());
            list.mount();
            list.settle().await;
            let out = list.render();
            if let LoadState::Failed(err) = list.state() {
                bail!("{err}");
            }
            Ok(out)
        }
        Command::Show { id } => {
            let mut details = ArticleDetails::new(api, id);
            details.mount();
            details.settle().await;
            let out = details.render();
            if let DetailState::Failed(err) = details.state() {
                bail!("{err}");
            }
            Ok(out)
        }
        Command::Update { id, fields } => {
            let current = api.get_article_by_id(id).await?;
            let mut draft = ArticleDraft::from(&current);
            fields.apply_to(&mut draft);
            let updated = api.update_article(id, &draft).await?;
            let mut out = String::new();
            render_article(&mut out, &updated);
            Ok(out)
        }
        Command::Delete { id } => {
            let mut details = ArticleDetails::new(api, id);
            details.mount();
            details.settle().await;
            if let DetailState::Failed(err) = details.state() {
                bail!("{err}");
            }
            details.delete();
            details.settle().await;
            if let Some(err) = details.delete_error() {
                bail!("{err}");
            }
            Ok(details.render())
        }
        Command::App { article_id } => {
            let mut app = App::new(api, SAMPLE_AUTHORS.to_vec(), article_id);
            app.mount();
            app.settle().await;
            let out = app.render();
            app.unmount();
            Ok(out)
        }
    }
}

async fn create<T: Transport + 'static>(
    api: Arc<ArticlesApi<T>>,
    fields: ArticleFields,
) -> Result<String> {
    let mut form = CreateArticleForm::new(api, SAMPLE_AUTHORS.to_vec());
    form.mount();
    if let Some(title) = fields.title {
        form.set_title(title);
    }
    if let Some(description) = fields.description {
        form.set_description(description);
    }
    if let Some(content) = fields.content {
        form.set_content(content);
    }
    form.set_published(fields.published.unwrap_or(false));
    for (index, tag) in fields.tags.into_iter().enumerate() {
        if index > 0 {
            form.add_tag();
        }
        form.set_tag(index, tag)?;
    }
    if let Some(author) = fields.author {
        form.select_author(author).context("--author")?;
    }
    form.set_co_authors(fields.co_authors).context("--co-author")?;

    match form.submit().await {
        SubmitState::Success(article) => {
            let mut out = String::new();
            render_article(&mut out, article);
            Ok(out)
        }
        SubmitState::Failed(err) => bail!("{err}"),
        SubmitState::Idle | SubmitState::Pending => bail!("submission did not complete"),
    }
}
