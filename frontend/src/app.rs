//! Composition root: one shared client, three independent views.

use std::sync::Arc;

use articles_core::{ArticlesApi, Transport};
use uuid::Uuid;

use crate::details::ArticleDetails;
use crate::form::CreateArticleForm;
use crate::list::ArticlesList;
use crate::view::View;

/// Authors offered by the creation form when none are configured.
pub const SAMPLE_AUTHORS: [Uuid; 4] = [
    Uuid::from_u128(0xbd957105_44a2_46f1_8e52_1c75779d6c88),
    Uuid::from_u128(0x79f09b9f_86c6_4216_b7b6_044b3e86b512),
    Uuid::from_u128(0x982d5bfd_1df8_4512_b233_c1e437063a25),
    Uuid::from_u128(0x5acf6932_0c71_4794_9fdf_0dabe428b6c8),
];

/// Article the detail view opens with by default.
pub const DEMO_ARTICLE_ID: Uuid = Uuid::from_u128(0x505646b3_4c9e_4ec4_9865_3f7805874b54);

const SEPARATOR: &str = "-----------------------------------------------------";

/// The three views side by side. They share the client and nothing else: a
/// delete in one does not refresh another.
pub struct App<T> {
    pub form: CreateArticleForm<T>,
    pub list: ArticlesList<T>,
    pub details: ArticleDetails<T>,
}

impl<T: Transport + 'static> App<T> {
    pub fn new(api: Arc<ArticlesApi<T>>, authors: Vec<Uuid>, article_id: Uuid) -> Self {
        Self {
            form: CreateArticleForm::new(Arc::clone(&api), authors),
            list: ArticlesList::new(Arc::clone(&api)),
            details: ArticleDetails::new(api, article_id),
        }
    }

    pub fn mount(&mut self) {
        self.form.mount();
        self.list.mount();
        self.details.mount();
    }

    pub fn unmount(&mut self) {
        self.form.unmount();
        self.list.unmount();
        self.details.unmount();
    }

    /// Wait for both loading views to finish their in-flight requests.
    pub async fn settle(&mut self) {
        tokio::join!(self.list.settle(), self.details.settle());
    }
}

impl<T> View for App<T> {
    fn render(&self) -> String {
        let separator = format!("\n{SEPARATOR}\n\n");
        [self.form.render(), self.list.render(), self.details.render()].join(separator.as_str())
    }
}
