use crate::error::{Error, Result};
use crate::loader::{Entry, EntryList, Renderer};
use crate::utils::sanitize::snippet;
use crate::utils::validation::safe_link;
use askama::Template;
use serde::Serialize;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

const SNIPPET_CHARS: usize = 200;

/// Entry list fragment placed inside the `.feed` container
#[derive(Template)]
#[template(path = "feed.html")]
struct FeedTemplate<'a> {
    entries: Vec<EntryView<'a>>,
}

#[allow(dead_code)] // Fields are used by Askama templates
struct EntryView<'a> {
    title: &'a str,
    link: &'a str,
    snippet: String,
}

/// What the page currently shows for the loaded feed
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderedFeed {
    /// Header title, the name of the rendered feed
    pub title: Option<String>,
    pub entries: EntryList,
    /// Markup of the `.feed` container
    #[serde(skip)]
    pub html: String,
}

/// The page's entry container. Each render replaces title, entries and markup
/// together, so readers never see a mix of two feeds.
#[derive(Debug, Default)]
pub struct EntryContainer {
    current: RwLock<RenderedFeed>,
}

impl EntryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> RenderedFeed {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .map(|e| e.title.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Renderer for EntryContainer {
    fn render(&self, name: &str, entries: &[Entry]) -> Result<()> {
        let template = FeedTemplate {
            entries: entries
                .iter()
                .map(|e| EntryView {
                    title: &e.title,
                    link: safe_link(&e.link),
                    snippet: snippet(&e.content, SNIPPET_CHARS),
                })
                .collect(),
        };
        let html = template.render()?;

        let mut current = self
            .current
            .write()
            .map_err(|_| Error::Render("entry container lock poisoned".to_string()))?;
        *current = RenderedFeed {
            title: Some(name.to_string()),
            entries: entries.to_vec(),
            html,
        };

        debug!("Rendered {} entries for {}", entries.len(), name);
        Ok(())
    }
}
