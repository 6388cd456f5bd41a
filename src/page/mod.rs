// Page-level state: the entry container and the slide-out menu, owned together
// and handed to whoever drives the page (the web layer, the CLI, tests).

pub mod entries;
pub mod menu;

use crate::config::feeds::FeedRegistry;
use crate::config::Settings;
use crate::error::Result;
use crate::loader::{FeedLoader, FeedSource, HttpFeedSource, LoadOutcome};
use entries::EntryContainer;
use menu::{MarkerSurface, MenuController, MenuState, PageRoot};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// Snapshot of the menu as the page presents it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuView {
    pub state: MenuState,
    pub marker: bool,
    pub body_class: String,
    pub transform: &'static str,
}

pub struct Page {
    loader: Arc<FeedLoader>,
    entries: Arc<EntryContainer>,
    menu: Mutex<MenuController<PageRoot>>,
}

impl Page {
    /// Build a page around any feed source; rendering goes to a fresh entry container
    pub fn new(registry: FeedRegistry, source: Arc<dyn FeedSource>) -> Self {
        let entries = Arc::new(EntryContainer::new());
        let loader = Arc::new(FeedLoader::new(
            Arc::new(registry),
            source,
            entries.clone(),
        ));

        Self {
            loader,
            entries,
            menu: Mutex::new(MenuController::default()),
        }
    }

    /// Build the page from settings: registry from disk (or built-in), HTTP source
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let registry = FeedRegistry::load_or_builtin(&settings.feeds.config_path)?;
        let source = HttpFeedSource::new(&settings.fetcher)?;
        info!("Page initialized with {} feeds", registry.len());
        Ok(Self::new(registry, Arc::new(source)))
    }

    pub fn registry(&self) -> &FeedRegistry {
        self.loader.registry()
    }

    pub fn loader(&self) -> &Arc<FeedLoader> {
        &self.loader
    }

    pub fn entries(&self) -> &EntryContainer {
        &self.entries
    }

    pub async fn load_feed(&self, index: usize) -> LoadOutcome {
        self.loader.load(index).await
    }

    /// A feed was picked from the menu: close the menu, then load it
    pub async fn select_feed(&self, index: usize) -> LoadOutcome {
        self.with_menu(|menu| menu.hide());
        self.loader.load(index).await
    }

    /// Menu icon activation
    pub fn toggle_menu(&self) -> MenuState {
        self.with_menu(|menu| menu.toggle())
    }

    pub fn menu(&self) -> MenuView {
        self.with_menu(|menu| {
            let root = menu.surface();
            MenuView {
                state: menu.state(),
                marker: root.has_marker(),
                body_class: root.class_attr(),
                transform: root.menu_transform(),
            }
        })
    }

    fn with_menu<T>(&self, f: impl FnOnce(&mut MenuController<PageRoot>) -> T) -> T {
        let mut menu = self.menu.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::feeds::Feed;
    use crate::error::Error;
    use crate::loader::{Entry, EntryList};
    use async_trait::async_trait;

    struct OneEntrySource;

    #[async_trait]
    impl FeedSource for OneEntrySource {
        async fn fetch_entries(&self, url: &str) -> crate::Result<EntryList> {
            if url.ends_with("broken.xml") {
                return Err(Error::FeedParse("broken".to_string()));
            }
            Ok(vec![Entry {
                title: format!("Latest from {url}"),
                link: url.to_string(),
                content: String::new(),
            }])
        }
    }

    fn page() -> Page {
        let registry = FeedRegistry::new(vec![
            Feed::new("https://example.com/a.xml", "Feed A"),
            Feed::new("https://example.com/broken.xml", "Broken"),
        ])
        .unwrap();
        Page::new(registry, Arc::new(OneEntrySource))
    }

    #[test]
    fn test_initial_menu_view() {
        let page = page();
        let view = page.menu();
        assert_eq!(view.state, MenuState::Hidden);
        assert!(view.marker);
        assert_eq!(view.body_class, "menu-hidden");
        assert_eq!(view.transform, menu::HIDDEN_TRANSFORM);
    }

    #[tokio::test]
    async fn test_select_feed_hides_menu_and_loads() {
        let page = page();
        page.toggle_menu();
        assert_eq!(page.menu().state, MenuState::Visible);

        let outcome = page.select_feed(0).await;

        assert!(outcome.is_rendered());
        assert_eq!(page.menu().state, MenuState::Hidden);
        assert_eq!(page.entries().snapshot().title.as_deref(), Some("Feed A"));
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_entries() {
        let page = page();
        page.load_feed(0).await;
        let before = page.entries().titles();

        let outcome = page.load_feed(1).await;

        assert!(!outcome.is_rendered());
        assert_eq!(page.entries().titles(), before);
    }
}
