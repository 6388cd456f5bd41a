// Feed loading pipeline: resolve a registry index, fetch the feed, replace the
// rendered entry list.

pub mod fetcher;
pub mod parser;

use crate::config::feeds::FeedRegistry;
use crate::config::FetcherConfig;
use crate::error::{Error, FailureKind, Result};
use async_trait::async_trait;
use fetcher::Fetcher;
use parser::{parse_feed, ParsedFeed};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// One item within a feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub link: String,
    /// Summary or body, may contain HTML
    pub content: String,
}

pub type EntryList = Vec<Entry>;

/// Retrieves and parses the entries of a feed
///
/// `#[async_trait]` keeps the trait object safe so the loader can hold an
/// `Arc<dyn FeedSource>`.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_entries(&self, url: &str) -> Result<EntryList>;
}

/// Replaces the visible entry list with a feed's entries
pub trait Renderer: Send + Sync {
    fn render(&self, name: &str, entries: &[Entry]) -> Result<()>;
}

/// Feed source backed by HTTP retrieval and feed-rs parsing
pub struct HttpFeedSource {
    fetcher: Fetcher,
}

impl HttpFeedSource {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        Ok(Self::with_fetcher(Fetcher::new(config)?))
    }

    pub fn with_fetcher(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch and parse a feed, keeping its metadata
    pub async fn fetch_feed(&self, url: &str) -> Result<ParsedFeed> {
        let result = self.fetcher.fetch(url).await?;
        parse_feed(&result.content)
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_entries(&self, url: &str) -> Result<EntryList> {
        Ok(self.fetch_feed(url).await?.entries)
    }
}

/// How a single load ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// The feed's entries replaced the rendered list
    Rendered {
        index: usize,
        name: String,
        entries: usize,
        generation: u64,
    },
    /// A newer load started before this one reached the render step
    Superseded {
        index: usize,
        generation: u64,
        latest: u64,
    },
    /// The load failed; the rendered list was left as it was
    Failed { index: usize, kind: FailureKind },
}

impl LoadOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, LoadOutcome::Rendered { .. })
    }
}

/// Loads one feed at a time into a renderer.
///
/// Every load that passes index validation takes a new generation. The render
/// step runs under `render_gate`, and a load only renders if its generation is
/// still the latest once it holds the gate. A slow load can therefore never
/// overwrite the entries of a load that started after it.
pub struct FeedLoader {
    registry: Arc<FeedRegistry>,
    source: Arc<dyn FeedSource>,
    renderer: Arc<dyn Renderer>,
    generation: AtomicU64,
    render_gate: Mutex<()>,
}

impl FeedLoader {
    pub fn new(
        registry: Arc<FeedRegistry>,
        source: Arc<dyn FeedSource>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            registry,
            source,
            renderer,
            generation: AtomicU64::new(0),
            render_gate: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &FeedRegistry {
        &self.registry
    }

    /// Generation of the most recently started load (0 before any load)
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Load the feed at `index` and wait for it to complete.
    ///
    /// Never returns an error: failures are logged and reported as
    /// [`LoadOutcome::Failed`].
    pub async fn load(&self, index: usize) -> LoadOutcome {
        match self.try_load(index).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to load feed #{}: {}", index, e.log_safe());
                LoadOutcome::Failed {
                    index,
                    kind: e.failure_kind(),
                }
            }
        }
    }

    /// Load the feed at `index`, then invoke `on_complete` exactly once with the outcome
    pub async fn load_with<F>(&self, index: usize, on_complete: F) -> LoadOutcome
    where
        F: FnOnce(&LoadOutcome),
    {
        let outcome = self.load(index).await;
        on_complete(&outcome);
        outcome
    }

    /// Run [`load_with`](Self::load_with) as a background task
    pub fn spawn_load<F>(self: &Arc<Self>, index: usize, on_complete: F) -> JoinHandle<LoadOutcome>
    where
        F: FnOnce(&LoadOutcome) + Send + 'static,
    {
        let loader = Arc::clone(self);
        tokio::spawn(async move { loader.load_with(index, on_complete).await })
    }

    async fn try_load(&self, index: usize) -> Result<LoadOutcome> {
        let feed = self.registry.get(index)?;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        debug!(
            "Loading feed #{} {} ({}) as generation {}",
            index, feed.name, feed.url, generation
        );

        let entries = self.source.fetch_entries(&feed.url).await?;
        if entries.is_empty() {
            return Err(Error::FeedParse(format!(
                "Feed {} contains no entries",
                feed.name
            )));
        }

        let _gate = self.render_gate.lock().await;

        let latest = self.latest_generation();
        if latest != generation {
            debug!(
                "Dropping render of feed #{} (generation {}, latest {})",
                index, generation, latest
            );
            return Ok(LoadOutcome::Superseded {
                index,
                generation,
                latest,
            });
        }

        self.renderer.render(&feed.name, &entries)?;

        info!(
            "Loaded feed {}: {} entries (generation {})",
            feed.name,
            entries.len(),
            generation
        );

        Ok(LoadOutcome::Rendered {
            index,
            name: feed.name.clone(),
            entries: entries.len(),
            generation,
        })
    }
}
