use crate::config::feeds::FeedRegistry;
use crate::config::FetcherConfig;
use crate::loader::{HttpFeedSource, LoadOutcome};
use crate::page::Page;
use crate::{Error, Result};

/// Print the feed registry
pub fn list_feeds(registry: &FeedRegistry) {
    for (index, feed) in registry.iter().enumerate() {
        println!("{index:>3}  {}  ({})", feed.name, feed.url);
    }
}

/// Load a single feed into the page and print what was rendered
pub async fn load_feed(page: &Page, index: usize) -> Result<()> {
    // Report a bad index directly instead of as a generic failure
    page.registry().get(index)?;

    match page.load_feed(index).await {
        LoadOutcome::Rendered { name, entries, .. } => {
            println!("\x1b[32m\u{2713}\x1b[0m {name} ({entries} entries)");
            for entry in page.entries().snapshot().entries {
                println!("  - {}", entry.title);
                if !entry.link.is_empty() {
                    println!("    {}", entry.link);
                }
            }
            Ok(())
        }
        LoadOutcome::Failed { kind, .. } => {
            println!("\x1b[31m\u{2717}\x1b[0m Feed #{index} failed to load");
            Err(Error::Internal(format!("Feed #{index} failed: {kind:?}")))
        }
        LoadOutcome::Superseded { latest, .. } => Err(Error::Internal(format!(
            "Feed #{index} was superseded by load {latest}"
        ))),
    }
}

/// Fetch and parse a feed URL, printing a short summary
pub async fn validate_feed(url: &str, config: &FetcherConfig) -> Result<()> {
    url::Url::parse(url)?;
    let source = HttpFeedSource::new(config)?;

    match source.fetch_feed(url).await {
        Ok(feed) => {
            println!(
                "\x1b[32m\u{2713}\x1b[0m Valid feed: \"{}\"",
                feed.title.as_deref().unwrap_or("Untitled Feed")
            );
            println!("  Type: {}", feed.feed_type);
            println!("  Entries: {}", feed.entries.len());

            if !feed.entries.is_empty() {
                println!("  Sample entries:");
                for entry in feed.entries.iter().take(3) {
                    println!("    - {}", entry.title);
                }
            }

            Ok(())
        }
        Err(e) => {
            println!("\x1b[31m\u{2717}\x1b[0m Invalid feed: {}", e);
            Err(e)
        }
    }
}
