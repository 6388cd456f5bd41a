use crate::error::{Error, Result};
use crate::loader::Entry;
use crate::utils::validation::safe_link;
use feed_rs::model::FeedType;
use feed_rs::parser;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub feed_type: String,
    pub entries: Vec<Entry>,
}

/// Parse an RSS, Atom or JSON feed document
pub fn parse_feed(content: &str) -> Result<ParsedFeed> {
    let feed = parser::parse(content.as_bytes())
        .map_err(|e| Error::FeedParse(format!("Failed to parse feed: {e}")))?;

    debug!(
        "Parsed feed: {}",
        feed.title
            .as_ref()
            .map(|t| t.content.as_str())
            .unwrap_or("Untitled")
    );

    let feed_type = match feed.feed_type {
        FeedType::Atom => "Atom",
        FeedType::RSS0 => "RSS 0.x",
        FeedType::RSS1 => "RSS 1.0",
        FeedType::RSS2 => "RSS 2.0",
        FeedType::JSON => "JSON Feed",
    }
    .to_string();

    let title = feed.title.map(|t| t.content);

    let entries = feed
        .entries
        .into_iter()
        .filter_map(|entry| match parse_entry(entry) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Failed to parse entry: {}", e);
                None
            }
        })
        .collect();

    Ok(ParsedFeed {
        title,
        feed_type,
        entries,
    })
}

fn parse_entry(entry: feed_rs::model::Entry) -> Result<Entry> {
    let title = entry
        .title
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::FeedParse(format!("Entry {} missing title", entry.id)))?;

    // Prefer the alternate link, then whatever link comes first. Only http(s)
    // links are kept since they end up in an href.
    let link = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref() == Some("alternate") || l.rel.is_none())
        .or_else(|| entry.links.first())
        .map(|l| safe_link(&l.href).to_string())
        .unwrap_or_default();

    let content = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body))
        .unwrap_or_default();

    Ok(Entry {
        title,
        link,
        content,
    })
}
