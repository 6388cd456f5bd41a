use crate::error::{Error, Result};
use crate::utils::validation::validate_url;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// A named remote feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub url: String,
    pub name: String,
}

impl Feed {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

/// On-disk shape of the registry file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistryFile {
    version: u32,
    feeds: Vec<Feed>,
}

/// Ordered, immutable list of known feeds.
///
/// A registry is only ever constructed through validation, so every instance is
/// non-empty and every feed has a non-empty name and an absolute http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedRegistry {
    feeds: Vec<Feed>,
}

impl FeedRegistry {
    /// Build a registry from a list of feeds, validating every entry
    pub fn new(feeds: Vec<Feed>) -> Result<Self> {
        let registry = Self { feeds };
        registry.validate()?;
        Ok(registry)
    }

    /// The feeds the reader ships with
    pub fn builtin() -> Self {
        Self {
            feeds: vec![
                Feed::new("http://blog.udacity.com/feed", "Udacity Blog"),
                Feed::new("http://feeds.feedburner.com/CssTricks", "CSS Tricks"),
                Feed::new("http://feeds.feedburner.com/html5rocks", "HTML5 Rocks"),
                Feed::new(
                    "http://feeds.feedburner.com/udacity-linear-digressions",
                    "Linear Digressions",
                ),
            ],
        }
    }

    /// Load the registry from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read feed registry from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_yaml_str(&content).map_err(|e| {
            Error::Config(format!(
                "Invalid feed registry in {}: {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: RegistryFile = serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse feed registry: {e}")))?;

        if file.version != 1 {
            return Err(Error::Config(format!(
                "Unsupported registry version: {}. Expected version 1",
                file.version
            )));
        }

        Self::new(file.feeds)
    }

    /// Load the registry from `path`, falling back to the built-in list when the
    /// file does not exist. A file that exists but is invalid is still an error.
    pub fn load_or_builtin<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "Feed registry {} not found, using built-in feeds",
                path.display()
            );
            return Ok(Self::builtin());
        }

        let registry = Self::from_file(path)?;
        info!(
            "Loaded {} feeds from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    fn validate(&self) -> Result<()> {
        if self.feeds.is_empty() {
            return Err(Error::Config(
                "Feed registry must contain at least one feed".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for (index, feed) in self.feeds.iter().enumerate() {
            validate_feed(feed)
                .map_err(|e| Error::Config(format!("Feed #{index} ({}): {e}", feed.url)))?;

            if !seen.insert(feed.url.as_str()) {
                return Err(Error::Config(format!("Duplicate feed URL: {}", feed.url)));
            }
        }

        Ok(())
    }

    /// Look up a feed by position
    pub fn get(&self, index: usize) -> Result<&Feed> {
        self.feeds.get(index).ok_or(Error::InvalidFeedIndex {
            index,
            len: self.feeds.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feed> {
        self.feeds.iter()
    }
}

fn validate_feed(feed: &Feed) -> Result<()> {
    if feed.url.trim().is_empty() {
        return Err(Error::Validation("Feed URL cannot be empty".to_string()));
    }

    if feed.name.trim().is_empty() {
        return Err(Error::Validation("Feed name cannot be empty".to_string()));
    }

    validate_url(&feed.url)?;

    Ok(())
}
