pub mod feeds;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub fetcher: FetcherConfig,
    pub feeds: FeedsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub max_feed_size: usize,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedsConfig {
    /// YAML registry file; the built-in feed list is used when it is missing
    pub config_path: PathBuf,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_retries: 3,
            max_feed_size: 5_242_880,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("Feedreader/{}", env!("CARGO_PKG_VERSION"))
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid PORT value".to_string()))?;

        let timeout_seconds = std::env::var("FETCH_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid FETCH_TIMEOUT value".to_string()))?;

        let max_retries = std::env::var("FETCH_MAX_RETRIES")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid FETCH_MAX_RETRIES value".to_string()))?;

        let max_feed_size = std::env::var("MAX_FEED_SIZE")
            .unwrap_or_else(|_| "5242880".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MAX_FEED_SIZE value".to_string()))?;

        let user_agent = std::env::var("USER_AGENT").unwrap_or_else(|_| default_user_agent());

        let config_path = std::env::var("FEEDS_CONFIG_PATH")
            .unwrap_or_else(|_| "config/feeds.yaml".to_string())
            .into();

        Ok(Settings {
            server: ServerConfig { host, port },
            fetcher: FetcherConfig {
                timeout_seconds,
                max_retries,
                max_feed_size,
                user_agent,
            },
            feeds: FeedsConfig { config_path },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.fetcher.timeout_seconds == 0 {
            return Err(Error::Config("Fetch timeout must be non-zero".to_string()));
        }

        if self.fetcher.max_feed_size == 0 {
            return Err(Error::Config("Max feed size must be non-zero".to_string()));
        }

        if self.fetcher.user_agent.trim().is_empty() {
            return Err(Error::Config("User agent cannot be empty".to_string()));
        }

        Ok(())
    }
}
