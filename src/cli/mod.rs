// Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "feedreader")]
#[command(about = "Feedreader - a small single-page feed reader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the reader page
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// List the configured feeds
    Feeds,

    /// Load one feed and print its entries
    Load {
        /// Position of the feed in the registry
        index: usize,
    },

    /// Fetch and parse a feed URL
    Validate {
        /// Feed URL to validate
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_load_command() {
        let cli = Cli::try_parse_from(["feedreader", "load", "2"]).unwrap();
        assert!(matches!(cli.command, Commands::Load { index: 2 }));
    }

    #[test]
    fn test_reject_negative_index() {
        assert!(Cli::try_parse_from(["feedreader", "load", "-1"]).is_err());
    }
}
