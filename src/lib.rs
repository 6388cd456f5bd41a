pub mod config;
pub mod error;

// Feed loading
pub mod loader;

// Page state: entry container and menu
pub mod page;

// HTTP surface
pub mod api;
pub mod web;

pub mod cli;

// Utilities
pub mod utils;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
