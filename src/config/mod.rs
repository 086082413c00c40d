//! Configuration module for Inspection-Scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so a run without a config file targets the
//! Napa County inspection site.
//!
//! # Example
//!
//! ```no_run
//! use inspection_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Database: {}", config.output.database_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ExtractorConfig, FetcherConfig, OutputConfig, SourceConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{load_config, load_or_default};
pub use validation::validate;
