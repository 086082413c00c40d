//! Inspection-Scraper: a health-inspection record harvester
//!
//! This crate walks the county search-results listing, follows each
//! inspection link through its intermediate page to the full report,
//! extracts facility and violation details, and stores them in SQLite for
//! later display.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod output;
pub mod pipeline;
pub mod storage;

use thiserror::Error;

/// Main error type for Inspection-Scraper operations
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to retrieve {url}: {reason}")]
    Retrieval { url: String, reason: String },

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Could not parse {field} from '{value}': {reason}")]
    Parse {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl InspectError {
    /// Builds a parse error for the named field
    pub fn parse(field: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns true if the error should abort the whole run
    ///
    /// Retrieval, extraction and parse failures only affect the page being
    /// processed; everything else means the run cannot continue.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::Retrieval { .. } | Self::Extraction(_) | Self::Parse { .. } | Self::UrlParse(_)
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// Result type alias for Inspection-Scraper operations
pub type Result<T> = std::result::Result<T, InspectError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{list_report_targets, resolve_final_report, ReportExtractor};
pub use storage::{Facility, InspectionReport, Violation};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_errors_are_not_fatal() {
        let retrieval = InspectError::Retrieval {
            url: "http://example.com/".to_string(),
            reason: "HTTP 500".to_string(),
        };
        assert!(!retrieval.is_fatal());
        assert!(!InspectError::Extraction("missing".to_string()).is_fatal());
        assert!(!InspectError::parse("address", "x", "bad").is_fatal());
    }

    #[test]
    fn test_storage_errors_are_fatal() {
        let sqlite = rusqlite::Error::InvalidQuery;
        let err = InspectError::Storage(storage::StorageError::Sqlite(sqlite));
        assert!(err.is_fatal());

        let config = InspectError::Config(ConfigError::Validation("bad".to_string()));
        assert!(config.is_fatal());
    }

    #[test]
    fn test_parse_error_names_field() {
        let err = InspectError::parse("address", "nowhere", "missing ','");
        let message = err.to_string();
        assert!(message.contains("address"));
        assert!(message.contains("nowhere"));
    }
}
