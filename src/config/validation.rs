use crate::config::types::{Config, ExtractorConfig, FetcherConfig, OutputConfig, SourceConfig};
use crate::ConfigError;
use chrono::NaiveDate;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_extractor_config(&config.extractor)?;
    validate_output_config(&config.output)?;

    if config.user_agent.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the search source
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    validate_date("start-date", &config.start_date)?;
    validate_date("end-date", &config.end_date)?;

    // Building the URL catches a malformed search-path
    config.search_url()?;

    Ok(())
}

/// Validates fetch limits
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates report selectors and the checked-box marker
fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    for selector in [
        &config.top_section_selector,
        &config.field_selector,
        &config.violation_table_selector,
    ] {
        Selector::parse(selector)
            .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))?;
    }

    if config.checked_box_image.trim().is_empty() {
        return Err(ConfigError::Validation(
            "checked_box_image cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks a MM/DD/YYYY date
fn validate_date(name: &str, value: &str) -> Result<(), ConfigError> {
    NaiveDate::parse_from_str(value, "%m/%d/%Y").map_err(|_| {
        ConfigError::Validation(format!("{} must be MM/DD/YYYY, got '{}'", name, value))
    })?;
    Ok(())
}
