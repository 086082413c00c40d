use crate::ConfigError;
use serde::Deserialize;
use url::Url;

/// Main configuration structure for Inspection-Scraper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the search listing lives and which date range it covers
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory URL the search page and intermediate pages live under
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Search page path relative to `base-url`
    #[serde(rename = "search-path")]
    pub search_path: String,

    /// First inspection date of the range (MM/DD/YYYY)
    #[serde(rename = "start-date")]
    pub start_date: String,

    /// Last inspection date of the range (MM/DD/YYYY)
    #[serde(rename = "end-date")]
    pub end_date: String,

    /// Index of the first result on the listing page
    pub start: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://ca.healthinspections.us/napa/".to_string(),
            search_path: "search.cfm".to_string(),
            start_date: "01/01/1970".to_string(),
            end_date: "03/01/2017".to_string(),
            start: 1,
        }
    }
}

impl SourceConfig {
    /// Builds the search-results URL for the configured date range
    pub fn search_url(&self) -> Result<Url, ConfigError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;
        let mut url = base
            .join(&self.search_path)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid search-path: {}", e)))?;

        let start = self.start.to_string();
        url.query_pairs_mut()
            .append_pair("start", &start)
            .append_pair("1", "1")
            .append_pair("sd", &self.start_date)
            .append_pair("ed", &self.end_date)
            .append_pair("kw1", "")
            .append_pair("kw2", "")
            .append_pair("kw3", "")
            .append_pair("rel1", "N.permitName")
            .append_pair("rel2", "N.permitName")
            .append_pair("rel3", "N.permitName")
            .append_pair("zc", "")
            .append_pair("dtRng", "YES")
            .append_pair("pre", "similar");

        Ok(url)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the scraper
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "inspection-scraper".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// HTTP fetch limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Selectors and markers used to read a report page
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Block holding the facility and inspection header fields
    #[serde(rename = "top-section-selector")]
    pub top_section_selector: String,

    /// Value elements inside the top section
    #[serde(rename = "field-selector")]
    pub field_selector: String,

    /// Tables listing the violation categories
    #[serde(rename = "violation-table-selector")]
    pub violation_table_selector: String,

    /// Image path the site uses for a ticked "out of compliance" box
    #[serde(rename = "checked-box-image")]
    pub checked_box_image: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            top_section_selector: "div.topSection".to_string(),
            field_selector: "span.blackline".to_string(),
            violation_table_selector: "table.insideTable".to_string(),
            checked_box_image: "../../../webadmin/dhd_135/paper/images/box_checked_10x10.gif"
                .to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "inspections.db".to_string(),
        }
    }
}
