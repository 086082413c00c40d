//! Scrape pipeline
//!
//! This module drives one run end to end:
//! - Fetching the search-results page and listing report targets
//! - Resolving each target through its intermediate page
//! - Extracting and storing each report
//! - Isolating per-page failures from the rest of the run

mod coordinator;

pub use coordinator::{Coordinator, ScrapeSummary};

use crate::config::Config;
use crate::InspectError;

/// Runs a complete scrape
///
/// This is the main entry point for a run. It will:
/// 1. Open the storage layer
/// 2. Build the HTTP client and report extractor
/// 3. Fetch the search page and list report targets
/// 4. Fetch, extract and store each report in turn
///
/// # Returns
///
/// * `Ok(ScrapeSummary)` - Run finished; per-page failures are counted, not raised
/// * `Err(InspectError)` - The search page or the store failed
pub async fn run_scrape(config: Config) -> Result<ScrapeSummary, InspectError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
