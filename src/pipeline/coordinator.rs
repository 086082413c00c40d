//! Scrape coordinator - main run orchestration logic
//!
//! Pages are processed strictly one after another. Each report is stored in
//! its own transaction, so a failure partway through a run leaves earlier
//! reports committed.

use crate::config::Config;
use crate::extract::{list_report_targets, resolve_final_report, ReportExtractor};
use crate::fetch::{build_http_client, fetch_page};
use crate::storage::{SqliteStorage, Storage, StoredReport};
use crate::InspectError;
use reqwest::Client;
use std::path::Path;
use url::Url;

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    /// Inspection links found on the search page
    pub targets: usize,
    /// Reports extracted and stored
    pub reports_stored: usize,
    /// Violations that were new to the store
    pub violations_inserted: usize,
    /// Targets skipped because a page could not be fetched or parsed
    pub failures: usize,
}

/// Main scrape coordinator structure
pub struct Coordinator {
    config: Config,
    storage: SqliteStorage,
    client: Client,
    extractor: ReportExtractor,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Opens the store once for the whole run; it is released when the
    /// coordinator is dropped, on success and failure alike.
    pub fn new(config: Config) -> Result<Self, InspectError> {
        let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
        let client = build_http_client(&config.fetcher, &config.user_agent)?;
        let extractor = ReportExtractor::new(&config.extractor)?;

        Ok(Self {
            config,
            storage,
            client,
            extractor,
        })
    }

    /// Read access to the store, for reporting after the run
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Runs the scrape
    ///
    /// A failure to fetch the search page ends the run, as does any storage
    /// failure. Failures on individual targets are logged and counted.
    pub async fn run(&mut self) -> Result<ScrapeSummary, InspectError> {
        let search_url = self.config.source.search_url()?;
        tracing::info!("Fetching search results from {}", search_url);

        let search_html = fetch_page(&self.client, &search_url).await?;
        let targets = list_report_targets(&search_html);
        tracing::info!("Found {} inspection links", targets.len());

        let mut summary = ScrapeSummary {
            targets: targets.len(),
            ..ScrapeSummary::default()
        };

        for target in targets {
            match self.process_target(&search_url, &target).await {
                Ok(stored) => {
                    summary.reports_stored += 1;
                    summary.violations_inserted += stored.violations_inserted;
                }
                Err(e) if e.is_fatal() => {
                    tracing::error!("Aborting run at {}: {}", target, e);
                    return Err(e);
                }
                Err(e) => {
                    summary.failures += 1;
                    tracing::warn!("Skipping {}: {}", target, e);
                }
            }
        }

        tracing::info!(
            "Stored {} of {} reports ({} new violations, {} failures)",
            summary.reports_stored,
            summary.targets,
            summary.violations_inserted,
            summary.failures
        );

        Ok(summary)
    }

    /// Follows one search-listing link to its report and stores it
    async fn process_target(
        &mut self,
        search_url: &Url,
        target: &str,
    ) -> Result<StoredReport, InspectError> {
        let intermediate_url = search_url.join(target)?;
        let intermediate_html = fetch_page(&self.client, &intermediate_url).await?;

        let report_url = resolve_final_report(&intermediate_html, &intermediate_url)?;
        let report_html = fetch_page(&self.client, &report_url).await?;

        let report = self.extractor.extract(&report_html)?;
        let stored = self.storage.store_report(&report)?;

        tracing::debug!(
            "Stored facility {} from {} ({} new violations)",
            report.facility.id,
            report_url,
            stored.violations_inserted
        );

        Ok(stored)
    }
}
