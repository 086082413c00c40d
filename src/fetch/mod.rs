//! Page fetching
//!
//! A thin wrapper over reqwest: one GET per page, no retries, with a bounded
//! timeout so a hung server cannot stall the run forever.

mod fetcher;

pub use fetcher::{build_http_client, fetch_page, user_agent_string};
