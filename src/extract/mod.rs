//! HTML extraction for search, intermediate and report pages
//!
//! This module contains the only real parsing logic in the scraper:
//! - Listing inspection links on the search-results page
//! - Resolving an intermediate page to the full report URL
//! - Reading facility, inspection and violation details from a report

mod address;
mod links;
mod report;

pub use address::{parse_address, Address};
pub use links::{list_report_targets, resolve_final_report};
pub use report::ReportExtractor;
