//! Storage module for persisting inspection data
//!
//! This module handles all database operations for the scraper, including:
//! - SQLite database initialization and schema management
//! - Facility upserts keyed by the site's facility id
//! - Idempotent violation inserts keyed by facility, number and date
//! - Full reads for the console report

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// A food-service establishment, as last seen on an inspection report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facility {
    /// Identifier assigned by the inspection site
    pub id: i64,
    pub name: String,
    /// Street part of the address
    pub address: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    /// Date of the most recently ingested inspection (MM/DD/YYYY)
    pub last_inspection_date: String,
}

/// One flagged violation category on one inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub facility_id: i64,
    /// The site's category code for the violation type
    pub violation_number: i64,
    pub description: String,
    pub inspection_date: String,
    /// e.g. "Routine" or "Follow-up"
    pub inspection_type: String,
}

/// Everything extracted from one report page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionReport {
    pub facility: Facility,
    pub violations: Vec<Violation>,
}

/// Outcome of storing one report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoredReport {
    /// Violations that were not already on record
    pub violations_inserted: usize,
    /// Violations skipped because their key already existed
    pub violations_skipped: usize,
}
