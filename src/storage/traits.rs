//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{Facility, InspectionReport, StoredReport, Violation};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Two record kinds with two keys: facilities by `id`, violations by
/// `(facility_id, violation_number, inspection_date)`.
pub trait Storage {
    // ===== Facilities =====

    /// Inserts a facility or overwrites every field of the existing row
    fn upsert_facility(&mut self, facility: &Facility) -> StorageResult<()>;

    /// Gets all facilities ordered by id
    fn list_facilities(&self) -> StorageResult<Vec<Facility>>;

    // ===== Violations =====

    /// Inserts a violation unless its key is already on record
    ///
    /// # Returns
    ///
    /// `true` if a row was inserted
    fn insert_violation_if_absent(&mut self, violation: &Violation) -> StorageResult<bool>;

    /// Gets all violations in insertion order
    fn list_violations(&self) -> StorageResult<Vec<Violation>>;

    // ===== Reports =====

    /// Stores a facility and its violations in a single transaction
    fn store_report(&mut self, report: &InspectionReport) -> StorageResult<StoredReport>;
}
