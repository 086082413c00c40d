//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use crate::storage::{Facility, InspectionReport, StoredReport, Violation};
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite storage backend
///
/// Holds one connection for the lifetime of a run; the connection closes
/// when the storage is dropped.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        // Initialize schema
        initialize_schema(&conn)?;

        tracing::debug!("Opened database {}", path.display());

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    // ===== Facilities =====

    fn upsert_facility(&mut self, facility: &Facility) -> StorageResult<()> {
        upsert_facility(&self.conn, facility)
    }

    fn list_facilities(&self) -> StorageResult<Vec<Facility>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, address, city, state, zipcode, lastInspDate
             FROM Facilities ORDER BY rowid",
        )?;

        let facilities = stmt
            .query_map([], |row| {
                Ok(Facility {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    address: row.get(2)?,
                    city: row.get(3)?,
                    state: row.get(4)?,
                    zipcode: row.get(5)?,
                    last_inspection_date: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(facilities)
    }

    // ===== Violations =====

    fn insert_violation_if_absent(&mut self, violation: &Violation) -> StorageResult<bool> {
        insert_violation_if_absent(&self.conn, violation)
    }

    fn list_violations(&self) -> StorageResult<Vec<Violation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, violNum, description, inspDate, inspType
             FROM Violations ORDER BY rowid",
        )?;

        let violations = stmt
            .query_map([], |row| {
                Ok(Violation {
                    facility_id: row.get(0)?,
                    violation_number: row.get(1)?,
                    description: row.get(2)?,
                    inspection_date: row.get(3)?,
                    inspection_type: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(violations)
    }

    // ===== Reports =====

    fn store_report(&mut self, report: &InspectionReport) -> StorageResult<StoredReport> {
        let tx = self.conn.transaction()?;

        upsert_facility(&tx, &report.facility)?;

        let mut stored = StoredReport::default();
        for violation in &report.violations {
            if insert_violation_if_absent(&tx, violation)? {
                stored.violations_inserted += 1;
            } else {
                stored.violations_skipped += 1;
            }
        }

        tx.commit()?;
        Ok(stored)
    }
}

/// Inserts or overwrites a facility row on the given connection
fn upsert_facility(conn: &Connection, facility: &Facility) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO Facilities (id, name, address, city, state, zipcode, lastInspDate)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             address = excluded.address,
             city = excluded.city,
             state = excluded.state,
             zipcode = excluded.zipcode,
             lastInspDate = excluded.lastInspDate",
        params![
            facility.id,
            facility.name,
            facility.address,
            facility.city,
            facility.state,
            facility.zipcode,
            facility.last_inspection_date
        ],
    )?;
    Ok(())
}

/// Inserts a violation row unless its key exists; returns whether it did
fn insert_violation_if_absent(conn: &Connection, violation: &Violation) -> StorageResult<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO Violations (id, violNum, description, inspDate, inspType)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            violation.facility_id,
            violation.violation_number,
            violation.description,
            violation.inspection_date,
            violation.inspection_type
        ],
    )?;
    Ok(inserted > 0)
}
