//! Database schema definitions
//!
//! This module contains the SQL schema for the Inspection-Scraper database.
//! Table and column names match the layout the display side reads.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per facility, overwritten on every ingest
CREATE TABLE IF NOT EXISTS Facilities (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    city TEXT NOT NULL,
    state TEXT NOT NULL,
    zipcode TEXT NOT NULL,
    lastInspDate TEXT NOT NULL
);

-- Flagged violations; id refers to Facilities.id but is not enforced
CREATE TABLE IF NOT EXISTS Violations (
    id INTEGER NOT NULL,
    violNum INTEGER NOT NULL,
    description TEXT NOT NULL,
    inspDate TEXT NOT NULL,
    inspType TEXT NOT NULL,
    PRIMARY KEY (id, violNum, inspDate)
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
