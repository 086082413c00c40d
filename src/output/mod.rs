//! Output module for the console report
//!
//! This module handles:
//! - Grouping stored violations under their facility
//! - Rendering the grouped listing as text
//! - Printing it once at the end of a run

mod report;

pub use report::{format_report, print_report, NO_VIOLATIONS};
