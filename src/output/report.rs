//! Console report of stored facilities and violations

use crate::storage::{Facility, Storage, Violation};
use crate::InspectError;
use std::collections::HashMap;
use std::fmt;

/// Line printed for a facility with no violations on record
pub const NO_VIOLATIONS: &str = "NO VIOLATIONS ON RECORD";

/// Grouped listing of facilities and their violations
struct Listing<'a> {
    source: &'a str,
    facilities: &'a [Facility],
    by_facility: HashMap<i64, Vec<&'a Violation>>,
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nHere is all the data scraped from:\n  {}\n", self.source)?;
        writeln!(f, "FACILITIES ({}):", self.facilities.len())?;

        for facility in self.facilities {
            writeln!(f)?;
            writeln!(f, "FACILITY NUMBER: {}", facility.id)?;
            writeln!(f, "FACILITY NAME: {}", facility.name)?;
            writeln!(f, "ADDRESS: {}", facility.address)?;
            writeln!(f, "CITY: {}", facility.city)?;
            writeln!(f, "STATE: {}", facility.state)?;
            writeln!(f, "ZIPCODE: {}", facility.zipcode)?;
            writeln!(f, "LAST DATE OF INSPECTION: {}", facility.last_inspection_date)?;

            match self.by_facility.get(&facility.id) {
                Some(matching) => {
                    for violation in matching {
                        writeln!(
                            f,
                            "VIOLATION: {}. {} DATE: {}",
                            violation.violation_number,
                            violation.description,
                            violation.inspection_date
                        )?;
                    }
                }
                None => writeln!(f, "{}", NO_VIOLATIONS)?,
            }
        }

        Ok(())
    }
}

/// Renders the grouped listing
///
/// One block per facility, in the order given, each followed by its
/// violations (joined on facility id) or by [`NO_VIOLATIONS`].
pub fn format_report(source: &str, facilities: &[Facility], violations: &[Violation]) -> String {
    let mut by_facility: HashMap<i64, Vec<&Violation>> = HashMap::new();
    for violation in violations {
        by_facility
            .entry(violation.facility_id)
            .or_default()
            .push(violation);
    }

    Listing {
        source,
        facilities,
        by_facility,
    }
    .to_string()
}

/// Loads everything from storage and prints the grouped listing to stdout
pub fn print_report(storage: &dyn Storage, source: &str) -> Result<(), InspectError> {
    let facilities = storage.list_facilities()?;
    let violations = storage.list_violations()?;

    tracing::debug!(
        "Reporting {} facilities and {} violations",
        facilities.len(),
        violations.len()
    );

    print!("{}", format_report(source, &facilities, &violations));
    Ok(())
}
