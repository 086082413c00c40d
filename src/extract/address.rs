//! Address block parsing
//!
//! The report prints the facility address as
//! `street\ncity, STATE ZIP`. The street may itself span several lines.

use crate::InspectError;

const FIELD: &str = "address";

/// Parsed facility address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}

/// Parses a `street\ncity, STATE ZIP` address block
///
/// # Errors
///
/// Returns `InspectError::Parse` naming the address field if the text has no
/// comma, no line break before the city, a state that is not two letters or a
/// zipcode that is not `ddddd` / `ddddd-dddd`.
///
/// # Example
///
/// ```
/// use inspection_scraper::extract::parse_address;
///
/// let address = parse_address("123 Main St\nNapa, CA 94558").unwrap();
/// assert_eq!(address.city, "Napa");
/// assert_eq!(address.zipcode, "94558");
/// ```
pub fn parse_address(text: &str) -> Result<Address, InspectError> {
    let (street_city, state_zip) = text
        .rsplit_once(',')
        .ok_or_else(|| InspectError::parse(FIELD, text, "missing ',' before state"))?;

    let mut lines: Vec<&str> = street_city
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let city = lines
        .pop()
        .ok_or_else(|| InspectError::parse(FIELD, text, "missing city"))?;
    if lines.is_empty() {
        return Err(InspectError::parse(
            FIELD,
            text,
            "missing line break between street and city",
        ));
    }
    let street = lines.join(" ");

    let tokens: Vec<&str> = state_zip.split_whitespace().collect();
    let [state, zipcode] = tokens.as_slice() else {
        return Err(InspectError::parse(
            FIELD,
            text,
            "expected 'STATE ZIP' after the city",
        ));
    };

    if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(InspectError::parse(
            FIELD,
            text,
            format!("'{}' is not a two-letter state code", state),
        ));
    }

    if !is_zipcode(zipcode) {
        return Err(InspectError::parse(
            FIELD,
            text,
            format!("'{}' is not a zipcode", zipcode),
        ));
    }

    Ok(Address {
        street,
        city: city.to_string(),
        state: state.to_ascii_uppercase(),
        zipcode: zipcode.to_string(),
    })
}

/// Accepts `ddddd` and `ddddd-dddd`
fn is_zipcode(value: &str) -> bool {
    let digits = |s: &str, n: usize| s.len() == n && s.chars().all(|c| c.is_ascii_digit());
    match value.split_once('-') {
        Some((base, plus4)) => digits(base, 5) && digits(plus4, 4),
        None => digits(value, 5),
    }
}
