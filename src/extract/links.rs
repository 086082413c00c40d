//! Link resolution between the search listing, intermediate pages and reports
//!
//! Hrefs are parsed into path and query with the url crate and checked
//! component by component, instead of slicing strings at fixed offsets.

use crate::InspectError;
use scraper::{Html, Selector};
use url::Url;

/// Page an inspection link on the search listing points at
const TARGET_PAGE: &str = "estab.cfm";

/// File name of the full inspection report template
const REPORT_PAGE: &str = "_report_full.cfm";

/// Template folder holding the report, percent-encoded as the url crate emits it
const REPORT_TEMPLATE: &str = "Food%20Inspection";

/// Base used when only the shape of a relative href matters
const PLACEHOLDER_BASE: &str = "http://listing.invalid/";

/// Lists the inspection links on a search-results page
///
/// Returns the raw href of every anchor pointing at `estab.cfm` with numeric
/// `permitID` and `inspectionID` query parameters, in document order.
///
/// # Example
///
/// ```
/// use inspection_scraper::extract::list_report_targets;
///
/// let html = r#"<a href="estab.cfm?permitID=12&inspectionID=34">Joe's</a>
///               <a href="about.cfm">About</a>"#;
/// assert_eq!(
///     list_report_targets(html),
///     vec!["estab.cfm?permitID=12&inspectionID=34".to_string()]
/// );
/// ```
pub fn list_report_targets(search_html: &str) -> Vec<String> {
    let document = Html::parse_document(search_html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::trim)
        .filter(|href| is_report_target(href))
        .map(str::to_string)
        .collect()
}

/// Returns true if the href is an inspection link from the search listing
fn is_report_target(href: &str) -> bool {
    let Some(url) = Url::parse(PLACEHOLDER_BASE)
        .ok()
        .and_then(|base| resolve_href(href, &base))
    else {
        return false;
    };

    let file_matches = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .is_some_and(|file| file.eq_ignore_ascii_case(TARGET_PAGE));

    file_matches
        && query_value(&url, "permitID").is_some_and(|v| is_numeric(&v))
        && query_value(&url, "inspectionID").is_some_and(|v| is_numeric(&v))
}

/// Finds the full report link on an intermediate page
///
/// The first anchor whose href points at
/// `_templates/<id>/Food Inspection/_report_full.cfm` with numeric `domainID`
/// and `inspectionID` and a `dsn=dhd_<id>` parameter is resolved against
/// `page_url`. The space in the template folder comes back percent-encoded.
///
/// # Errors
///
/// Returns `InspectError::Extraction` if no anchor matches.
pub fn resolve_final_report(intermediate_html: &str, page_url: &Url) -> Result<Url, InspectError> {
    let document = Html::parse_document(intermediate_html);
    let selector = Selector::parse("a[href]")
        .map_err(|e| InspectError::Extraction(format!("Invalid anchor selector: {:?}", e)))?;

    document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| resolve_href(href.trim(), page_url))
        .find(is_full_report)
        .ok_or_else(|| {
            InspectError::Extraction(format!("No full report link found on {}", page_url))
        })
}

/// Checks path and query of a candidate report URL
fn is_full_report(url: &Url) -> bool {
    let Some(segments) = url.path_segments() else {
        return false;
    };
    let segments: Vec<&str> = segments.collect();

    let path_matches = match segments.as_slice() {
        [.., templates, domain, template, file] => {
            *templates == "_templates"
                && is_numeric(domain)
                && template.eq_ignore_ascii_case(REPORT_TEMPLATE)
                && file.eq_ignore_ascii_case(REPORT_PAGE)
        }
        _ => false,
    };

    path_matches
        && query_value(url, "domainID").is_some_and(|v| is_numeric(&v))
        && query_value(url, "inspectionID").is_some_and(|v| is_numeric(&v))
        && query_value(url, "dsn")
            .and_then(|v| v.strip_prefix("dhd_").map(is_numeric))
            .unwrap_or(false)
}

/// Resolves an href against a base, skipping non-HTTP schemes
fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let url = base.join(href).ok()?;
    if url.scheme() == "http" || url.scheme() == "https" {
        Some(url)
    } else {
        None
    }
}

/// Returns the first value of a query parameter
fn query_value(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}
