//! Inspection report extraction
//!
//! A report page has a top section of value elements (facility, inspection
//! and address details), each usually preceded by a text label, followed by
//! one or more violation tables. A violation row is flagged when its third
//! cell shows the "checked box" image.

use crate::config::ExtractorConfig;
use crate::extract::address::parse_address;
use crate::storage::{Facility, InspectionReport, Violation};
use crate::{ConfigError, InspectError};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;

/// Date format printed on report pages
const DATE_FORMAT: &str = "%m/%d/%Y";

/// Header fields read from the top section of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ReportField {
    FacilityName,
    FacilityId,
    InspectionDate,
    Address,
    InspectionType,
}

impl ReportField {
    pub const ALL: [ReportField; 5] = [
        Self::FacilityName,
        Self::FacilityId,
        Self::InspectionDate,
        Self::Address,
        Self::InspectionType,
    ];

    /// Human-readable field name, used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::FacilityName => "facility name",
            Self::FacilityId => "facility id",
            Self::InspectionDate => "inspection date",
            Self::Address => "address",
            Self::InspectionType => "inspection type",
        }
    }

    /// Index of the field among the top-section values of an unlabelled page
    fn position(&self) -> usize {
        match self {
            Self::FacilityName => 0,
            Self::FacilityId => 1,
            Self::InspectionDate => 2,
            Self::Address => 4,
            Self::InspectionType => 9,
        }
    }

    /// Normalised label texts that introduce this field
    fn labels(&self) -> &'static [&'static str] {
        match self {
            Self::FacilityName => &["facility name", "facility", "establishment", "name"],
            Self::FacilityId => &[
                "facility id",
                "facility #",
                "facility number",
                "permit id",
                "permit #",
                "permit number",
            ],
            Self::InspectionDate => &["inspection date", "date of inspection", "date"],
            Self::Address => &["address", "facility address", "location"],
            Self::InspectionType => &[
                "inspection type",
                "type of inspection",
                "purpose of inspection",
                "purpose",
                "type",
            ],
        }
    }

    /// Maps a normalised label to its field
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.labels().contains(&label))
    }
}

/// Fewest values an unlabelled top section must carry for positional lookup
const MIN_POSITIONAL_FIELDS: usize = 10;

/// One value element of the top section
#[derive(Debug, Clone)]
struct TopSectionEntry {
    label: Option<String>,
    value: String,
}

/// Reads facility and violation records from report pages
///
/// Selectors are compiled once from the extractor configuration and reused
/// for every page of a run.
pub struct ReportExtractor {
    top_section: Selector,
    field: Selector,
    violation_table: Selector,
    row: Selector,
    image: Selector,
    checked_box_image: String,
}

impl ReportExtractor {
    /// Compiles the configured selectors
    pub fn new(config: &ExtractorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            top_section: compile(&config.top_section_selector)?,
            field: compile(&config.field_selector)?,
            violation_table: compile(&config.violation_table_selector)?,
            row: compile("tr")?,
            image: compile("img")?,
            checked_box_image: config.checked_box_image.clone(),
        })
    }

    /// Extracts one facility and its flagged violations from a report page
    ///
    /// # Errors
    ///
    /// * `InspectError::Extraction` - the top section or one of its fields is missing
    /// * `InspectError::Parse` - a field is present but malformed
    pub fn extract(&self, html: &str) -> Result<InspectionReport, InspectError> {
        let document = Html::parse_document(html);

        let entries = self.read_top_section(&document)?;
        let fields = resolve_fields(&entries)?;

        let facility = build_facility(&fields)?;
        let inspection_type = collapse_whitespace(&fields[&ReportField::InspectionType]);

        let violations = self.read_violations(
            &document,
            facility.id,
            &facility.last_inspection_date,
            &inspection_type,
        )?;

        tracing::debug!(
            "Extracted facility {} ({}) with {} violation(s)",
            facility.id,
            facility.name,
            violations.len()
        );

        Ok(InspectionReport {
            facility,
            violations,
        })
    }

    /// Collects the labelled values of the top section
    fn read_top_section(&self, document: &Html) -> Result<Vec<TopSectionEntry>, InspectError> {
        let section = document
            .select(&self.top_section)
            .next()
            .ok_or_else(|| InspectError::Extraction("Report has no top section".to_string()))?;

        Ok(section
            .select(&self.field)
            .map(|element| TopSectionEntry {
                label: self.label_for(element),
                value: element_text(element),
            })
            .collect())
    }

    /// Finds the label text introducing a value element
    ///
    /// Inline labels are tried first, then the cell before the value's
    /// enclosing `td`/`th`.
    fn label_for(&self, element: ElementRef<'_>) -> Option<String> {
        self.inline_label(element).or_else(|| self.cell_label(element))
    }

    /// First non-empty text among the preceding siblings
    ///
    /// Reaching another value element means the value is unlabelled.
    fn inline_label(&self, element: ElementRef<'_>) -> Option<String> {
        for sibling in element.prev_siblings() {
            let text = match sibling.value() {
                Node::Text(text) => text.trim().to_string(),
                Node::Element(_) => {
                    let sibling = ElementRef::wrap(sibling)?;
                    if self.field.matches(&sibling) {
                        return None;
                    }
                    sibling.text().collect::<String>()
                }
                _ => continue,
            };

            let label = normalize_label(&text);
            if !label.is_empty() {
                return Some(label);
            }
        }
        None
    }

    /// Text of the cell preceding the one holding the value
    ///
    /// A preceding cell that holds a value itself is not a label.
    fn cell_label(&self, element: ElementRef<'_>) -> Option<String> {
        let cell = element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|ancestor| matches!(ancestor.value().name(), "td" | "th"))?;
        let previous = cell.prev_siblings().find_map(ElementRef::wrap)?;

        if self.field.matches(&previous) || previous.select(&self.field).next().is_some() {
            return None;
        }

        let label = normalize_label(&previous.text().collect::<String>());
        (!label.is_empty()).then_some(label)
    }

    /// Reads every flagged row of the violation tables
    fn read_violations(
        &self,
        document: &Html,
        facility_id: i64,
        inspection_date: &str,
        inspection_type: &str,
    ) -> Result<Vec<Violation>, InspectError> {
        let mut violations = Vec::new();

        for table in document.select(&self.violation_table) {
            for row in table.select(&self.row) {
                let cells: Vec<ElementRef<'_>> = row
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|cell| cell.value().name() == "td")
                    .collect();

                let Some(text) = self.flagged_text(&cells) else {
                    continue;
                };

                let (violation_number, description) = parse_violation_line(&text)?;
                violations.push(Violation {
                    facility_id,
                    violation_number,
                    description,
                    inspection_date: inspection_date.to_string(),
                    inspection_type: inspection_type.to_string(),
                });
            }
        }

        Ok(violations)
    }

    /// Returns the first-cell text of a row marked out of compliance
    fn flagged_text(&self, cells: &[ElementRef<'_>]) -> Option<String> {
        let text = collapse_whitespace(&element_text(*cells.first()?));
        if text.is_empty() {
            return None;
        }

        let checked = cells
            .get(2)?
            .select(&self.image)
            .any(|img| img.value().attr("src") == Some(self.checked_box_image.as_str()));

        checked.then_some(text)
    }
}

/// Maps top-section entries to fields
///
/// Each field is looked up by label first. Fields with no label are read by
/// position, and only when the section has enough entries for that layout.
fn resolve_fields(
    entries: &[TopSectionEntry],
) -> Result<HashMap<ReportField, String>, InspectError> {
    let mut fields: HashMap<ReportField, String> = HashMap::new();
    for entry in entries {
        if let Some(field) = entry.label.as_deref().and_then(ReportField::from_label) {
            fields.entry(field).or_insert_with(|| entry.value.clone());
        }
    }

    let missing: Vec<ReportField> = ReportField::ALL
        .into_iter()
        .filter(|field| !fields.contains_key(field))
        .collect();

    let Some(first_missing) = missing.first() else {
        return Ok(fields);
    };

    if entries.len() < MIN_POSITIONAL_FIELDS {
        return Err(InspectError::Extraction(if fields.is_empty() {
            format!(
                "Top section has {} unlabelled fields, expected at least {}",
                entries.len(),
                MIN_POSITIONAL_FIELDS
            )
        } else {
            format!("Top section has no {} field", first_missing.name())
        }));
    }

    tracing::debug!("Reading {} unlabelled field(s) by position", missing.len());
    for field in missing {
        fields.insert(field, entries[field.position()].value.clone());
    }

    Ok(fields)
}

/// Validates the header fields and assembles the facility record
fn build_facility(fields: &HashMap<ReportField, String>) -> Result<Facility, InspectError> {
    let name = collapse_whitespace(&fields[&ReportField::FacilityName]);
    if name.is_empty() {
        return Err(InspectError::parse(
            ReportField::FacilityName.name(),
            &name,
            "empty",
        ));
    }

    let raw_id = collapse_whitespace(&fields[&ReportField::FacilityId]);
    let id = raw_id
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            InspectError::parse(
                ReportField::FacilityId.name(),
                &raw_id,
                "not a positive integer",
            )
        })?;

    let date = collapse_whitespace(&fields[&ReportField::InspectionDate]);
    NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|e| {
        InspectError::parse(
            ReportField::InspectionDate.name(),
            &date,
            format!("expected MM/DD/YYYY ({})", e),
        )
    })?;

    let address = parse_address(&fields[&ReportField::Address])?;

    Ok(Facility {
        id,
        name,
        address: address.street,
        city: address.city,
        state: address.state,
        zipcode: address.zipcode,
        last_inspection_date: date,
    })
}

/// Splits `"6. Adequate handwashing facilities"` into number and description
fn parse_violation_line(text: &str) -> Result<(i64, String), InspectError> {
    let (number, description) = text
        .split_once('.')
        .ok_or_else(|| InspectError::parse("violation", text, "missing '.' after the number"))?;

    let number = number
        .trim()
        .parse::<i64>()
        .map_err(|_| InspectError::parse("violation number", text, "not an integer"))?;

    Ok((number, description.trim().to_string()))
}

/// Element text with `<br>` rendered as a line break
fn element_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(fragment) => text.push_str(fragment),
            Node::Element(el) if el.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    text.trim().to_string()
}

/// Lowercases a label and drops the trailing colon
fn normalize_label(text: &str) -> String {
    collapse_whitespace(text.trim().trim_end_matches(':')).to_lowercase()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}
