use serde::Serialize;

use crate::filters::{FilterSet, Section, SectionFilters};
use crate::sanitize::{sanitize_section, sanitize_str};
use crate::value::{FilterValue, Record};

/// Page size sent with every search.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Request body for the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPayload {
    pub document: Record,
    pub location: Record,
    pub packet: Record,
    #[serde(rename = "generalQuery", skip_serializing_if = "Option::is_none")]
    pub general_query: Option<String>,
    pub size: u32,
}

impl SearchPayload {
    pub fn section(&self, section: Section) -> &Record {
        match section {
            Section::Document => &self.document,
            Section::Location => &self.location,
            Section::Packet => &self.packet,
        }
    }

    /// JSON body as sent on the wire.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Builds the minimal request body from the current form state.
///
/// Every section is always present, possibly as `{}`; the general query is
/// dropped when blank.
pub fn build_payload(filters: &FilterSet, general_query: &str, size: u32) -> SearchPayload {
    SearchPayload {
        document: section_record(filters.section(Section::Document)),
        location: section_record(filters.section(Section::Location)),
        packet: section_record(filters.section(Section::Packet)),
        general_query: sanitize_str(general_query).map(ToOwned::to_owned),
        size,
    }
}

fn section_record(section: &dyn SectionFilters) -> Record {
    match section.to_value() {
        FilterValue::Record(record) => sanitize_section(&record),
        _ => Record::new(),
    }
}
