//! Filter records for the three payload sections.
//!
//! Fields are addressed by their JSON wire name so that edits coming from the
//! command line or a preset file map one-to-one onto the request body.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::value::FilterValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Document,
    Location,
    Packet,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Document, Section::Location, Section::Packet];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Document => "document",
            Section::Location => "location",
            Section::Packet => "packet",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FilterError::UnknownSection(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown section `{0}` (expected document, location or packet)")]
    UnknownSection(String),
    #[error("unknown {section} field `{field}`")]
    UnknownField { section: Section, field: String },
    #[error("unknown {section} list `{list}`")]
    UnknownList { section: Section, list: String },
    #[error("unknown key `{key}` for {section}.{list} items")]
    UnknownKey {
        section: Section,
        list: String,
        key: String,
    },
    #[error("{section}.{list} has no item {index} ({len} items)")]
    IndexOutOfRange {
        section: Section,
        list: String,
        index: usize,
        len: usize,
    },
}

/// A row in one of the dynamic list editors.
pub trait ListItem: Default {
    fn field_mut(&mut self, key: &str) -> Option<&mut String>;
    fn to_value(&self) -> FilterValue;
}

/// `{attributeId, name, value}` triple used by attributes, properties and packet entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AttributeFilter {
    pub attribute_id: String,
    pub name: String,
    pub value: String,
}

impl ListItem for AttributeFilter {
    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "attributeId" => Some(&mut self.attribute_id),
            "name" => Some(&mut self.name),
            "value" => Some(&mut self.value),
            _ => None,
        }
    }

    fn to_value(&self) -> FilterValue {
        FilterValue::record([
            ("attributeId", FilterValue::string(&self.attribute_id)),
            ("name", FilterValue::string(&self.name)),
            ("value", FilterValue::string(&self.value)),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CommentFilter {
    pub user_id: String,
    pub comment: String,
}

impl ListItem for CommentFilter {
    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "userId" => Some(&mut self.user_id),
            "comment" => Some(&mut self.comment),
            _ => None,
        }
    }

    fn to_value(&self) -> FilterValue {
        FilterValue::record([
            ("userId", FilterValue::string(&self.user_id)),
            ("comment", FilterValue::string(&self.comment)),
        ])
    }
}

// The backend spells it "terciary".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LinkFilter {
    pub terciary_id: String,
    pub name: String,
}

impl ListItem for LinkFilter {
    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "terciaryId" => Some(&mut self.terciary_id),
            "name" => Some(&mut self.name),
            _ => None,
        }
    }

    fn to_value(&self) -> FilterValue {
        FilterValue::record([
            ("terciaryId", FilterValue::string(&self.terciary_id)),
            ("name", FilterValue::string(&self.name)),
        ])
    }
}

/// Object-safe view over a `Vec` of list items.
pub trait ItemList {
    fn push_empty(&mut self) -> usize;
    fn remove_at(&mut self, index: usize) -> bool;
    fn item_field_mut(&mut self, index: usize, key: &str) -> Option<Result<&mut String, usize>>;
    fn item_count(&self) -> usize;
}

impl<T: ListItem> ItemList for Vec<T> {
    fn push_empty(&mut self) -> usize {
        self.push(T::default());
        self.len() - 1
    }

    fn remove_at(&mut self, index: usize) -> bool {
        if index < self.len() {
            self.remove(index);
            true
        } else {
            false
        }
    }

    /// `None` for an unknown key, `Some(Err(len))` for an index past the end.
    fn item_field_mut(&mut self, index: usize, key: &str) -> Option<Result<&mut String, usize>> {
        let len = self.len();
        match self.get_mut(index) {
            Some(item) => item.field_mut(key).map(Ok),
            None => {
                let known_key = T::default().field_mut(key).is_some();
                known_key.then_some(Err(len))
            }
        }
    }

    fn item_count(&self) -> usize {
        self.len()
    }
}

/// Edit operations shared by the three sections.
pub trait SectionFilters {
    fn section(&self) -> Section;
    fn text_mut(&mut self, field: &str) -> Option<&mut String>;
    fn list_mut(&mut self, field: &str) -> Option<&mut Vec<String>>;
    fn items_mut(&mut self, list: &str) -> Option<&mut dyn ItemList>;
    /// Whether `field` takes a comma-separated list rather than plain text.
    fn is_list_field(&self, field: &str) -> bool;
    /// Full record with every recognized field, empty ones included.
    fn to_value(&self) -> FilterValue;

    fn set_text(&mut self, field: &str, value: &str) -> Result<(), FilterError> {
        let section = self.section();
        let slot = self.text_mut(field).ok_or_else(|| FilterError::UnknownField {
            section,
            field: field.to_string(),
        })?;
        *slot = value.to_string();
        Ok(())
    }

    fn set_list(&mut self, field: &str, raw: &str) -> Result<(), FilterError> {
        let section = self.section();
        let slot = self.list_mut(field).ok_or_else(|| FilterError::UnknownField {
            section,
            field: field.to_string(),
        })?;
        *slot = split_list(raw);
        Ok(())
    }

    /// Appends an empty item and returns its index.
    fn add_item(&mut self, list: &str) -> Result<usize, FilterError> {
        let section = self.section();
        let items = self.items_mut(list).ok_or_else(|| unknown_list(section, list))?;
        Ok(items.push_empty())
    }

    fn remove_item(&mut self, list: &str, index: usize) -> Result<(), FilterError> {
        let section = self.section();
        let items = self.items_mut(list).ok_or_else(|| unknown_list(section, list))?;
        let len = items.item_count();
        if items.remove_at(index) {
            Ok(())
        } else {
            Err(FilterError::IndexOutOfRange {
                section,
                list: list.to_string(),
                index,
                len,
            })
        }
    }

    fn update_item(
        &mut self,
        list: &str,
        index: usize,
        key: &str,
        value: &str,
    ) -> Result<(), FilterError> {
        let section = self.section();
        let items = self.items_mut(list).ok_or_else(|| unknown_list(section, list))?;
        match items.item_field_mut(index, key) {
            Some(Ok(slot)) => {
                *slot = value.to_string();
                Ok(())
            }
            Some(Err(len)) => Err(FilterError::IndexOutOfRange {
                section,
                list: list.to_string(),
                index,
                len,
            }),
            None => Err(FilterError::UnknownKey {
                section,
                list: list.to_string(),
                key: key.to_string(),
            }),
        }
    }
}

fn unknown_list(section: Section, list: &str) -> FilterError {
    FilterError::UnknownList {
        section,
        list: list.to_string(),
    }
}

/// Splits a comma-separated entry, trimming parts and dropping empty ones.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn items_value<T: ListItem>(items: &[T]) -> FilterValue {
    FilterValue::Sequence(items.iter().map(ListItem::to_value).collect())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DocumentFilters {
    #[serde(rename = "content_id")]
    pub content_id: String,
    pub file_ref: String,
    pub content_query: String,
    pub content_version: String,
    pub creation_date_from: String,
    pub creation_date_to: String,
    pub last_modification_date_from: String,
    pub last_modification_date_to: String,
    pub min_file_size: String,
    pub max_file_size: String,
    pub extension: String,
    pub templates: Vec<String>,
    pub hashtags: Vec<String>,
    pub comments: Vec<CommentFilter>,
    pub primary_location_id: String,
    pub secondary_location_id: String,
    pub tertiary_location_id: String,
    pub linked_to: Vec<LinkFilter>,
    pub attributes: Vec<AttributeFilter>,
    pub packet_ids: Vec<String>,
}

impl SectionFilters for DocumentFilters {
    fn section(&self) -> Section {
        Section::Document
    }

    fn text_mut(&mut self, field: &str) -> Option<&mut String> {
        let slot = match field {
            "content_id" => &mut self.content_id,
            "fileRef" => &mut self.file_ref,
            "contentQuery" => &mut self.content_query,
            "contentVersion" => &mut self.content_version,
            "creationDateFrom" => &mut self.creation_date_from,
            "creationDateTo" => &mut self.creation_date_to,
            "lastModificationDateFrom" => &mut self.last_modification_date_from,
            "lastModificationDateTo" => &mut self.last_modification_date_to,
            "minFileSize" => &mut self.min_file_size,
            "maxFileSize" => &mut self.max_file_size,
            "extension" => &mut self.extension,
            "primaryLocationId" => &mut self.primary_location_id,
            "secondaryLocationId" => &mut self.secondary_location_id,
            "tertiaryLocationId" => &mut self.tertiary_location_id,
            _ => return None,
        };
        Some(slot)
    }

    fn list_mut(&mut self, field: &str) -> Option<&mut Vec<String>> {
        match field {
            "templates" => Some(&mut self.templates),
            "hashtags" => Some(&mut self.hashtags),
            "packetIds" => Some(&mut self.packet_ids),
            _ => None,
        }
    }

    fn is_list_field(&self, field: &str) -> bool {
        matches!(field, "templates" | "hashtags" | "packetIds")
    }

    fn items_mut(&mut self, list: &str) -> Option<&mut dyn ItemList> {
        match list {
            "comments" => Some(&mut self.comments),
            "linkedTo" => Some(&mut self.linked_to),
            "attributes" => Some(&mut self.attributes),
            _ => None,
        }
    }

    fn to_value(&self) -> FilterValue {
        FilterValue::record([
            ("content_id", FilterValue::string(&self.content_id)),
            ("fileRef", FilterValue::string(&self.file_ref)),
            ("contentQuery", FilterValue::string(&self.content_query)),
            ("contentVersion", FilterValue::string(&self.content_version)),
            ("creationDateFrom", FilterValue::string(&self.creation_date_from)),
            ("creationDateTo", FilterValue::string(&self.creation_date_to)),
            (
                "lastModificationDateFrom",
                FilterValue::string(&self.last_modification_date_from),
            ),
            (
                "lastModificationDateTo",
                FilterValue::string(&self.last_modification_date_to),
            ),
            ("minFileSize", FilterValue::string(&self.min_file_size)),
            ("maxFileSize", FilterValue::string(&self.max_file_size)),
            ("extension", FilterValue::string(&self.extension)),
            ("templates", FilterValue::strings(&self.templates)),
            ("hashtags", FilterValue::strings(&self.hashtags)),
            ("comments", items_value(&self.comments)),
            ("primaryLocationId", FilterValue::string(&self.primary_location_id)),
            ("secondaryLocationId", FilterValue::string(&self.secondary_location_id)),
            ("tertiaryLocationId", FilterValue::string(&self.tertiary_location_id)),
            ("linkedTo", items_value(&self.linked_to)),
            ("attributes", items_value(&self.attributes)),
            ("packetIds", FilterValue::strings(&self.packet_ids)),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LocationFilters {
    pub location_id: String,
    pub location_type: String,
    pub parent_id: String,
    pub name: String,
    pub properties: Vec<AttributeFilter>,
}

impl SectionFilters for LocationFilters {
    fn section(&self) -> Section {
        Section::Location
    }

    fn text_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "locationId" => Some(&mut self.location_id),
            "locationType" => Some(&mut self.location_type),
            "parentId" => Some(&mut self.parent_id),
            "name" => Some(&mut self.name),
            _ => None,
        }
    }

    fn list_mut(&mut self, _field: &str) -> Option<&mut Vec<String>> {
        None
    }

    fn is_list_field(&self, _field: &str) -> bool {
        false
    }

    fn items_mut(&mut self, list: &str) -> Option<&mut dyn ItemList> {
        match list {
            "properties" => Some(&mut self.properties),
            _ => None,
        }
    }

    fn to_value(&self) -> FilterValue {
        FilterValue::record([
            ("locationId", FilterValue::string(&self.location_id)),
            ("locationType", FilterValue::string(&self.location_type)),
            ("parentId", FilterValue::string(&self.parent_id)),
            ("name", FilterValue::string(&self.name)),
            ("properties", items_value(&self.properties)),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PacketFilters {
    pub project_id: String,
    pub name: String,
    pub packet_entities: Vec<AttributeFilter>,
}

impl SectionFilters for PacketFilters {
    fn section(&self) -> Section {
        Section::Packet
    }

    fn text_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "projectId" => Some(&mut self.project_id),
            "name" => Some(&mut self.name),
            _ => None,
        }
    }

    fn list_mut(&mut self, _field: &str) -> Option<&mut Vec<String>> {
        None
    }

    fn is_list_field(&self, _field: &str) -> bool {
        false
    }

    fn items_mut(&mut self, list: &str) -> Option<&mut dyn ItemList> {
        match list {
            "packetEntities" => Some(&mut self.packet_entities),
            _ => None,
        }
    }

    fn to_value(&self) -> FilterValue {
        FilterValue::record([
            ("projectId", FilterValue::string(&self.project_id)),
            ("name", FilterValue::string(&self.name)),
            ("packetEntities", items_value(&self.packet_entities)),
        ])
    }
}

/// All three sections, as loaded from a preset file or built up by edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSet {
    pub document: DocumentFilters,
    pub location: LocationFilters,
    pub packet: PacketFilters,
}

impl FilterSet {
    pub fn section(&self, section: Section) -> &dyn SectionFilters {
        match section {
            Section::Document => &self.document,
            Section::Location => &self.location,
            Section::Packet => &self.packet,
        }
    }

    pub fn section_mut(&mut self, section: Section) -> &mut dyn SectionFilters {
        match section {
            Section::Document => &mut self.document,
            Section::Location => &mut self.location,
            Section::Packet => &mut self.packet,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
