use crate::{FilterSet, RequestId, Section};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited a scalar text field.
    FieldEdited {
        section: Section,
        field: String,
        value: String,
    },
    /// User left a comma-separated list input.
    ListFieldEdited {
        section: Section,
        field: String,
        raw: String,
    },
    /// User clicked "+ Add" on a list editor.
    ItemAdded { section: Section, list: String },
    /// User removed a row from a list editor.
    ItemRemoved {
        section: Section,
        list: String,
        index: usize,
    },
    /// User edited one input of a list row.
    ItemEdited {
        section: Section,
        list: String,
        index: usize,
        key: String,
        value: String,
    },
    /// User edited the free-text query box.
    GeneralQueryEdited(String),
    /// Replace all filters with a preset.
    FiltersLoaded(FilterSet),
    /// User clicked Clear All Filters.
    ClearAllClicked,
    /// User clicked Search.
    SearchClicked,
    /// Engine completion for a search request.
    SearchFinished {
        request_id: RequestId,
        result: SearchResultKind,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchResultKind {
    Hits(Vec<serde_json::Value>),
    Failed { message: String },
}
