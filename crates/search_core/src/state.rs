use crate::payload::{build_payload, SearchPayload, DEFAULT_PAGE_SIZE};
use crate::view_model::{AppViewModel, HitView};
use crate::{FilterError, FilterSet, Section, SectionFilters};

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    InFlight {
        request_id: RequestId,
    },
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    filters: FilterSet,
    general_query: String,
    page_size: u32,
    phase: SearchPhase,
    results: Vec<serde_json::Value>,
    next_request_id: RequestId,
    notice: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            filters: FilterSet::default(),
            general_query: String::new(),
            page_size,
            phase: SearchPhase::Idle,
            results: Vec::new(),
            next_request_id: 1,
            notice: None,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            loading: self.is_in_flight(),
            result_count: self.results.len(),
            results: self
                .results
                .iter()
                .enumerate()
                .map(|(idx, hit)| HitView::from_hit(idx, hit))
                .collect(),
            notice: self.notice.clone(),
        }
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.phase, SearchPhase::InFlight { .. })
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn general_query(&self) -> &str {
        &self.general_query
    }

    pub fn results(&self) -> &[serde_json::Value] {
        &self.results
    }

    /// Sanitized request body for the current form state.
    pub fn payload(&self) -> SearchPayload {
        build_payload(&self.filters, &self.general_query, self.page_size)
    }

    pub(crate) fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Applies a filter edit; errors become the notice instead of propagating.
    pub(crate) fn edit_section<T>(
        &mut self,
        section: Section,
        edit: impl FnOnce(&mut dyn SectionFilters) -> Result<T, FilterError>,
    ) -> Option<T> {
        match edit(self.filters.section_mut(section)) {
            Ok(value) => {
                self.notice = None;
                Some(value)
            }
            Err(err) => {
                self.set_notice(err.to_string());
                None
            }
        }
    }

    pub(crate) fn set_general_query(&mut self, query: String) {
        self.general_query = query;
    }

    pub(crate) fn load_filters(&mut self, filters: FilterSet) {
        self.filters = filters;
        self.notice = None;
    }

    pub(crate) fn clear_all(&mut self) {
        self.filters.clear();
        self.general_query.clear();
        self.results.clear();
        self.notice = None;
    }

    /// Moves to `InFlight` and returns the new request id.
    pub(crate) fn begin_search(&mut self) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.phase = SearchPhase::InFlight { request_id };
        self.notice = None;
        request_id
    }

    pub(crate) fn in_flight_id(&self) -> Option<RequestId> {
        match self.phase {
            SearchPhase::InFlight { request_id } => Some(request_id),
            _ => None,
        }
    }

    pub(crate) fn apply_hits(&mut self, hits: Vec<serde_json::Value>) {
        self.results = hits;
        self.phase = SearchPhase::Succeeded;
    }

    pub(crate) fn apply_failure(&mut self, message: &str) {
        self.phase = SearchPhase::Failed;
        self.set_notice(format!("Search failed: {message}"));
    }
}
