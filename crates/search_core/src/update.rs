use search_logging::{search_debug, search_info, search_warn};

use crate::{AppState, Effect, Msg, SearchResultKind};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FieldEdited {
            section,
            field,
            value,
        } => {
            state.edit_section(section, |filters| filters.set_text(&field, &value));
            Vec::new()
        }
        Msg::ListFieldEdited {
            section,
            field,
            raw,
        } => {
            state.edit_section(section, |filters| filters.set_list(&field, &raw));
            Vec::new()
        }
        Msg::ItemAdded { section, list } => {
            if let Some(index) = state.edit_section(section, |filters| filters.add_item(&list)) {
                search_debug!("Added {}.{}[{}]", section, list, index);
            }
            Vec::new()
        }
        Msg::ItemRemoved {
            section,
            list,
            index,
        } => {
            state.edit_section(section, |filters| filters.remove_item(&list, index));
            Vec::new()
        }
        Msg::ItemEdited {
            section,
            list,
            index,
            key,
            value,
        } => {
            state.edit_section(section, |filters| {
                filters.update_item(&list, index, &key, &value)
            });
            Vec::new()
        }
        Msg::GeneralQueryEdited(query) => {
            state.set_general_query(query);
            Vec::new()
        }
        Msg::FiltersLoaded(filters) => {
            state.load_filters(filters);
            Vec::new()
        }
        Msg::ClearAllClicked => {
            state.clear_all();
            Vec::new()
        }
        Msg::SearchClicked => {
            // At most one request in flight; a second click is rejected, not queued.
            if let Some(request_id) = state.in_flight_id() {
                search_warn!("Search {} still in flight; ignoring new search", request_id);
                state.set_notice("A search is already in progress");
                return (state, Vec::new());
            }
            let payload = state.payload();
            let request_id = state.begin_search();
            search_info!("Search {} submitted", request_id);
            vec![Effect::SubmitSearch {
                request_id,
                payload,
            }]
        }
        Msg::SearchFinished { request_id, result } => {
            if state.in_flight_id() != Some(request_id) {
                search_debug!("Dropping stale completion for search {}", request_id);
                return (state, Vec::new());
            }
            match result {
                SearchResultKind::Hits(hits) => {
                    search_info!("Search {} returned {} hits", request_id, hits.len());
                    state.apply_hits(hits);
                    Vec::new()
                }
                SearchResultKind::Failed { message } => {
                    state.apply_failure(&message);
                    vec![Effect::NotifyFailure { message }]
                }
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
