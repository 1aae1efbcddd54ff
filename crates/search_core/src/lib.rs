//! Search core: filter state, payload sanitizer and the pure search state machine.
mod effect;
mod filters;
mod msg;
mod payload;
mod sanitize;
mod state;
mod update;
mod value;
mod view_model;

pub use effect::Effect;
pub use filters::{
    split_list, AttributeFilter, CommentFilter, DocumentFilters, FilterError, FilterSet,
    ItemList, LinkFilter, ListItem, LocationFilters, PacketFilters, Section, SectionFilters,
};
pub use msg::{Msg, SearchResultKind};
pub use payload::{build_payload, SearchPayload, DEFAULT_PAGE_SIZE};
pub use sanitize::{sanitize, sanitize_opt, sanitize_section, sanitize_str, Level};
pub use state::{AppState, RequestId, SearchPhase};
pub use update::update;
pub use value::{FilterValue, Record};
pub use view_model::{hit_title, AppViewModel, HitView};
