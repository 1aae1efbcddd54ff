use crate::{RequestId, SearchPayload};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SubmitSearch {
        request_id: RequestId,
        payload: SearchPayload,
    },
    /// Blocking user notification for a failed search.
    NotifyFailure { message: String },
}
