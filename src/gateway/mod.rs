//! Usage: Outbound HTTP for authorization flows (UI modality selection + bounded exchanges).

pub(crate) mod bounded_request;
pub(crate) mod web_ui;
