//! Usage: Domain modules (prompt policy, platform facts, request parameters).

pub(crate) mod call_state;
pub(crate) mod platform_facts;
pub(crate) mod platform_information;
pub(crate) mod prompt_behavior;
pub(crate) mod request_parameters;
