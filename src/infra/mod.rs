//! Usage: Infrastructure adapters (native OS queries, settings file).

pub(crate) mod native;
pub(crate) mod settings;
