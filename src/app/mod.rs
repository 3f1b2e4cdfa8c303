//! Usage: Composition root and process-level wiring (logging).

pub(crate) mod adapter;
pub(crate) mod logging;
