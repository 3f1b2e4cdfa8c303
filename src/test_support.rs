//! Usage: Public test helpers for integration tests (scripted native API + raw OS constants).

pub use crate::infra::native::scripted::{ScriptedApi, ScriptedJoin, ScriptedName};
pub use crate::infra::native::{
    ERROR_MORE_DATA, ERROR_NOT_SUPPORTED, NERR_SUCCESS, PROCESSOR_ARCHITECTURE_AMD64,
    PROCESSOR_ARCHITECTURE_ARM, PROCESSOR_ARCHITECTURE_ARM64, PROCESSOR_ARCHITECTURE_IA64,
    PROCESSOR_ARCHITECTURE_INTEL,
};

use crate::domain::platform_information::PlatformInformation;
use crate::infra::settings::DEFAULT_PRODUCT_NAME;

/// `PlatformInformation` over a scripted API, shared so the test can inspect the fake afterwards.
pub fn scripted_platform(
    api: ScriptedApi,
) -> (PlatformInformation<std::sync::Arc<ScriptedApi>>, std::sync::Arc<ScriptedApi>) {
    let api = std::sync::Arc::new(api);
    (
        PlatformInformation::new(DEFAULT_PRODUCT_NAME, std::sync::Arc::clone(&api)),
        api,
    )
}

fn serialize_json(
    value: impl serde::Serialize,
) -> crate::shared::error::AppResult<serde_json::Value> {
    Ok(serde_json::to_value(value)
        .map_err(|e| format!("INTERNAL_ERROR: failed to serialize json: {e}"))?)
}

/// `facts()` snapshot as JSON, the shape diagnostics consumers read.
pub async fn facts_json<A: crate::infra::native::NativeApi + 'static>(
    platform: &PlatformInformation<A>,
) -> crate::shared::error::AppResult<serde_json::Value> {
    serialize_json(platform.facts().await)
}
