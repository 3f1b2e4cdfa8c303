//! Desktop platform adapter for an identity library: native capability probes, platform
//! facts and prompt policy, UI modality selection and timeout-bounded HTTP exchanges.

mod app;
mod domain;
mod gateway;
mod infra;
mod shared;
pub mod test_support;

pub(crate) use shared::blocking;

pub use app::adapter::DesktopPlatform;
pub use app::logging::{init as init_logging, LoggingGuard};
pub use domain::call_state::CallState;
pub use domain::platform_facts::{PlatformFacts, ProcessorArchitecture};
pub use domain::platform_information::PlatformInformation;
pub use domain::prompt_behavior::{AuthorizationParameters, PromptBehavior, WindowHandle};
pub use domain::request_parameters::{oauth_parameter, prompt_value, RequestParameters};
pub use gateway::bounded_request::{
    BoundedRequest, BoundedRequestExecutor, BoundedResponse, TimeoutOutcome,
};
pub use gateway::web_ui::{UiModality, WebUiFactory};
pub use infra::native::{
    map_processor_architecture, JoinInformation, NameFormat, NativeApi, NativeCapabilityProbe,
    NetBuffer, NetJoinStatus, SystemApi,
};
pub use infra::settings::{
    AdapterSettings, DEFAULT_PRODUCT_NAME, DEFAULT_TIMEOUT_MS, MAX_TIMEOUT_MS, SETTINGS_PATH_ENV,
};
pub use shared::error::{AppError, AppResult, ErrorCode};

pub mod settings {
    //! Settings file helpers.
    pub use crate::infra::settings::{load, parse, read_from_path};
}
