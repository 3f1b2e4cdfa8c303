//! Usage: Pick the UI modality for an authorization request and run its bounded HTTP exchange.

use crate::domain::call_state::CallState;
use crate::domain::prompt_behavior::{AuthorizationParameters, PromptBehavior, WindowHandle};
use crate::gateway::bounded_request::{BoundedRequest, BoundedRequestExecutor, TimeoutOutcome};
use crate::shared::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiModality {
    /// May show UI, parented to `owner_window` when present.
    Interactive { owner_window: Option<WindowHandle> },
    /// Must never show UI.
    Silent { owner_window: Option<WindowHandle> },
}

impl UiModality {
    pub fn owner_window(&self) -> Option<WindowHandle> {
        match self {
            Self::Interactive { owner_window } | Self::Silent { owner_window } => *owner_window,
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Interactive { .. })
    }
}

pub struct WebUiFactory {
    executor: BoundedRequestExecutor,
}

impl WebUiFactory {
    pub fn new(user_agent: Option<String>) -> AppResult<Self> {
        Ok(Self {
            executor: BoundedRequestExecutor::new(user_agent)?,
        })
    }

    pub fn executor(&self) -> &BoundedRequestExecutor {
        &self.executor
    }

    pub fn create_authentication_dialog(&self, parameters: &AuthorizationParameters) -> UiModality {
        let owner_window = parameters.owner_window;
        let modality = match parameters.prompt_behavior {
            PromptBehavior::Never => UiModality::Silent { owner_window },
            PromptBehavior::Auto | PromptBehavior::Always | PromptBehavior::RefreshSession => {
                UiModality::Interactive { owner_window }
            }
        };
        tracing::debug!(
            prompt_behavior = %parameters.prompt_behavior,
            interactive = modality.is_interactive(),
            has_owner_window = owner_window.is_some(),
            "ui modality selected"
        );
        modality
    }

    pub async fn get_response_with_timeout(
        &self,
        request: BoundedRequest,
        timeout_ms: u64,
        call_state: &CallState,
    ) -> TimeoutOutcome {
        self.executor.execute(request, timeout_ms, call_state).await
    }
}
