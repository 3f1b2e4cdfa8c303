//! Usage: `DesktopPlatform` composition root. Builds the platform facts, modality selector and
//! bounded executor from `AdapterSettings` and exposes them to the identity core.

use crate::domain::call_state::CallState;
use crate::domain::platform_facts::PlatformFacts;
use crate::domain::platform_information::PlatformInformation;
use crate::domain::prompt_behavior::{AuthorizationParameters, WindowHandle};
use crate::domain::request_parameters::RequestParameters;
use crate::gateway::bounded_request::{BoundedRequest, TimeoutOutcome};
use crate::gateway::web_ui::{UiModality, WebUiFactory};
use crate::infra::native::{NativeApi, SystemApi};
use crate::infra::settings::{self, AdapterSettings};
use crate::shared::error::AppResult;
use reqwest::Url;

pub struct DesktopPlatform<A = SystemApi> {
    settings: AdapterSettings,
    platform: PlatformInformation<A>,
    web_ui: WebUiFactory,
}

impl DesktopPlatform<SystemApi> {
    /// Settings from `DESKTOP_AUTH_SETTINGS` (or defaults) over the host OS.
    pub fn load() -> AppResult<Self> {
        Self::from_settings(settings::load()?)
    }

    pub fn from_settings(settings: AdapterSettings) -> AppResult<Self> {
        Self::with_api(settings, SystemApi::default())
    }
}

impl<A: NativeApi + 'static> DesktopPlatform<A> {
    pub fn with_api(settings: AdapterSettings, api: A) -> AppResult<Self> {
        let platform = PlatformInformation::new(settings.product_name.clone(), api);
        let web_ui = WebUiFactory::new(settings.user_agent.clone())?;
        tracing::debug!(
            product_name = %settings.product_name,
            default_timeout_ms = settings.default_timeout_ms,
            "desktop platform ready"
        );
        Ok(Self {
            settings,
            platform,
            web_ui,
        })
    }

    pub fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    pub fn platform(&self) -> &PlatformInformation<A> {
        &self.platform
    }

    pub fn web_ui(&self) -> &WebUiFactory {
        &self.web_ui
    }

    /// Parameters carrying the configured default prompt behavior.
    pub fn default_authorization_parameters(
        &self,
        owner_window: Option<WindowHandle>,
    ) -> AuthorizationParameters {
        AuthorizationParameters {
            prompt_behavior: self.settings.default_prompt_behavior,
            owner_window,
        }
    }

    pub fn select_modality(&self, parameters: &AuthorizationParameters) -> UiModality {
        self.web_ui.create_authentication_dialog(parameters)
    }

    /// Adds the prompt directive to `request_parameters` and appends them all to `endpoint`.
    pub fn authorization_url(
        &self,
        endpoint: &Url,
        parameters: &AuthorizationParameters,
        mut request_parameters: RequestParameters,
    ) -> Url {
        self.platform
            .add_prompt_behavior_query_parameter(parameters, &mut request_parameters);
        let mut url = endpoint.clone();
        request_parameters.append_to_url(&mut url);
        url
    }

    /// `None` uses the configured default timeout.
    pub async fn execute_bounded_request(
        &self,
        request: BoundedRequest,
        timeout_ms: Option<u64>,
        call_state: &CallState,
    ) -> TimeoutOutcome {
        let timeout_ms = timeout_ms.unwrap_or(self.settings.default_timeout_ms);
        self.web_ui
            .get_response_with_timeout(request, timeout_ms, call_state)
            .await
    }

    pub fn pending_timers(&self) -> usize {
        self.web_ui.executor().pending_timers()
    }

    pub async fn facts(&self) -> PlatformFacts {
        self.platform.facts().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prompt_behavior::PromptBehavior;
    use crate::infra::native::scripted::ScriptedApi;

    fn adapter(settings: AdapterSettings) -> DesktopPlatform<ScriptedApi> {
        DesktopPlatform::with_api(settings, ScriptedApi::new()).unwrap()
    }

    #[test]
    fn defaults_come_from_settings() {
        let platform = adapter(AdapterSettings {
            product_name: "Contoso.Desktop".to_string(),
            default_prompt_behavior: PromptBehavior::Never,
            ..AdapterSettings::default()
        });
        assert_eq!(platform.platform().get_product_name(), "Contoso.Desktop");

        let parameters = platform.default_authorization_parameters(Some(WindowHandle(7)));
        assert_eq!(parameters.prompt_behavior, PromptBehavior::Never);
        assert_eq!(
            platform.select_modality(&parameters),
            UiModality::Silent {
                owner_window: Some(WindowHandle(7))
            }
        );
    }

    #[test]
    fn authorization_url_carries_prompt_directive() {
        let platform = adapter(AdapterSettings::default());
        let endpoint = Url::parse("https://login.example.com/common/oauth2/authorize").unwrap();
        let mut extra = RequestParameters::new();
        extra.insert("client_id", "abc");

        let url = platform.authorization_url(
            &endpoint,
            &AuthorizationParameters::new(PromptBehavior::Always),
            extra,
        );
        assert_eq!(url.query(), Some("client_id=abc&prompt=login"));

        let auto = platform.authorization_url(
            &endpoint,
            &AuthorizationParameters::new(PromptBehavior::Auto),
            RequestParameters::new(),
        );
        assert_eq!(auto.query(), None);
    }
}
