//! Usage: Platform facts and prompt/cache policy decisions for the desktop adapter.

use crate::blocking;
use crate::domain::platform_facts::{PlatformFacts, ProcessorArchitecture};
use crate::domain::prompt_behavior::{AuthorizationParameters, PromptBehavior};
use crate::domain::request_parameters::{oauth_parameter, prompt_value, RequestParameters};
use crate::infra::native::{NativeApi, NativeCapabilityProbe};
use crate::shared::error::AppResult;
use crate::shared::security::mask_identity;
use std::sync::Arc;

pub struct PlatformInformation<A> {
    product_name: String,
    probe: Arc<NativeCapabilityProbe<A>>,
}

impl<A> Clone for PlatformInformation<A> {
    fn clone(&self) -> Self {
        Self {
            product_name: self.product_name.clone(),
            probe: Arc::clone(&self.probe),
        }
    }
}

impl<A: NativeApi + 'static> PlatformInformation<A> {
    pub fn new(product_name: impl Into<String>, api: A) -> Self {
        Self {
            product_name: product_name.into(),
            probe: Arc::new(NativeCapabilityProbe::new(api)),
        }
    }

    pub fn probe(&self) -> &NativeCapabilityProbe<A> {
        &self.probe
    }

    pub fn get_product_name(&self) -> &str {
        &self.product_name
    }

    /// Empty and whitespace-only values read as unset.
    pub fn get_environment_variable(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }

    pub async fn get_user_principal_name(&self) -> AppResult<String> {
        let probe = Arc::clone(&self.probe);
        blocking::run("user_principal_name", move || {
            probe.current_user_principal_name()
        })
        .await
    }

    pub fn get_processor_architecture(&self) -> ProcessorArchitecture {
        self.probe.processor_architecture()
    }

    pub fn get_operating_system(&self) -> String {
        self.probe.operating_system_version()
    }

    /// Never reported: the adapter may run on servers.
    pub fn get_device_model(&self) -> Option<String> {
        None
    }

    pub fn is_domain_joined(&self) -> bool {
        self.probe.is_domain_joined()
    }

    /// Whether the current identity belongs to this machine rather than a domain.
    pub async fn is_user_local(&self) -> AppResult<bool> {
        let probe = Arc::clone(&self.probe);
        blocking::run("is_user_local", move || {
            let identity = probe.current_identity_name()?;
            let machine = probe.machine_name()?;
            Ok::<_, crate::shared::error::AppError>(is_identity_on_machine(&identity, &machine))
        })
        .await
    }

    /// Auto adds nothing and leaves the prompt decision to the server.
    pub fn add_prompt_behavior_query_parameter(
        &self,
        parameters: &AuthorizationParameters,
        request_parameters: &mut RequestParameters,
    ) {
        let value = match parameters.prompt_behavior {
            PromptBehavior::Always => prompt_value::LOGIN,
            PromptBehavior::RefreshSession => prompt_value::REFRESH_SESSION,
            PromptBehavior::Never => prompt_value::ATTEMPT_NONE,
            PromptBehavior::Auto => return,
        };
        request_parameters.insert(oauth_parameter::PROMPT, value);
    }

    pub fn get_cache_load_policy(&self, parameters: &AuthorizationParameters) -> bool {
        !matches!(
            parameters.prompt_behavior,
            PromptBehavior::Always | PromptBehavior::RefreshSession
        )
    }

    pub async fn facts(&self) -> PlatformFacts {
        let user_principal_name = match self.get_user_principal_name().await {
            Ok(upn) => {
                tracing::debug!(upn = %mask_identity(&upn), "resolved user principal name");
                Some(upn)
            }
            Err(err) => {
                tracing::warn!(error = %err, "user principal name unavailable");
                None
            }
        };
        let is_current_user_local = self.is_user_local().await.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "current identity unavailable; treating user as non-local");
            false
        });

        PlatformFacts {
            product_name: self.product_name.clone(),
            user_principal_name,
            processor_architecture: self.get_processor_architecture(),
            operating_system_version: self.get_operating_system(),
            device_model: self.get_device_model(),
            is_domain_joined: self.is_domain_joined(),
            is_current_user_local,
        }
    }
}

fn is_identity_on_machine(identity: &str, machine: &str) -> bool {
    let prefix = identity.split('\\').next().unwrap_or_default();
    prefix.to_uppercase() == machine.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::native::scripted::{ScriptedApi, ScriptedJoin, ScriptedName};
    use crate::infra::native::{NetJoinStatus, NERR_SUCCESS, PROCESSOR_ARCHITECTURE_ARM};
    use crate::shared::error::ErrorCode;

    fn platform(api: ScriptedApi) -> PlatformInformation<ScriptedApi> {
        PlatformInformation::new("PCL.Desktop", api)
    }

    #[test]
    fn identity_prefix_compare_ignores_case() {
        assert!(is_identity_on_machine(r"ws-0042\alice", "WS-0042"));
        assert!(!is_identity_on_machine(r"CONTOSO\alice", "WS-0042"));
        assert!(!is_identity_on_machine("alice", "WS-0042"));
    }

    #[test]
    fn prompt_directive_per_behavior() {
        let info = platform(ScriptedApi::new());
        let expected = [
            (PromptBehavior::Auto, None),
            (PromptBehavior::Always, Some("login")),
            (PromptBehavior::RefreshSession, Some("refresh_session")),
            (PromptBehavior::Never, Some("attempt_none")),
        ];
        for (behavior, directive) in expected {
            let mut params = RequestParameters::new();
            info.add_prompt_behavior_query_parameter(&AuthorizationParameters::new(behavior), &mut params);
            assert_eq!(params.get("prompt"), directive, "{behavior}");
            assert_eq!(params.len(), usize::from(directive.is_some()));
        }
    }

    #[test]
    fn prompt_directive_is_idempotent() {
        let info = platform(ScriptedApi::new());
        for behavior in PromptBehavior::ALL {
            let parameters = AuthorizationParameters::new(behavior);
            let mut once = RequestParameters::new();
            once.insert("client_id", "abc");
            info.add_prompt_behavior_query_parameter(&parameters, &mut once);

            let mut twice = once.clone();
            info.add_prompt_behavior_query_parameter(&parameters, &mut twice);
            assert_eq!(once, twice, "{behavior}");
        }
    }

    #[test]
    fn cache_is_forbidden_only_for_forced_prompts() {
        let info = platform(ScriptedApi::new());
        let allowed: Vec<bool> = PromptBehavior::ALL
            .into_iter()
            .map(|b| info.get_cache_load_policy(&AuthorizationParameters::new(b)))
            .collect();
        // ALL order: Auto, Always, Never, RefreshSession
        assert_eq!(allowed, vec![true, false, true, false]);
    }

    #[test]
    fn device_model_is_never_reported() {
        assert_eq!(platform(ScriptedApi::new()).get_device_model(), None);
    }

    #[test]
    fn pass_throughs_read_the_probe() {
        let info = platform(
            ScriptedApi::new()
                .with_processor_architecture(PROCESSOR_ARCHITECTURE_ARM)
                .with_os_version("Microsoft Windows NT 6.2.9200.0")
                .with_join(ScriptedJoin::status(NERR_SUCCESS, NetJoinStatus::DomainName)),
        );
        assert_eq!(info.get_processor_architecture(), ProcessorArchitecture::Arm);
        assert_eq!(info.get_operating_system(), "Microsoft Windows NT 6.2.9200.0");
        assert!(info.is_domain_joined());
        assert_eq!(info.get_product_name(), "PCL.Desktop");
    }

    #[tokio::test]
    async fn user_principal_name_failure_surfaces() {
        let info = platform(ScriptedApi::new().with_principal_script(ScriptedName::FailFill(1317)));
        let err = info.get_user_principal_name().await.unwrap_err();
        assert_eq!(err.error_code(), Some(ErrorCode::PlatformQueryFailed));
        assert_eq!(err.os_error_code(), Some(1317));
    }

    #[tokio::test]
    async fn is_user_local_compares_machine_prefix() {
        let local = platform(
            ScriptedApi::new()
                .with_identity_name(r"ws-0042\alice")
                .with_machine_name("WS-0042"),
        );
        assert!(local.is_user_local().await.unwrap());

        let domain = platform(
            ScriptedApi::new()
                .with_identity_name(r"CONTOSO\alice")
                .with_machine_name("WS-0042"),
        );
        assert!(!domain.is_user_local().await.unwrap());
    }

    #[tokio::test]
    async fn is_user_local_propagates_identity_failure() {
        let info = platform(
            ScriptedApi::new()
                .with_identity_script(ScriptedName::FailSizeQuery(1332))
                .with_machine_name("WS-0042"),
        );
        assert!(info.is_user_local().await.is_err());
    }

    #[tokio::test]
    async fn facts_degrade_failed_lookups() {
        let info = platform(ScriptedApi::new());
        let facts = info.facts().await;
        assert_eq!(facts.user_principal_name, None);
        assert!(!facts.is_current_user_local);
        assert!(!facts.is_domain_joined);
        assert_eq!(facts.device_model, None);
        assert_eq!(facts.processor_architecture, ProcessorArchitecture::X64);
    }
}
