use super::{
    NativeApi, NameFormat, NetBuffer, NetJoinStatus, NERR_SUCCESS, PROCESSOR_ARCHITECTURE_AMD64,
    PROCESSOR_ARCHITECTURE_ARM, PROCESSOR_ARCHITECTURE_IA64, PROCESSOR_ARCHITECTURE_INTEL,
};
use crate::domain::platform_facts::ProcessorArchitecture;
use crate::shared::error::{AppError, AppResult};

pub fn map_processor_architecture(raw: u16) -> ProcessorArchitecture {
    match raw {
        PROCESSOR_ARCHITECTURE_AMD64 | PROCESSOR_ARCHITECTURE_IA64 => ProcessorArchitecture::X64,
        PROCESSOR_ARCHITECTURE_ARM => ProcessorArchitecture::Arm,
        PROCESSOR_ARCHITECTURE_INTEL => ProcessorArchitecture::X86,
        _ => ProcessorArchitecture::Unknown,
    }
}

/// Domain-level view over the raw OS queries.
#[derive(Debug)]
pub struct NativeCapabilityProbe<A> {
    api: A,
}

impl<A: NativeApi> NativeCapabilityProbe<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn current_user_principal_name(&self) -> AppResult<String> {
        query_sized_string("GetUserNameEx(NameUserPrincipal)", |buffer, size| {
            self.api
                .get_user_name_ex(NameFormat::UserPrincipal, buffer, size)
        })
    }

    /// SAM-compatible name of the current identity (`MACHINE\user`).
    pub fn current_identity_name(&self) -> AppResult<String> {
        query_sized_string("GetUserNameEx(NameSamCompatible)", |buffer, size| {
            self.api
                .get_user_name_ex(NameFormat::SamCompatible, buffer, size)
        })
    }

    pub fn machine_name(&self) -> AppResult<String> {
        query_sized_string("GetComputerName", |buffer, size| {
            self.api.get_computer_name(buffer, size)
        })
    }

    pub fn processor_architecture(&self) -> ProcessorArchitecture {
        map_processor_architecture(self.api.native_processor_architecture())
    }

    pub fn operating_system_version(&self) -> String {
        self.api.os_version()
    }

    /// Fails open: any query failure reads as "not joined".
    pub fn is_domain_joined(&self) -> bool {
        let info = match self.api.net_get_join_information() {
            Ok(info) => info,
            Err(code) => {
                tracing::debug!(os_error_code = code, "domain join query failed; assuming not joined");
                return false;
            }
        };

        let _domain = BufferGuard {
            api: &self.api,
            buffer: info.domain,
        };

        if info.status_code != NERR_SUCCESS {
            tracing::debug!(
                status_code = info.status_code,
                "domain join query returned an error; assuming not joined"
            );
            return false;
        }
        info.join_status == NetJoinStatus::DomainName
    }
}

struct BufferGuard<'a, A: NativeApi> {
    api: &'a A,
    buffer: Option<NetBuffer>,
}

impl<A: NativeApi> Drop for BufferGuard<'_, A> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.api.net_api_buffer_free(buffer);
        }
    }
}

/// Size query with no buffer, then a fill into a buffer of that size. Either failure is terminal.
fn query_sized_string(
    query: &str,
    mut call: impl FnMut(Option<&mut [u16]>, &mut u32) -> Result<(), i32>,
) -> AppResult<String> {
    let mut size: u32 = 0;
    let size_result = call(None, &mut size);
    if size == 0 {
        let code = size_result.err().unwrap_or_default();
        let err = AppError::platform_query_failed(query, code);
        tracing::error!(query, os_error_code = code, "native size query failed");
        return Err(err);
    }

    let mut buffer = vec![0u16; size as usize];
    if let Err(code) = call(Some(&mut buffer), &mut size) {
        let err = AppError::platform_query_failed(query, code);
        tracing::error!(query, os_error_code = code, "native fill query failed");
        return Err(err);
    }

    let written = (size as usize).min(buffer.len());
    let end = buffer[..written]
        .iter()
        .position(|&unit| unit == 0)
        .unwrap_or(written);
    Ok(String::from_utf16_lossy(&buffer[..end]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::native::scripted::{ScriptedApi, ScriptedJoin, ScriptedName};
    use crate::infra::native::PROCESSOR_ARCHITECTURE_ARM64;
    use crate::shared::error::ErrorCode;
    use std::sync::Arc;

    #[test]
    fn architecture_table_matches_native_codes() {
        assert_eq!(map_processor_architecture(9), ProcessorArchitecture::X64);
        assert_eq!(map_processor_architecture(6), ProcessorArchitecture::X64);
        assert_eq!(map_processor_architecture(5), ProcessorArchitecture::Arm);
        assert_eq!(map_processor_architecture(0), ProcessorArchitecture::X86);
        assert_eq!(
            map_processor_architecture(PROCESSOR_ARCHITECTURE_ARM64),
            ProcessorArchitecture::Unknown
        );
        assert_eq!(map_processor_architecture(0xFFFF), ProcessorArchitecture::Unknown);
    }

    #[test]
    fn principal_name_reads_through_two_phases() {
        let api = Arc::new(ScriptedApi::new().with_user_principal_name("alice@contoso.com"));
        let probe = NativeCapabilityProbe::new(api.clone());

        assert_eq!(probe.current_user_principal_name().unwrap(), "alice@contoso.com");
        assert_eq!(api.user_name_calls(), 2);
    }

    #[test]
    fn principal_name_size_failure_carries_os_code() {
        let api = ScriptedApi::new().with_principal_script(ScriptedName::FailSizeQuery(1332));
        let probe = NativeCapabilityProbe::new(api);

        let err = probe.current_user_principal_name().unwrap_err();
        assert_eq!(err.error_code(), Some(ErrorCode::PlatformQueryFailed));
        assert_eq!(err.os_error_code(), Some(1332));
    }

    #[test]
    fn principal_name_fill_failure_is_not_retried() {
        let api = Arc::new(ScriptedApi::new().with_principal_script(ScriptedName::FailFill(5)));
        let probe = NativeCapabilityProbe::new(api.clone());

        let err = probe.current_user_principal_name().unwrap_err();
        assert_eq!(err.os_error_code(), Some(5));
        assert_eq!(api.user_name_calls(), 2);
    }

    #[test]
    fn domain_joined_only_for_domain_status() {
        let joined = NativeCapabilityProbe::new(
            ScriptedApi::new().with_join(ScriptedJoin::status(NERR_SUCCESS, NetJoinStatus::DomainName)),
        );
        assert!(joined.is_domain_joined());

        for status in [
            NetJoinStatus::Unknown,
            NetJoinStatus::Unjoined,
            NetJoinStatus::WorkgroupName,
        ] {
            let probe = NativeCapabilityProbe::new(
                ScriptedApi::new().with_join(ScriptedJoin::status(NERR_SUCCESS, status)),
            );
            assert!(!probe.is_domain_joined(), "{status:?}");
        }
    }

    #[test]
    fn domain_join_error_code_fails_open_and_frees_buffer() {
        let api = Arc::new(
            ScriptedApi::new().with_join(ScriptedJoin::status(2453, NetJoinStatus::DomainName)),
        );
        let probe = NativeCapabilityProbe::new(api.clone());

        assert!(!probe.is_domain_joined());
        assert_eq!(api.allocated_buffers(), 1);
        assert_eq!(api.outstanding_buffers(), 0);
    }

    #[test]
    fn domain_join_query_failure_fails_open() {
        let api = Arc::new(ScriptedApi::new().with_join(ScriptedJoin::Fails(1722)));
        let probe = NativeCapabilityProbe::new(api.clone());

        assert!(!probe.is_domain_joined());
        assert_eq!(api.outstanding_buffers(), 0);
    }

    #[test]
    fn machine_name_uses_sized_query() {
        let probe = NativeCapabilityProbe::new(ScriptedApi::new().with_machine_name("WS-0042"));
        assert_eq!(probe.machine_name().unwrap(), "WS-0042");
    }
}
