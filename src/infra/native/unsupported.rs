//! Usage: `NativeApi` for hosts without the Win32 identity APIs. Identity and join queries
//! report `ERROR_NOT_SUPPORTED`; architecture and OS come from the build target.

use super::{
    JoinInformation, NameFormat, NativeApi, NetBuffer, ERROR_NOT_SUPPORTED,
    PROCESSOR_ARCHITECTURE_AMD64, PROCESSOR_ARCHITECTURE_ARM, PROCESSOR_ARCHITECTURE_ARM64,
    PROCESSOR_ARCHITECTURE_INTEL,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedApi;

impl NativeApi for UnsupportedApi {
    fn get_user_name_ex(
        &self,
        _format: NameFormat,
        _buffer: Option<&mut [u16]>,
        size: &mut u32,
    ) -> Result<(), i32> {
        *size = 0;
        Err(ERROR_NOT_SUPPORTED)
    }

    fn get_computer_name(&self, _buffer: Option<&mut [u16]>, size: &mut u32) -> Result<(), i32> {
        *size = 0;
        Err(ERROR_NOT_SUPPORTED)
    }

    fn native_processor_architecture(&self) -> u16 {
        match std::env::consts::ARCH {
            "x86_64" => PROCESSOR_ARCHITECTURE_AMD64,
            "x86" => PROCESSOR_ARCHITECTURE_INTEL,
            "arm" => PROCESSOR_ARCHITECTURE_ARM,
            "aarch64" => PROCESSOR_ARCHITECTURE_ARM64,
            _ => u16::MAX,
        }
    }

    fn os_version(&self) -> String {
        format!("{} {}", std::env::consts::FAMILY, std::env::consts::OS)
    }

    fn net_get_join_information(&self) -> Result<JoinInformation, i32> {
        Err(ERROR_NOT_SUPPORTED)
    }

    fn net_api_buffer_free(&self, _buffer: NetBuffer) {}
}
