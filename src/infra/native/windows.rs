//! Usage: Win32-backed `NativeApi` (secur32 user names, kernel32 system info, netapi32 join status).

use super::{JoinInformation, NameFormat, NativeApi, NetBuffer, NetJoinStatus};
use windows_sys::Win32::Foundation::GetLastError;
use windows_sys::Win32::NetworkManagement::NetManagement::{
    NetApiBufferFree, NetGetJoinInformation, NETSETUP_JOIN_STATUS,
};
use windows_sys::Win32::Security::Authentication::Identity::GetUserNameExW;
use windows_sys::Win32::System::SystemInformation::{
    ComputerNameNetBIOS, GetComputerNameExW, GetNativeSystemInfo, GetVersionExW, OSVERSIONINFOW,
    SYSTEM_INFO,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsApi;

fn last_error() -> i32 {
    unsafe { GetLastError() as i32 }
}

/// Pointer for the sizing contract: null for the size query, otherwise the buffer with
/// `size` clamped to its length.
fn buffer_ptr(buffer: Option<&mut [u16]>, size: &mut u32) -> *mut u16 {
    match buffer {
        Some(buffer) => {
            *size = (*size).min(buffer.len() as u32);
            buffer.as_mut_ptr()
        }
        None => {
            *size = 0;
            std::ptr::null_mut()
        }
    }
}

fn wide_to_string(units: &[u16]) -> String {
    let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    String::from_utf16_lossy(&units[..end])
}

impl NativeApi for WindowsApi {
    fn get_user_name_ex(
        &self,
        format: NameFormat,
        buffer: Option<&mut [u16]>,
        size: &mut u32,
    ) -> Result<(), i32> {
        let ptr = buffer_ptr(buffer, size);
        let ok = unsafe { GetUserNameExW(format.as_raw(), ptr, size) };
        if ok != 0 {
            Ok(())
        } else {
            Err(last_error())
        }
    }

    fn get_computer_name(&self, buffer: Option<&mut [u16]>, size: &mut u32) -> Result<(), i32> {
        let ptr = buffer_ptr(buffer, size);
        let ok = unsafe { GetComputerNameExW(ComputerNameNetBIOS, ptr, size) };
        if ok != 0 {
            Ok(())
        } else {
            Err(last_error())
        }
    }

    fn native_processor_architecture(&self) -> u16 {
        unsafe {
            let mut info: SYSTEM_INFO = std::mem::zeroed();
            GetNativeSystemInfo(&mut info);
            info.Anonymous.Anonymous.wProcessorArchitecture
        }
    }

    fn os_version(&self) -> String {
        let mut info: OSVERSIONINFOW = unsafe { std::mem::zeroed() };
        info.dwOSVersionInfoSize = std::mem::size_of::<OSVERSIONINFOW>() as u32;
        if unsafe { GetVersionExW(&mut info) } == 0 {
            tracing::debug!(os_error_code = last_error(), "GetVersionExW failed");
            return "Microsoft Windows NT".to_string();
        }

        let mut version = format!(
            "Microsoft Windows NT {}.{}.{}.0",
            info.dwMajorVersion, info.dwMinorVersion, info.dwBuildNumber
        );
        let service_pack = wide_to_string(&info.szCSDVersion);
        if !service_pack.trim().is_empty() {
            version.push(' ');
            version.push_str(service_pack.trim());
        }
        version
    }

    fn net_get_join_information(&self) -> Result<JoinInformation, i32> {
        let mut domain: *mut u16 = std::ptr::null_mut();
        let mut status: NETSETUP_JOIN_STATUS = 0;
        let status_code = unsafe { NetGetJoinInformation(std::ptr::null(), &mut domain, &mut status) };

        Ok(JoinInformation {
            status_code,
            join_status: NetJoinStatus::from_raw(status),
            domain: (!domain.is_null()).then(|| NetBuffer::from_raw(domain as usize)),
        })
    }

    fn net_api_buffer_free(&self, buffer: NetBuffer) {
        let status = unsafe { NetApiBufferFree(buffer.as_raw() as *const std::ffi::c_void) };
        if status != 0 {
            tracing::warn!(status, "NetApiBufferFree failed");
        }
    }
}
