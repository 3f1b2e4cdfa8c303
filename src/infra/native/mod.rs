//! Usage: Native OS query seam. `NativeApi` mirrors the raw OS contracts; `probe` layers
//! the size-then-fill protocol, architecture table and fail-open join check on top.

mod probe;
pub mod scripted;
#[cfg(not(windows))]
mod unsupported;
#[cfg(windows)]
mod windows;

pub use probe::{map_processor_architecture, NativeCapabilityProbe};

#[cfg(windows)]
pub type SystemApi = windows::WindowsApi;
#[cfg(not(windows))]
pub type SystemApi = unsupported::UnsupportedApi;

pub const ERROR_NOT_SUPPORTED: i32 = 50;
pub const ERROR_MORE_DATA: i32 = 234;
pub const NERR_SUCCESS: u32 = 0;

pub const PROCESSOR_ARCHITECTURE_INTEL: u16 = 0;
pub const PROCESSOR_ARCHITECTURE_ARM: u16 = 5;
pub const PROCESSOR_ARCHITECTURE_IA64: u16 = 6;
pub const PROCESSOR_ARCHITECTURE_AMD64: u16 = 9;
pub const PROCESSOR_ARCHITECTURE_ARM64: u16 = 12;

/// Name formats understood by the user-name query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFormat {
    /// `MACHINE\user` or `DOMAIN\user`.
    SamCompatible,
    /// `user@domain`.
    UserPrincipal,
}

impl NameFormat {
    pub const fn as_raw(self) -> i32 {
        match self {
            Self::SamCompatible => 2,
            Self::UserPrincipal => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetJoinStatus {
    Unknown,
    Unjoined,
    WorkgroupName,
    DomainName,
}

impl NetJoinStatus {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::Unjoined,
            2 => Self::WorkgroupName,
            3 => Self::DomainName,
            _ => Self::Unknown,
        }
    }
}

/// Buffer allocated by the join-information query. Must go back through
/// `NativeApi::net_api_buffer_free`; deliberately neither `Copy` nor `Clone`.
#[derive(Debug, PartialEq, Eq)]
pub struct NetBuffer(usize);

impl NetBuffer {
    pub fn from_raw(addr: usize) -> Self {
        Self(addr)
    }

    pub fn as_raw(&self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub struct JoinInformation {
    /// Return code of the query (`NERR_SUCCESS` on success).
    pub status_code: u32,
    pub join_status: NetJoinStatus,
    pub domain: Option<NetBuffer>,
}

/// Raw operating-system queries. Error values are OS error codes.
pub trait NativeApi: Send + Sync {
    /// User name of the calling thread. With `buffer == None` only the required size
    /// (UTF-16 units including the terminator) is written to `size`.
    fn get_user_name_ex(
        &self,
        format: NameFormat,
        buffer: Option<&mut [u16]>,
        size: &mut u32,
    ) -> Result<(), i32>;

    /// NetBIOS machine name; same sizing contract as `get_user_name_ex`.
    fn get_computer_name(&self, buffer: Option<&mut [u16]>, size: &mut u32) -> Result<(), i32>;

    /// Raw `wProcessorArchitecture` of the native system info.
    fn native_processor_architecture(&self) -> u16;

    fn os_version(&self) -> String;

    /// `Err` means the query itself could not run.
    fn net_get_join_information(&self) -> Result<JoinInformation, i32>;

    fn net_api_buffer_free(&self, buffer: NetBuffer);
}

impl<A: NativeApi + ?Sized> NativeApi for std::sync::Arc<A> {
    fn get_user_name_ex(
        &self,
        format: NameFormat,
        buffer: Option<&mut [u16]>,
        size: &mut u32,
    ) -> Result<(), i32> {
        (**self).get_user_name_ex(format, buffer, size)
    }

    fn get_computer_name(&self, buffer: Option<&mut [u16]>, size: &mut u32) -> Result<(), i32> {
        (**self).get_computer_name(buffer, size)
    }

    fn native_processor_architecture(&self) -> u16 {
        (**self).native_processor_architecture()
    }

    fn os_version(&self) -> String {
        (**self).os_version()
    }

    fn net_get_join_information(&self) -> Result<JoinInformation, i32> {
        (**self).net_get_join_information()
    }

    fn net_api_buffer_free(&self, buffer: NetBuffer) {
        (**self).net_api_buffer_free(buffer)
    }
}
