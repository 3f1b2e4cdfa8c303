//! Usage: Scripted `NativeApi` fake returning canned facts and OS error codes.

use super::{
    JoinInformation, NameFormat, NativeApi, NetBuffer, NetJoinStatus, ERROR_MORE_DATA,
    NERR_SUCCESS, PROCESSOR_ARCHITECTURE_AMD64,
};
use crate::shared::mutex_ext::MutexExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Script for one sized name query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedName {
    Value(String),
    /// The size query reports zero and this OS error code.
    FailSizeQuery(i32),
    /// The size query succeeds, the fill fails with this OS error code.
    FailFill(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedJoin {
    Status {
        status_code: u32,
        join_status: NetJoinStatus,
        with_buffer: bool,
    },
    Fails(i32),
}

impl ScriptedJoin {
    pub fn status(status_code: u32, join_status: NetJoinStatus) -> Self {
        Self::Status {
            status_code,
            join_status,
            with_buffer: true,
        }
    }
}

#[derive(Debug)]
pub struct ScriptedApi {
    principal_name: ScriptedName,
    identity_name: ScriptedName,
    machine_name: ScriptedName,
    processor_architecture: u16,
    os_version: String,
    join: ScriptedJoin,
    user_name_calls: AtomicUsize,
    next_buffer: AtomicUsize,
    live_buffers: Mutex<Vec<usize>>,
}

impl Default for ScriptedApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedApi {
    /// A workgroup x64 machine whose user lookups fail with `ERROR_NONE_MAPPED`.
    pub fn new() -> Self {
        Self {
            principal_name: ScriptedName::FailSizeQuery(1332),
            identity_name: ScriptedName::FailSizeQuery(1332),
            machine_name: ScriptedName::FailSizeQuery(1332),
            processor_architecture: PROCESSOR_ARCHITECTURE_AMD64,
            os_version: "Microsoft Windows NT 10.0.19045.0".to_string(),
            join: ScriptedJoin::status(NERR_SUCCESS, NetJoinStatus::WorkgroupName),
            user_name_calls: AtomicUsize::new(0),
            next_buffer: AtomicUsize::new(0x1000),
            live_buffers: Mutex::new(Vec::new()),
        }
    }

    pub fn with_user_principal_name(self, value: impl Into<String>) -> Self {
        self.with_principal_script(ScriptedName::Value(value.into()))
    }

    pub fn with_principal_script(mut self, script: ScriptedName) -> Self {
        self.principal_name = script;
        self
    }

    pub fn with_identity_name(mut self, value: impl Into<String>) -> Self {
        self.identity_name = ScriptedName::Value(value.into());
        self
    }

    pub fn with_identity_script(mut self, script: ScriptedName) -> Self {
        self.identity_name = script;
        self
    }

    pub fn with_machine_name(mut self, value: impl Into<String>) -> Self {
        self.machine_name = ScriptedName::Value(value.into());
        self
    }

    pub fn with_processor_architecture(mut self, raw: u16) -> Self {
        self.processor_architecture = raw;
        self
    }

    pub fn with_os_version(mut self, value: impl Into<String>) -> Self {
        self.os_version = value.into();
        self
    }

    pub fn with_join(mut self, join: ScriptedJoin) -> Self {
        self.join = join;
        self
    }

    pub fn user_name_calls(&self) -> usize {
        self.user_name_calls.load(Ordering::SeqCst)
    }

    pub fn allocated_buffers(&self) -> usize {
        (self.next_buffer.load(Ordering::SeqCst) - 0x1000) / 0x10
    }

    pub fn outstanding_buffers(&self) -> usize {
        self.live_buffers.lock_or_recover().len()
    }
}

fn answer(script: &ScriptedName, buffer: Option<&mut [u16]>, size: &mut u32) -> Result<(), i32> {
    match (script, buffer) {
        (ScriptedName::FailSizeQuery(code), None) => {
            *size = 0;
            Err(*code)
        }
        (ScriptedName::FailSizeQuery(code), Some(_)) => Err(*code),
        (ScriptedName::FailFill(_), None) => {
            *size = 64;
            Err(ERROR_MORE_DATA)
        }
        (ScriptedName::FailFill(code), Some(_)) => Err(*code),
        (ScriptedName::Value(value), buffer) => {
            let units: Vec<u16> = value.encode_utf16().collect();
            let needed = units.len() as u32 + 1;
            match buffer {
                Some(buffer) if *size >= needed && buffer.len() >= needed as usize => {
                    buffer[..units.len()].copy_from_slice(&units);
                    buffer[units.len()] = 0;
                    *size = units.len() as u32;
                    Ok(())
                }
                _ => {
                    *size = needed;
                    Err(ERROR_MORE_DATA)
                }
            }
        }
    }
}

impl NativeApi for ScriptedApi {
    fn get_user_name_ex(
        &self,
        format: NameFormat,
        buffer: Option<&mut [u16]>,
        size: &mut u32,
    ) -> Result<(), i32> {
        self.user_name_calls.fetch_add(1, Ordering::SeqCst);
        let script = match format {
            NameFormat::UserPrincipal => &self.principal_name,
            NameFormat::SamCompatible => &self.identity_name,
        };
        answer(script, buffer, size)
    }

    fn get_computer_name(&self, buffer: Option<&mut [u16]>, size: &mut u32) -> Result<(), i32> {
        answer(&self.machine_name, buffer, size)
    }

    fn native_processor_architecture(&self) -> u16 {
        self.processor_architecture
    }

    fn os_version(&self) -> String {
        self.os_version.clone()
    }

    fn net_get_join_information(&self) -> Result<JoinInformation, i32> {
        match &self.join {
            ScriptedJoin::Fails(code) => Err(*code),
            ScriptedJoin::Status {
                status_code,
                join_status,
                with_buffer,
            } => {
                let domain = with_buffer.then(|| {
                    let addr = self.next_buffer.fetch_add(0x10, Ordering::SeqCst);
                    self.live_buffers.lock_or_recover().push(addr);
                    NetBuffer::from_raw(addr)
                });
                Ok(JoinInformation {
                    status_code: *status_code,
                    join_status: *join_status,
                    domain,
                })
            }
        }
    }

    fn net_api_buffer_free(&self, buffer: NetBuffer) {
        let mut live = self.live_buffers.lock_or_recover();
        match live.iter().position(|addr| *addr == buffer.as_raw()) {
            Some(index) => {
                live.remove(index);
            }
            None => tracing::error!(addr = buffer.as_raw(), "freeing unknown or already-freed buffer"),
        }
    }
}
