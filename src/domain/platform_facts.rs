//! Usage: Platform fact snapshot reported to the protocol layer.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProcessorArchitecture {
    #[serde(rename = "x64")]
    X64,
    #[serde(rename = "ARM")]
    Arm,
    #[serde(rename = "x86")]
    X86,
    Unknown,
}

impl ProcessorArchitecture {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::Arm => "ARM",
            Self::X86 => "x86",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ProcessorArchitecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot, built on demand. `device_model` is always `None`: the adapter
/// may run on servers and never reports hardware identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformFacts {
    pub product_name: String,
    pub user_principal_name: Option<String>,
    pub processor_architecture: ProcessorArchitecture,
    pub operating_system_version: String,
    pub device_model: Option<String>,
    pub is_domain_joined: bool,
    pub is_current_user_local: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn architecture_serializes_with_wire_names() {
        let names: Vec<String> = [
            ProcessorArchitecture::X64,
            ProcessorArchitecture::Arm,
            ProcessorArchitecture::X86,
            ProcessorArchitecture::Unknown,
        ]
        .iter()
        .map(|arch| serde_json::to_string(arch).unwrap())
        .collect();
        assert_eq!(names, vec!["\"x64\"", "\"ARM\"", "\"x86\"", "\"Unknown\""]);
    }

    #[test]
    fn facts_serialize_device_model_as_null() {
        let facts = PlatformFacts {
            product_name: "PCL.Desktop".to_string(),
            user_principal_name: None,
            processor_architecture: ProcessorArchitecture::X64,
            operating_system_version: "Microsoft Windows NT 10.0.19045.0".to_string(),
            device_model: None,
            is_domain_joined: false,
            is_current_user_local: true,
        };
        let value = serde_json::to_value(&facts).unwrap();
        assert!(value["device_model"].is_null());
        assert_eq!(value["processor_architecture"], "x64");
    }
}
