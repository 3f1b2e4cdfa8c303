//! Usage: Adapter settings (TOML schema + read helpers).

use crate::domain::prompt_behavior::PromptBehavior;
use crate::shared::error::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
pub const SETTINGS_PATH_ENV: &str = "DESKTOP_AUTH_SETTINGS";
pub const DEFAULT_PRODUCT_NAME: &str = "PCL.Desktop";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const MAX_TIMEOUT_MS: u64 = 10 * 60 * 1000;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterSettings {
    pub schema_version: u32,
    pub product_name: String,
    pub default_timeout_ms: u64,
    pub default_prompt_behavior: PromptBehavior,
    pub log_filter: String,
    // Daily-rolling log files are written here when set.
    pub log_dir: Option<PathBuf>,
    pub user_agent: Option<String>,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            default_prompt_behavior: PromptBehavior::Auto,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_dir: None,
            user_agent: None,
        }
    }
}

impl AdapterSettings {
    fn sanitized(mut self) -> Self {
        if self.product_name.trim().is_empty() {
            self.product_name = DEFAULT_PRODUCT_NAME.to_string();
        } else {
            self.product_name = self.product_name.trim().to_string();
        }

        if self.default_timeout_ms > MAX_TIMEOUT_MS {
            tracing::warn!(
                configured = self.default_timeout_ms,
                max = MAX_TIMEOUT_MS,
                "default_timeout_ms out of range; clamped"
            );
            self.default_timeout_ms = MAX_TIMEOUT_MS;
        }

        if self.log_filter.trim().is_empty() {
            self.log_filter = DEFAULT_LOG_FILTER.to_string();
        }

        self.user_agent = self
            .user_agent
            .take()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        self
    }
}

pub fn parse(raw: &str) -> AppResult<AdapterSettings> {
    let settings: AdapterSettings = toml::from_str(raw).map_err(|e| {
        AppError::with_code(ErrorCode::ConfigInvalid, format!("settings toml invalid: {e}"))
    })?;
    if settings.schema_version > SCHEMA_VERSION {
        return Err(AppError::with_code(
            ErrorCode::ConfigInvalid,
            format!(
                "settings schema_version {} is newer than supported {SCHEMA_VERSION}",
                settings.schema_version
            ),
        ));
    }
    Ok(settings.sanitized())
}

/// Missing file reads as defaults.
pub fn read_from_path(path: &Path) -> AppResult<AdapterSettings> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "settings file not found; using defaults");
            return Ok(AdapterSettings::default());
        }
        Err(err) => {
            return Err(AppError::with_code(
                ErrorCode::ConfigInvalid,
                format!("settings read failed: {}", path.display()),
            )
            .with_source(err))
        }
    };
    parse(&raw)
}

/// Settings from the file named by `DESKTOP_AUTH_SETTINGS`, or defaults when unset.
pub fn load() -> AppResult<AdapterSettings> {
    let path = std::env::var(SETTINGS_PATH_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    match path {
        Some(path) => read_from_path(Path::new(&path)),
        None => Ok(AdapterSettings::default()),
    }
}
