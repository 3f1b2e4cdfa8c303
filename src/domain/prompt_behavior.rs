//! Usage: Prompt-behavior policy and the authorization parameters a caller supplies per attempt.

use crate::shared::error::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How aggressively a login flow should force user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptBehavior {
    /// Prompt only when the server requires it.
    #[default]
    Auto,
    Always,
    Never,
    RefreshSession,
}

impl PromptBehavior {
    pub const ALL: [PromptBehavior; 4] = [
        PromptBehavior::Auto,
        PromptBehavior::Always,
        PromptBehavior::Never,
        PromptBehavior::RefreshSession,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
            Self::RefreshSession => "refresh_session",
        }
    }
}

impl std::fmt::Display for PromptBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptBehavior {
    type Err = AppError;

    fn from_str(value: &str) -> AppResult<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        PromptBehavior::ALL
            .into_iter()
            .find(|behavior| behavior.as_str() == normalized)
            .ok_or_else(|| {
                AppError::with_code(
                    ErrorCode::InvalidArgumentShape,
                    format!("prompt behavior `{}` is not one of auto/always/never/refresh_session", value.trim()),
                )
            })
    }
}

/// Raw numeric values as a host application would pass them across an FFI boundary.
impl TryFrom<i32> for PromptBehavior {
    type Error = AppError;

    fn try_from(raw: i32) -> AppResult<Self> {
        match raw {
            0 => Ok(Self::Auto),
            1 => Ok(Self::Always),
            2 => Ok(Self::Never),
            3 => Ok(Self::RefreshSession),
            _ => Err(AppError::with_code(
                ErrorCode::InvalidState,
                format!("Unexpected PromptBehavior value {raw}"),
            )),
        }
    }
}

/// Native handle of the window that owns the login dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthorizationParameters {
    pub prompt_behavior: PromptBehavior,
    pub owner_window: Option<WindowHandle>,
}

impl AuthorizationParameters {
    pub fn new(prompt_behavior: PromptBehavior) -> Self {
        Self {
            prompt_behavior,
            owner_window: None,
        }
    }

    pub fn with_owner_window(mut self, owner_window: WindowHandle) -> Self {
        self.owner_window = Some(owner_window);
        self
    }

    pub fn from_raw(raw_prompt_behavior: i32, owner_window: Option<WindowHandle>) -> AppResult<Self> {
        Ok(Self {
            prompt_behavior: PromptBehavior::try_from(raw_prompt_behavior)?,
            owner_window,
        })
    }
}
