//! Usage: Unified adapter error model (maps internal failures to `CODE: message` strings).

use std::sync::Arc;

pub type AppResult<T> = Result<T, AppError>;

/// Stable error codes surfaced to the protocol layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    PlatformQueryFailed,
    InvalidArgumentShape,
    InvalidState,
    TransportTimeout,
    TransportAbort,
    TransportFailed,
    ConfigInvalid,
    TaskJoin,
    InternalError,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlatformQueryFailed => "PLATFORM_QUERY_FAILED",
            Self::InvalidArgumentShape => "INVALID_ARGUMENT_SHAPE",
            Self::InvalidState => "INVALID_STATE",
            Self::TransportTimeout => "TRANSPORT_TIMEOUT",
            Self::TransportAbort => "TRANSPORT_ABORT",
            Self::TransportFailed => "TRANSPORT_FAILED",
            Self::ConfigInvalid => "CONFIG_INVALID",
            Self::TaskJoin => "TASK_JOIN",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        Some(match value {
            "PLATFORM_QUERY_FAILED" => Self::PlatformQueryFailed,
            "INVALID_ARGUMENT_SHAPE" => Self::InvalidArgumentShape,
            "INVALID_STATE" => Self::InvalidState,
            "TRANSPORT_TIMEOUT" => Self::TransportTimeout,
            "TRANSPORT_ABORT" => Self::TransportAbort,
            "TRANSPORT_FAILED" => Self::TransportFailed,
            "CONFIG_INVALID" => Self::ConfigInvalid,
            "TASK_JOIN" => Self::TaskJoin,
            "INTERNAL_ERROR" => Self::InternalError,
            _ => return None,
        })
    }

    pub const fn is_timeout(self) -> bool {
        matches!(self, Self::TransportTimeout | Self::TransportAbort)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{code}: {message}")]
pub struct AppError {
    code: String,
    message: String,
    #[source]
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn with_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code.as_str(), message)
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Failure of a native OS query; the OS error code rides along as an `io::Error` source.
    pub fn platform_query_failed(query: &str, os_error_code: i32) -> Self {
        Self::with_code(
            ErrorCode::PlatformQueryFailed,
            format!("{query} failed (os error {os_error_code})"),
        )
        .with_source(std::io::Error::from_raw_os_error(os_error_code))
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_str(&self.code)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn os_error_code(&self) -> Option<i32> {
        self.source
            .as_deref()
            .and_then(|source| source.downcast_ref::<std::io::Error>())
            .and_then(std::io::Error::raw_os_error)
    }
}

fn split_code_message(raw: &str) -> Option<(&str, &str)> {
    let msg = raw.trim();
    let msg = msg.strip_prefix("Error:").unwrap_or(msg).trim();
    if msg.is_empty() {
        return None;
    }

    let (maybe_code, rest) = msg.split_once(':')?;
    let code = maybe_code.trim();
    if code.is_empty() {
        return None;
    }
    let mut chars = code.chars();
    let first = chars.next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    if !chars.all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_') {
        return None;
    }
    Some((code, rest.trim()))
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        if let Some((code, rest)) = split_code_message(&value) {
            let message = if rest.is_empty() { value.trim() } else { rest };
            return AppError::new(code.to_string(), message.to_string());
        }
        AppError::with_code(ErrorCode::InternalError, value)
    }
}

impl From<&'static str> for AppError {
    fn from(value: &'static str) -> Self {
        AppError::from(value.to_string())
    }
}

impl From<AppError> for String {
    fn from(value: AppError) -> Self {
        value.to_string()
    }
}
