//! Usage: Process-wide `tracing` subscriber (stderr + optional daily-rolling file).

use crate::infra::settings::AdapterSettings;
use crate::shared::error::{AppError, AppResult, ErrorCode};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "desktop-auth.log";

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Flushes the file writer on drop. Keep it alive for the life of the process.
#[must_use]
pub struct LoggingGuard {
    file: Option<WorkerGuard>,
}

impl LoggingGuard {
    pub fn writes_file(&self) -> bool {
        self.file.is_some()
    }
}

fn env_filter(settings: &AdapterSettings) -> AppResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&settings.log_filter).map_err(|e| {
        AppError::with_code(
            ErrorCode::ConfigInvalid,
            format!("log_filter invalid: {}: {e}", settings.log_filter),
        )
    })
}

/// Later calls are no-ops returning an empty guard.
pub fn init(settings: &AdapterSettings) -> AppResult<LoggingGuard> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(LoggingGuard { file: None });
    }

    let filter = match env_filter(settings) {
        Ok(filter) => filter,
        Err(err) => {
            INITIALIZED.store(false, Ordering::SeqCst);
            return Err(err);
        }
    };

    let mut file_guard = None;
    let file_layer = match settings.log_dir.as_deref() {
        Some(dir) => {
            if let Err(err) = std::fs::create_dir_all(dir) {
                INITIALIZED.store(false, Ordering::SeqCst);
                return Err(AppError::with_code(
                    ErrorCode::ConfigInvalid,
                    format!("log_dir not writable: {}", dir.display()),
                )
                .with_source(err));
            }
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            file_guard = Some(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true),
            )
        }
        None => None,
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init();

    if let Err(err) = installed {
        // Someone else owns the global subscriber; leave it in place.
        eprintln!("tracing subscriber already installed: {err}");
        return Ok(LoggingGuard { file: None });
    }

    tracing::info!(
        product_name = %settings.product_name,
        file_logging = file_guard.is_some(),
        "logging initialized"
    );
    Ok(LoggingGuard { file: file_guard })
}
