//! Usage: Run blocking work on the tokio blocking pool with a stable label.

use crate::shared::error::{AppError, AppResult, ErrorCode};

pub async fn run<T, E>(
    label: &'static str,
    f: impl FnOnce() -> Result<T, E> + Send + 'static,
) -> AppResult<T>
where
    T: Send + 'static,
    E: Into<AppError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(Into::into),
        Err(join_err) => {
            // Panic payloads may carry user data (principal names, URLs); never forward them.
            if join_err.is_panic() {
                tracing::error!(label, "blocking task panicked");
                return Err(AppError::with_code(
                    ErrorCode::TaskJoin,
                    format!("{label}: task panicked"),
                ));
            }

            tracing::warn!(label, "blocking task cancelled");
            Err(AppError::with_code(
                ErrorCode::TaskJoin,
                format!("{label}: task cancelled"),
            ))
        }
    }
}
