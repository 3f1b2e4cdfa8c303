//! Usage: Single HTTP exchange under an enforced timeout, blocking or non-blocking.
//!
//! Blocking calls hand the timeout to the transport. Non-blocking calls arm a background
//! timer that cancels a `CancellationToken`; cancellation drops the in-flight request.
//! The timer is disarmed when the call returns, whichever side finished first.

use crate::blocking;
use crate::domain::call_state::CallState;
use crate::shared::error::{AppError, AppResult, ErrorCode};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct BoundedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl BoundedRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Host and path only; query strings may carry codes or state.
    fn log_target(&self) -> String {
        format!("{}{}", self.url.host_str().unwrap_or_default(), self.url.path())
    }
}

#[derive(Debug, Clone)]
pub struct BoundedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl BoundedResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Exactly one per call.
#[derive(Debug)]
pub enum TimeoutOutcome {
    Completed(BoundedResponse),
    /// `TRANSPORT_TIMEOUT` from the transport, or `TRANSPORT_ABORT` when the timer aborted the request.
    TimedOut(AppError),
    Failed(AppError),
}

impl TimeoutOutcome {
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut(_))
    }

    pub fn into_result(self) -> AppResult<BoundedResponse> {
        match self {
            Self::Completed(response) => Ok(response),
            Self::TimedOut(err) | Self::Failed(err) => Err(err),
        }
    }
}

fn classify_transport_error(err: reqwest::Error) -> TimeoutOutcome {
    if err.is_timeout() {
        return TimeoutOutcome::TimedOut(
            AppError::with_code(ErrorCode::TransportTimeout, "request timed out").with_source(err),
        );
    }
    TimeoutOutcome::Failed(
        AppError::with_code(ErrorCode::TransportFailed, format!("request failed: {err}"))
            .with_source(err),
    )
}

pub struct BoundedRequestExecutor {
    client: reqwest::Client,
    user_agent: Option<String>,
    armed_timers: Arc<AtomicUsize>,
}

impl BoundedRequestExecutor {
    pub fn new(user_agent: Option<String>) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(agent) = user_agent.as_deref() {
            builder = builder.user_agent(agent);
        }
        let client = builder.build().map_err(|e| {
            AppError::with_code(ErrorCode::InternalError, format!("http client init failed: {e}"))
        })?;
        Ok(Self {
            client,
            user_agent,
            armed_timers: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Timers currently armed by in-flight non-blocking calls.
    pub fn pending_timers(&self) -> usize {
        self.armed_timers.load(Ordering::SeqCst)
    }

    pub async fn execute(
        &self,
        request: BoundedRequest,
        timeout_ms: u64,
        call_state: &CallState,
    ) -> TimeoutOutcome {
        if !call_state.call_sync {
            return self
                .execute_non_blocking(request, timeout_ms, &call_state.correlation_id)
                .await;
        }

        // The caller's task stays parked for the whole exchange; the blocking I/O itself
        // must not run on a runtime worker.
        let user_agent = self.user_agent.clone();
        let correlation_id = call_state.correlation_id.clone();
        let result = blocking::run("bounded_request_blocking", move || {
            Ok::<_, AppError>(send_blocking(
                user_agent.as_deref(),
                request,
                timeout_ms,
                &correlation_id,
            ))
        })
        .await;
        match result {
            Ok(outcome) => outcome,
            Err(err) => TimeoutOutcome::Failed(err),
        }
    }

    /// Runs on the calling thread. Must not be called from inside an async runtime.
    pub fn execute_blocking(
        &self,
        request: BoundedRequest,
        timeout_ms: u64,
        correlation_id: &str,
    ) -> TimeoutOutcome {
        send_blocking(self.user_agent.as_deref(), request, timeout_ms, correlation_id)
    }

    pub async fn execute_non_blocking(
        &self,
        request: BoundedRequest,
        timeout_ms: u64,
        correlation_id: &str,
    ) -> TimeoutOutcome {
        let target = request.log_target();
        tracing::debug!(correlation_id, timeout_ms, endpoint = %target, "sending non-blocking request");

        let token = CancellationToken::new();
        let _timer = TimerGuard::arm(
            Duration::from_millis(timeout_ms),
            token.clone(),
            Arc::clone(&self.armed_timers),
        );

        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let exchange = async move {
            let response = builder.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(BoundedResponse {
                status,
                headers,
                body,
            })
        };

        let outcome = tokio::select! {
            biased;
            result = exchange => match result {
                Ok(response) => TimeoutOutcome::Completed(response),
                Err(err) => classify_transport_error(err),
            },
            _ = token.cancelled() => TimeoutOutcome::TimedOut(AppError::with_code(
                ErrorCode::TransportAbort,
                format!("request aborted after {timeout_ms}ms timeout"),
            )),
        };

        if outcome.is_timed_out() {
            tracing::warn!(correlation_id, timeout_ms, endpoint = %target, "request timed out");
        }
        outcome
    }
}

fn send_blocking(
    user_agent: Option<&str>,
    request: BoundedRequest,
    timeout_ms: u64,
    correlation_id: &str,
) -> TimeoutOutcome {
    let target = request.log_target();
    tracing::debug!(correlation_id, timeout_ms, endpoint = %target, "sending blocking request");

    let mut builder = reqwest::blocking::Client::builder();
    if let Some(agent) = user_agent {
        builder = builder.user_agent(agent);
    }
    let client = match builder.build() {
        Ok(client) => client,
        Err(err) => return classify_transport_error(err),
    };

    let mut request_builder = client
        .request(request.method, request.url)
        .headers(request.headers)
        .timeout(Duration::from_millis(timeout_ms));
    if let Some(body) = request.body {
        request_builder = request_builder.body(body.to_vec());
    }

    let result = request_builder.send().and_then(|response| {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes()?;
        Ok(BoundedResponse {
            status,
            headers,
            body,
        })
    });

    match result {
        Ok(response) => TimeoutOutcome::Completed(response),
        Err(err) => {
            let outcome = classify_transport_error(err);
            if outcome.is_timed_out() {
                tracing::warn!(correlation_id, timeout_ms, endpoint = %target, "request timed out");
            }
            outcome
        }
    }
}

/// Background timer that cancels the token on expiry; aborted and uncounted on drop.
struct TimerGuard {
    handle: JoinHandle<()>,
    armed: Arc<AtomicUsize>,
}

impl TimerGuard {
    fn arm(after: Duration, token: CancellationToken, armed: Arc<AtomicUsize>) -> Self {
        armed.fetch_add(1, Ordering::SeqCst);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            token.cancel();
        });
        Self { handle, armed }
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.handle.abort();
        self.armed.fetch_sub(1, Ordering::SeqCst);
    }
}
