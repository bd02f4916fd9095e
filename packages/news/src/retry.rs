//! HTTP retry helper for transient feed errors.
//!
//! Feed fetches go through [`send_text`] instead of calling
//! `reqwest::RequestBuilder::send()` directly, so connection resets,
//! timeouts, and server errors get a short exponential backoff before the
//! query is given up on.
//!
//! A query that still fails is logged and skipped by the aggregator, and
//! the whole pipeline runs under a per-request deadline.
//!
//! ```ignore
//! let xml = retry::send_text(|| client.get(&url).query(&params)).await?;
//! ```

use std::time::Duration;

use crate::NewsError;

/// Maximum number of retry attempts after the first request.
///
/// Backoff is 500ms then 1s, so a failing query costs at most 1.5s of
/// sleeping on top of its per-request timeouts.
const MAX_RETRIES: u32 = 2;

/// Delay before the first retry; doubles on each subsequent attempt.
const BASE_DELAY: Duration = Duration::from_millis(500);

/// Sends an HTTP request and returns the response body as a `String`.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`] (builders are consumed by `.send()`).
///
/// Retries connection errors, timeouts, HTTP 429, and HTTP 5xx. Other 4xx
/// responses are permanent and returned immediately.
///
/// # Errors
///
/// Returns [`NewsError`] if the request fails after all retries, the
/// server returns a non-retryable status code, or the body cannot be read.
#[allow(clippy::future_not_send)]
pub async fn send_text<F>(build_request: F) -> Result<String, NewsError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = send_inner(&build_request, MAX_RETRIES).await?;
    Ok(response.text().await?)
}

/// Core retry loop. Returns the first response with a 2xx or 3xx status.
#[allow(clippy::future_not_send)]
async fn send_inner<F>(
    build_request: &F,
    max_retries: u32,
) -> Result<reqwest::Response, NewsError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = backoff(attempt);
            log::debug!("  retry {attempt}/{max_retries} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        let can_retry = attempt < max_retries;
        attempt += 1;

        let response = match build_request().send().await {
            Ok(response) => response,
            Err(e) if can_retry && is_transient(&e) => {
                log::warn!("  transient error: {e}");
                continue;
            }
            Err(e) => return Err(NewsError::Http(e)),
        };

        let status = response.status();
        match classify(status) {
            StatusAction::Accept => return Ok(response),
            StatusAction::Retry if can_retry => {
                log::warn!("  HTTP {status}, will retry");
            }
            StatusAction::Retry => {
                return Err(NewsError::Status {
                    message: format!("HTTP {status} after {max_retries} retries"),
                });
            }
            StatusAction::Fail => {
                return Err(NewsError::Status {
                    message: format!("HTTP {status}"),
                });
            }
        }
    }
}

/// What to do with a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusAction {
    Accept,
    Retry,
    Fail,
}

/// 429 and 5xx are retried, other 4xx fail immediately, everything else
/// is accepted.
fn classify(status: reqwest::StatusCode) -> StatusAction {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        StatusAction::Retry
    } else if status.is_client_error() {
        StatusAction::Fail
    } else {
        StatusAction::Accept
    }
}

/// Delay before retry number `attempt` (1-based).
fn backoff(attempt: u32) -> Duration {
    BASE_DELAY * 2u32.saturating_pow(attempt.saturating_sub(1))
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}
