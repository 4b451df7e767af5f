//! Minimal JSON-over-HTTP client with safe logging and an opt-in retry policy.
//!
//! - Request options: query params (repeated keys allowed), timeout, retries
//! - Retries 429/5xx and network failures with exponential backoff and
//!   `Retry-After` support, but only when a retry budget is configured
//! - The default budget is zero: a non-success response surfaces immediately
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), skyrank_http::HttpError> {
//! let client = skyrank_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", skyrank_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response status, body snippets (truncated, `trace` level), retries and
//! final errors.

use bytes::Bytes;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

const SNIPPET_MAX: usize = 500;
const BACKOFF_BASE_MS: u64 = 200;
const RATE_LIMIT_FLOOR: Duration = Duration::from_millis(1100);

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(1);

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

// ==============================
// Request Options
// ==============================

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use skyrank_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts::default()
///     .param("actor", "alice.example.com")
///     .param("limit", "100")
///     .with_timeout(Duration::from_secs(30));
///
/// assert_eq!(opts.query.len(), 2);
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(opts.retries.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    /// Query pairs in order; a key may repeat (`actors=a&actors=b`).
    pub query: Vec<(&'a str, Cow<'a, str>)>,
}

impl<'a> RequestOpts<'a> {
    /// Append one query pair.
    pub fn param(mut self, key: &'a str, value: impl Into<Cow<'a, str>>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    pub fn with_retries(mut self, n: usize) -> Self {
        self.retries = Some(n);
        self
    }
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use skyrank_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// assert_eq!(client.max_retries, 0);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
            max_retries: 0,
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Override the default retry budget (zero) returned by [`HttpClient::new`].
    ///
    /// ```no_run
    /// use skyrank_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new("https://api.example.com")?.with_retries(3);
    /// assert_eq!(client.max_retries, 3);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// GET `path` (relative to the base URL) and decode the JSON body.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let url = self
            .base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))?;

        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let pairs: Vec<(&str, &str)> = opts.query.iter().map(|(k, v)| (*k, v.as_ref())).collect();
        let req_id = format!("r{}", REQUEST_SEQ.fetch_add(1, Ordering::Relaxed));
        let host_path = format!("{}{}", url.host_str().unwrap_or("-"), url.path());

        let mut attempt = 0usize;
        loop {
            tracing::debug!(
                req_id=%req_id,
                attempt=attempt + 1,
                max_retries,
                host_path=%host_path,
                query=?pairs,
                timeout_ms=timeout.as_millis() as u64,
                "http.request.start"
            );

            let t0 = std::time::Instant::now();
            let (status, headers, bytes) = match self.send_once(&url, &pairs, timeout).await {
                Ok(parts) => parts,
                Err(err) if attempt < max_retries => {
                    attempt += 1;
                    let delay = backoff_delay(attempt, false, None);
                    tracing::warn!(
                        req_id = %req_id,
                        attempt,
                        backoff_ms = delay.as_millis() as u64,
                        error = %err,
                        "http.retrying.network"
                    );
                    sleep(delay).await;
                    continue;
                }
                Err(err) => {
                    tracing::warn!(req_id = %req_id, error = %err, "http.network_error");
                    return Err(HttpError::Network(err.to_string()));
                }
            };

            let request_id = headers
                .get("x-request-id")
                .or_else(|| headers.get("x-correlation-id"))
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_string();
            let rate_remaining = headers
                .get("ratelimit-remaining")
                .and_then(|v| v.to_str().ok());

            tracing::debug!(
                req_id=%req_id,
                %status,
                duration_ms=t0.elapsed().as_millis() as u64,
                body_len=bytes.len(),
                x_request_id=%request_id,
                rate_limit.remaining=?rate_remaining,
                "http.response"
            );

            let snippet = snip_body(&bytes);
            tracing::trace!(req_id=%req_id, body_snippet=%snippet, "http.response.body_snippet");

            if status.is_success() {
                return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                    tracing::warn!(
                        req_id=%req_id,
                        serde_line=%e.line(),
                        serde_col=%e.column(),
                        serde_err=%e,
                        body_snippet=%snippet,
                        "http.response.decode_error"
                    );
                    HttpError::Decode(e.to_string(), snippet)
                });
            }

            let message = extract_error_message(&bytes);
            let is_429 = status == StatusCode::TOO_MANY_REQUESTS;

            if (is_429 || status.is_server_error()) && attempt < max_retries {
                attempt += 1;
                let retry_after = retry_after_secs(&headers);
                let delay = backoff_delay(attempt, is_429, retry_after);
                tracing::warn!(
                    req_id=%req_id,
                    %status,
                    attempt,
                    max_retries,
                    backoff_ms=delay.as_millis() as u64,
                    retry_after_secs=?retry_after,
                    message=%message,
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            tracing::warn!(
                req_id=%req_id,
                %status,
                message=%message,
                x_request_id=%request_id,
                body_snippet=%snippet,
                "http.error"
            );
            return Err(HttpError::Api {
                status,
                message,
                request_id,
            });
        }
    }

    async fn send_once(
        &self,
        url: &Url,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<(StatusCode, HeaderMap, Bytes), reqwest::Error> {
        let resp = self
            .inner
            .get(url.clone())
            .query(query)
            .timeout(timeout)
            .send()
            .await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        Ok((status, headers, resp.bytes().await?))
    }
}

// ==============================
// Helpers
// ==============================

/// Delay before retry number `attempt` (1-based).
///
/// `Retry-After` wins when present; otherwise exponential from 200ms, with a
/// floor of 1.1s for 429 responses.
fn backoff_delay(attempt: usize, is_429: bool, retry_after: Option<u64>) -> Duration {
    if let Some(secs) = retry_after {
        return Duration::from_secs(secs);
    }
    let shift = attempt.saturating_sub(1).min(16) as u32;
    let exp = Duration::from_millis(BACKOFF_BASE_MS.saturating_mul(1u64 << shift));
    if is_429 {
        exp.max(RATE_LIMIT_FLOOR)
    } else {
        exp
    }
}

/// XRPC-style `{"error": "...", "message": "..."}` bodies; falls back to a snippet.
fn extract_error_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        error: String,
        #[serde(default)]
        message: String,
    }

    if let Ok(b) = serde_json::from_slice::<ErrorBody>(body) {
        match (b.error.is_empty(), b.message.is_empty()) {
            (false, false) => return format!("{}: {}", b.error, b.message),
            (true, false) => return b.message,
            (false, true) => return b.error,
            (true, true) => {}
        }
    }
    snip_body(body)
}

fn retry_after_secs(h: &HeaderMap) -> Option<u64> {
    h.get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .trim()
        .parse()
        .ok()
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_exponentially() {
        assert_eq!(backoff_delay(1, false, None), Duration::from_millis(200));
        assert_eq!(backoff_delay(2, false, None), Duration::from_millis(400));
        assert_eq!(backoff_delay(3, false, None), Duration::from_millis(800));
    }

    #[test]
    fn rate_limited_backoff_has_floor() {
        assert_eq!(backoff_delay(1, true, None), RATE_LIMIT_FLOOR);
        assert_eq!(backoff_delay(5, true, None), Duration::from_millis(3200));
    }

    #[test]
    fn retry_after_overrides_backoff() {
        assert_eq!(backoff_delay(4, true, Some(2)), Duration::from_secs(2));
    }

    #[test]
    fn xrpc_error_body_is_summarised() {
        let body = br#"{"error":"InvalidRequest","message":"Profile not found"}"#;
        assert_eq!(
            extract_error_message(body),
            "InvalidRequest: Profile not found"
        );
    }

    #[test]
    fn unknown_error_body_falls_back_to_snippet() {
        assert_eq!(extract_error_message(b"gateway down"), "gateway down");
    }

    #[test]
    fn long_bodies_are_truncated_on_char_boundary() {
        let body = "é".repeat(400);
        let snip = snip_body(body.as_bytes());
        assert!(snip.ends_with("..."));
        assert!(snip.len() <= SNIPPET_MAX + 3);
    }
}
