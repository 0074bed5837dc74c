//! Bounded HTTP fetching with linear backoff.
//!
//! All network I/O for the search crawl goes through [`BoundedFetcher`].
//! A fetch makes up to [`RetryPolicy::max_attempts`] attempts; before
//! attempt *k* (0-indexed) it sleeps `k × wait`, so the first attempt is
//! immediate and the remote server gets progressively more recovery time.
//! Exhausting the budget is a reported condition, not a crash: the fetcher
//! logs one durable error record and returns `None`, which callers must
//! distinguish from an empty successful body.
//!
//! The HTTP transport and the sleep are both behind traits so the retry
//! policy is unit-testable without a network or real delays.

use crate::errlog::ErrorSink;
use std::error::Error;
use std::time::Duration;
use tracing::{info, warn};

/// A fetched response: final status code plus the full body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status code counts as success.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal HTTP GET transport.
pub trait HttpGet {
    async fn get(&self, url: &str) -> Result<HttpResponse, Box<dyn Error>>;
}

/// [`HttpGet`] backed by a shared `reqwest` client.
#[derive(Debug, Default)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HttpGet for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, Box<dyn Error>> {
        let res = self.client.get(url).send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;
        Ok(HttpResponse { status, body })
    }
}

/// A sleep, injectable so tests run without real delays.
pub trait Sleep {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleep`] backed by the tokio timer.
#[derive(Debug, Default)]
pub struct TokioSleep;

impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retry budget and backoff shape for one fetch.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts before giving up.
    pub max_attempts: u32,
    /// Backoff unit; attempt *k* waits `k × wait` beforehand.
    pub wait: Duration,
}

impl RetryPolicy {
    /// Delay observed before the given 0-indexed attempt.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.wait.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            wait: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
impl<H, S> BoundedFetcher<H, S> {
    /// Test-only access to the underlying transport.
    pub fn http(&self) -> &H {
        &self.http
    }
}

enum LastFailure {
    Status { status: u16, body: String },
    Transport(String),
}

/// Performs one logical GET with a bounded retry budget.
pub struct BoundedFetcher<H, S> {
    http: H,
    sleeper: S,
    policy: RetryPolicy,
}

impl<H: HttpGet, S: Sleep> BoundedFetcher<H, S> {
    pub fn new(http: H, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            http,
            sleeper,
            policy,
        }
    }

    /// Fetch `url`, retrying per the policy.
    ///
    /// Returns `Some` on the first successful status. Returns `None` once
    /// the budget is exhausted, after appending one record (URL, final
    /// status, final body) to `errors`.
    pub async fn fetch(&self, url: &str, errors: &dyn ErrorSink) -> Option<HttpResponse> {
        let mut last = None;
        for attempt in 0..self.policy.max_attempts {
            let delay = self.policy.delay_before(attempt);
            if !delay.is_zero() {
                info!(?delay, attempt, "Backing off before retry");
                self.sleeper.sleep(delay).await;
            }
            match self.http.get(url).await {
                Ok(res) if res.ok() => return Some(res),
                Ok(res) => {
                    warn!(status = res.status, attempt, url, "Response not ok");
                    last = Some(LastFailure::Status {
                        status: res.status,
                        body: res.body,
                    });
                }
                Err(e) => {
                    warn!(error = %e, attempt, url, "Request failed");
                    last = Some(LastFailure::Transport(e.to_string()));
                }
            }
        }
        let detail = match last {
            Some(LastFailure::Status { status, body }) => {
                format!("Got status {status} and content {body}")
            }
            Some(LastFailure::Transport(e)) => format!("Request error: {e}"),
            None => "No attempt was made".to_string(),
        };
        errors.append(&format!("ERR: {url}. Could not get {url}. {detail}"));
        None
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeHttp, NoSleep, RecordingSleep};
    use super::*;
    use crate::errlog::MemorySink;

    fn policy(wait_secs: u64) -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            wait: Duration::from_secs(wait_secs),
        }
    }

    #[test]
    fn delay_grows_linearly_from_zero() {
        let p = policy(30);
        assert_eq!(p.delay_before(0), Duration::ZERO);
        assert_eq!(p.delay_before(1), Duration::from_secs(30));
        assert_eq!(p.delay_before(2), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn success_on_first_attempt_sleeps_never() {
        let http = FakeHttp::new(|_| Ok(HttpResponse::new(200, "hello")));
        let sleeper = RecordingSleep::default();
        let errors = MemorySink::new();
        let fetcher = BoundedFetcher::new(http, sleeper, policy(30));

        let res = fetcher.fetch("http://t/", &errors).await.unwrap();
        assert_eq!(res.body, "hello");
        assert!(fetcher.sleeper.delays.lock().unwrap().is_empty());
        assert!(errors.messages().is_empty());
    }

    #[tokio::test]
    async fn backoff_is_monotonic_over_attempts() {
        let http = FakeHttp::new(|_| Ok(HttpResponse::new(500, "boom")));
        let sleeper = RecordingSleep::default();
        let errors = MemorySink::new();
        let fetcher = BoundedFetcher::new(http, sleeper, policy(7));

        assert!(fetcher.fetch("http://t/", &errors).await.is_none());
        // attempt 0 has no delay; attempts 1 and 2 wait 1x and 2x the unit
        let delays = fetcher.sleeper.delays.lock().unwrap().clone();
        assert_eq!(
            delays,
            vec![Duration::from_secs(7), Duration::from_secs(14)]
        );
        assert_eq!(fetcher.http.call_count(), 3);
    }

    #[tokio::test]
    async fn exhaustion_logs_final_status_and_body() {
        let http = FakeHttp::new(|_| Ok(HttpResponse::new(503, "unavailable")));
        let errors = MemorySink::new();
        let fetcher = BoundedFetcher::new(http, NoSleep, policy(1));

        assert!(fetcher.fetch("http://t/page", &errors).await.is_none());
        let messages = errors.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("http://t/page"));
        assert!(messages[0].contains("503"));
        assert!(messages[0].contains("unavailable"));
    }

    #[tokio::test]
    async fn recovers_within_budget() {
        use std::sync::atomic::{AtomicU32, Ordering};
        let attempts = std::sync::Arc::new(AtomicU32::new(0));
        let seen = attempts.clone();
        let http = FakeHttp::new(move |_| {
            if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(HttpResponse::new(502, "bad gateway"))
            } else {
                Ok(HttpResponse::new(200, "fine"))
            }
        });
        let errors = MemorySink::new();
        let fetcher = BoundedFetcher::new(http, NoSleep, policy(1));

        let res = fetcher.fetch("http://t/", &errors).await.unwrap();
        assert_eq!(res.body, "fine");
        assert!(errors.messages().is_empty());
    }

    #[tokio::test]
    async fn transport_errors_consume_attempts() {
        let http = FakeHttp::new(|_| Err("connection refused".to_string()));
        let errors = MemorySink::new();
        let fetcher = BoundedFetcher::new(http, NoSleep, policy(1));

        assert!(fetcher.fetch("http://t/", &errors).await.is_none());
        assert_eq!(fetcher.http.call_count(), 3);
        let messages = errors.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("connection refused"));
    }
}
