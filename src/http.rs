//! Outbound HTTP transport shared by the YouTube and translation clients.
//!
//! Every upstream call goes through [`HttpTransport`] so that the extraction
//! pipeline can be exercised without the network.

use crate::config::TranscriptSettings;
use crate::error::{redact, Result, ScribeError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Minimal HTTP surface used by the upstream clients.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET a URL and return the body as text.
    async fn get_text(&self, url: &str) -> Result<String>;

    /// GET a URL and parse the body as JSON.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value>;

    /// POST a JSON body and parse the response as JSON.
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<serde_json::Value>;
}

/// Bounded exponential backoff for transient fetch failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (zero-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl From<&TranscriptSettings> for RetryPolicy {
    fn from(settings: &TranscriptSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            initial_backoff: Duration::from_millis(settings.retry_backoff_ms),
        }
    }
}

/// Run `op`, retrying only errors marked transient.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                let delay = policy.backoff(attempt);
                warn!(
                    "Transient failure (attempt {}/{}), retrying in {:?}: {}",
                    attempt + 1,
                    policy.max_retries + 1,
                    delay,
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}

/// reqwest-backed transport with a browser user agent and fixed timeout.
pub struct ReqwestTransport {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl ReqwestTransport {
    /// Build a transport from the transcript settings.
    pub fn new(settings: &TranscriptSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&settings.user_agent)
                .map_err(|e| ScribeError::Config(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| ScribeError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            retry: RetryPolicy::from(settings),
        })
    }

    async fn send(&self, url: &str, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request
            .send()
            .await
            .map_err(|e| ScribeError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScribeError::status(url, status));
        }

        response
            .text()
            .await
            .map_err(|e| ScribeError::transport(url, e))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", redact(url));
        with_retry(&self.retry, || self.send(url, self.client.get(url))).await
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let body = self.get_text(url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<serde_json::Value> {
        debug!("POST {}", redact(url));
        let text = with_retry(&self.retry, || {
            self.send(url, self.client.post(url).json(body))
        })
        .await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory transport double.

    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    pub enum MockResponse {
        Text(String),
        Json(serde_json::Value),
        Status(u16),
    }

    /// Answers requests from a list of `(url substring, response)` routes.
    /// The first route whose pattern occurs in the URL wins.
    #[derive(Default)]
    pub struct MockTransport {
        routes: Vec<(String, MockResponse)>,
        requests: Mutex<Vec<String>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn route(mut self, pattern: &str, response: MockResponse) -> Self {
            self.routes.push((pattern.to_string(), response));
            self
        }

        pub fn text(self, pattern: &str, body: &str) -> Self {
            self.route(pattern, MockResponse::Text(body.to_string()))
        }

        pub fn json(self, pattern: &str, body: serde_json::Value) -> Self {
            self.route(pattern, MockResponse::Json(body))
        }

        pub fn status(self, pattern: &str, status: u16) -> Self {
            self.route(pattern, MockResponse::Status(status))
        }

        /// URLs requested so far, in order.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        fn respond(&self, url: &str) -> Result<String> {
            self.requests.lock().unwrap().push(url.to_string());

            let response = self
                .routes
                .iter()
                .find(|(pattern, _)| url.contains(pattern.as_str()))
                .map(|(_, r)| r.clone())
                .unwrap_or(MockResponse::Status(404));

            match response {
                MockResponse::Text(body) => Ok(body),
                MockResponse::Json(value) => Ok(value.to_string()),
                MockResponse::Status(code) => Err(ScribeError::status(
                    url,
                    reqwest::StatusCode::from_u16(code).unwrap(),
                )),
            }
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn get_text(&self, url: &str) -> Result<String> {
            self.respond(url)
        }

        async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
            Ok(serde_json::from_str(&self.respond(url)?)?)
        }

        async fn post_json(
            &self,
            url: &str,
            _body: &serde_json::Value,
        ) -> Result<serde_json::Value> {
            Ok(serde_json::from_str(&self.respond(url)?)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn flaky(transient: bool) -> ScribeError {
        ScribeError::Fetch {
            reason: "boom".to_string(),
            transient,
        }
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
        };
        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_transport_error_hides_query() {
        let settings = TranscriptSettings {
            request_timeout_secs: 2,
            max_retries: 0,
            ..TranscriptSettings::default()
        };
        let transport = ReqwestTransport::new(&settings).unwrap();

        let err = transport
            .get_json("http://127.0.0.1:1/youtube/v3/channels?part=id&key=SUPERSECRET")
            .await
            .unwrap_err();

        assert!(err.is_transient());
        let msg = err.to_string();
        assert!(!msg.contains("SUPERSECRET"), "{}", msg);
        assert!(msg.contains("http://127.0.0.1:1/youtube/v3/channels"));
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failure() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            max_retries: 2,
            initial_backoff: Duration::ZERO,
        };

        let result = with_retry(&policy, || async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(flaky(true))
            } else {
                Ok("done")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_budget() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            max_retries: 2,
            initial_backoff: Duration::ZERO,
        };

        let result: Result<()> = with_retry(&policy, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(flaky(true))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_no_retry_for_permanent_errors() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            max_retries: 5,
            initial_backoff: Duration::ZERO,
        };

        for err in [flaky(false), ScribeError::NoCaptions, ScribeError::EmptyTranscript] {
            calls.store(0, Ordering::SeqCst);
            let err = std::sync::Mutex::new(Some(err));
            let result: Result<()> = with_retry(&policy, || {
                calls.fetch_add(1, Ordering::SeqCst);
                let e = err.lock().unwrap().take().unwrap_or(ScribeError::NoCaptions);
                async move { Err(e) }
            })
            .await;
            assert!(result.is_err());
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_transport_builds_from_settings() {
        let settings = TranscriptSettings::default();
        assert!(ReqwestTransport::new(&settings).is_ok());

        let bad = TranscriptSettings {
            user_agent: "bad\nagent".to_string(),
            ..TranscriptSettings::default()
        };
        assert!(matches!(
            ReqwestTransport::new(&bad),
            Err(ScribeError::Config(_))
        ));
    }
}
