//! Blocking bridge over an async `reqwest` client.
//!
//! The source traits in `popstat-core` are synchronous. [`HttpFetcher`] owns a
//! current-thread Tokio runtime and blocks on each request, reusing the
//! runtime and connection pool across calls.

use std::time::{Duration, Instant};

use log::{debug, warn};
use popstat_core::FetchError;
use reqwest::Client;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "popstat/0.1";

/// Configuration shared by the HTTP sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSourceConfig {
    /// Scheme and host of the service, e.g. `"https://restcountries.com"`.
    pub base_url: String,
    /// Whole-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
    /// User agent string for requests.
    pub user_agent: String,
}

impl HttpSourceConfig {
    /// Create a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Join `path` onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Synchronous GET client returning response bodies as text.
pub(crate) struct HttpFetcher {
    client: Client,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("client", &self.client)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpFetcher {
    pub(crate) fn new(config: &HttpSourceConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.connect_timeout(timeout).timeout(timeout);
        }
        let client = builder.build().map_err(|err| FetchError::Client {
            message: err.to_string(),
        })?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| FetchError::Client {
                message: format!("failed to build Tokio runtime: {err}"),
            })?;
        Ok(Self { client, runtime })
    }

    /// GET `url` with `query` appended and return the body.
    ///
    /// Non-success statuses map to [`FetchError::Http`].
    pub(crate) fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, FetchError> {
        let started_at = Instant::now();
        let future = self.get_text_async(url, query);
        // block_in_place needs a multi-threaded runtime; anything else falls
        // back to the owned runtime.
        let outcome = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        };
        match &outcome {
            Ok(body) => debug!(
                "event=http_get status=ok url={url} bytes={} duration_ms={}",
                body.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=http_get status=error url={url} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        outcome
    }

    async fn get_text_async(&self, url: &str, query: &[(&str, &str)]) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(&err, url))?;

        response
            .text()
            .await
            .map_err(|err| convert_reqwest_error(&err, url))
    }
}

fn convert_reqwest_error(error: &reqwest::Error, url: &str) -> FetchError {
    if error.is_timeout() {
        return FetchError::Timeout {
            url: url.to_owned(),
        };
    }

    if let Some(status) = error.status() {
        return FetchError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    if error.is_decode() || error.is_body() {
        return FetchError::Parse {
            url: url.to_owned(),
            message: error.to_string(),
        };
    }

    FetchError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}
