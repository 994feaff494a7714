use thiserror::Error;

/// Errors from [`crate::CountrySource`] and [`crate::HistorySource`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request was rejected before anything was sent.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Reason the request was rejected.
        message: String,
    },
    /// The source could not be reached.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out")]
    Timeout {
        /// Requested URL.
        url: String,
    },
    /// The source answered with a non-success status.
    #[error("{url} returned HTTP {status}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The response body did not have the expected shape.
    #[error("malformed response from {url}: {message}")]
    Parse {
        /// Requested URL.
        url: String,
        /// Decoding error description.
        message: String,
    },
    /// The HTTP client or its runtime could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    Client {
        /// Construction error description.
        message: String,
    },
}
