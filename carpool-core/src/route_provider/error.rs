use thiserror::Error;

/// Errors from [`crate::route_provider::RouteProvider::route_between`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteProviderError {
    /// The routing service could not be reached.
    #[error("network error calling {url}: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The routing service did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The routing service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The routing service reported a domain error, e.g. `NoRoute`.
    #[error("routing service error {code}: {message}")]
    ServiceError {
        /// Service status code.
        code: String,
        /// Service message, possibly empty.
        message: String,
    },
    /// The response body could not be interpreted.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Decoder error description.
        message: String,
    },
}
