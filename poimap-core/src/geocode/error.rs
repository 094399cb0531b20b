use thiserror::Error;

/// Errors from [`crate::geocode::Geocoder::geocode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The query was empty after trimming whitespace.
    #[error("geocoding query must not be empty")]
    EmptyQuery,

    /// Network-level failure such as a refused connection or DNS error.
    #[error("network error contacting {url}: {message}")]
    NetworkError {
        /// Request URL.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// The provider did not answer within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    HttpError {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to parse geocoder response: {message}")]
    ParseError {
        /// Decoder error message.
        message: String,
    },
}
