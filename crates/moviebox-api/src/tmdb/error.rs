//! Typed failure taxonomy for TMDB API operations.

use thiserror::Error;

/// TMDB body status codes that mean the credential itself is bad.
///
/// 7 = invalid API key, 10 = suspended API key.
const INVALID_KEY_CODES: &[u32] = &[7, 10];

/// Failure kinds returned by every [`TmdbClient`](super::TmdbClient) operation.
///
/// Callers pattern-match on the variant instead of inspecting message text:
/// [`ApiError::InvalidKey`] maps to the dedicated cannot-connect
/// presentation, everything else to the generic retryable one.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The client was misconfigured (empty key, unparseable base URL).
    #[error("client configuration error: {message}")]
    Config {
        /// What was wrong.
        message: String,
    },

    /// TMDB rejected the API key (HTTP 401, or body status code 7/10).
    #[error("TMDB rejected the API key: {message}")]
    InvalidKey {
        /// Upstream status message.
        message: String,
    },

    /// HTTP 429. Recovery is manual; the client never retries on its own.
    #[error("TMDB rate limit hit (HTTP 429)")]
    RateLimited,

    /// Any other non-success status with a parseable TMDB error body.
    #[error("TMDB API error (HTTP {status}): code={code}, {message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// TMDB body status code.
        code: u32,
        /// TMDB body status message.
        message: String,
    },

    /// Non-success status whose body was not a TMDB error document.
    #[error("TMDB API error (HTTP {status})")]
    Http {
        /// HTTP status code.
        status: u16,
    },

    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("request to TMDB failed")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected schema.
    #[error("failed to decode TMDB response for {path}")]
    Decode {
        /// Request path the body belonged to.
        path: String,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },

    /// The request path could not be joined onto the base URL.
    #[error("invalid request path: {path}")]
    Url {
        /// The offending path.
        path: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
}

impl ApiError {
    /// Returns whether this failure means the credential is unusable.
    #[must_use]
    pub const fn is_credential_failure(&self) -> bool {
        matches!(self, Self::InvalidKey { .. })
    }

    /// Returns whether the given TMDB body status code denotes a bad key.
    #[must_use]
    pub(crate) fn code_means_invalid_key(code: u32) -> bool {
        INVALID_KEY_CODES.contains(&code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_is_credential_failure() {
        // Arrange
        let err = ApiError::InvalidKey {
            message: String::from("Invalid API key: You must be granted a valid key."),
        };

        // Assert
        assert!(err.is_credential_failure());
    }

    #[test]
    fn test_other_errors_are_not_credential_failures() {
        // Arrange
        let upstream = ApiError::Upstream {
            status: 404,
            code: 34,
            message: String::from("The resource you requested could not be found."),
        };

        // Assert
        assert!(!upstream.is_credential_failure());
        assert!(!ApiError::RateLimited.is_credential_failure());
    }

    #[test]
    fn test_invalid_key_codes() {
        // Assert
        assert!(ApiError::code_means_invalid_key(7));
        assert!(ApiError::code_means_invalid_key(10));
        assert!(!ApiError::code_means_invalid_key(34));
    }

    #[test]
    fn test_display_carries_status_and_code() {
        // Arrange
        let err = ApiError::Upstream {
            status: 404,
            code: 34,
            message: String::from("The resource you requested could not be found."),
        };

        // Act
        let text = err.to_string();

        // Assert
        assert!(text.contains("404"));
        assert!(text.contains("code=34"));
    }
}
