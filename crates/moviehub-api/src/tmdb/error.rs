//! Error types for the TMDB client.

use thiserror::Error;

/// Failure of a single TMDB request.
///
/// This is the only error the API client returns from a fetch. Callers
/// decide how to degrade; the client itself never retries.
#[derive(Debug, Error)]
pub enum RemoteFetchError {
    /// The endpoint path could not be joined onto the base URL.
    #[error("invalid request URL for {path}: {source}")]
    InvalidUrl {
        /// Endpoint path relative to the base URL.
        path: String,
        /// Underlying parse error.
        source: url::ParseError,
    },

    /// Transport failure (connect, TLS, timeout, body read).
    #[error("request failed: {path}: {source}")]
    Request {
        /// Endpoint path relative to the base URL.
        path: String,
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },

    /// Upstream answered with a non-success status.
    #[error("TMDB API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// TMDB `status_message`, or the raw body when it is not a TMDB error envelope.
        message: String,
    },

    /// Response body did not match the expected schema.
    #[error("failed to decode JSON response: {path}: {source}")]
    Decode {
        /// Endpoint path relative to the base URL.
        path: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

impl RemoteFetchError {
    /// Returns the HTTP status for upstream errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` when upstream reported the resource as missing (HTTP 404).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// Error returned when a string does not name a content kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown content kind: {0:?} (expected \"movie\" or \"tv\")")]
pub struct ParseMediaKindError(pub String);
