// Typed errors for the backend client. Everything above the HTTP seam uses
// `anyhow`; this enum exists so commands can tell an unreachable backend
// apart from a bad status code and render each one differently.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Nothing is listening at the configured base URL.
    #[error("cannot connect to backend at {url}")]
    Unreachable { url: String },

    #[error("request to {path} timed out")]
    Timeout { path: String },

    /// The backend answered with a non-success status. The body is not
    /// inspected.
    #[error("backend returned status {0}")]
    Status(u16),

    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Classify a transport-level reqwest error for the given request.
    pub(crate) fn from_transport(err: reqwest::Error, base_url: &str, path: &str) -> Self {
        if err.is_connect() {
            ApiError::Unreachable {
                url: base_url.to_string(),
            }
        } else if err.is_timeout() {
            ApiError::Timeout {
                path: path.to_string(),
            }
        } else {
            ApiError::Http(err)
        }
    }
}
