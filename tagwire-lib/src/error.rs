//! Error types.

/// Errors raised while performing a remote search.
///
/// These never escape [`RemoteSearch`](crate::search::RemoteSearch), which
/// logs them and degrades to empty results. They are public so that custom
/// [`Transport`](crate::transport::Transport) implementations and direct
/// [`SearchClient`](crate::client::SearchClient) callers can match on the
/// failure class.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The rendered URL template is not a valid URL.
    #[error("invalid search URL: {0}")]
    InvalidUrl(String),

    /// Non-success HTTP response from the endpoint.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// Network failure while contacting the endpoint.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body is not valid JSON.
    #[error("response parse error: {0}")]
    Parse(String),

    /// The response did not contain an array where one was expected.
    #[error("expected an array at `{path}`, found {found}")]
    UnexpectedShape {
        /// The configured results path, or the response root.
        path: String,
        /// JSON type name of what was there instead.
        found: &'static str,
    },
}

impl SearchError {
    /// HTTP status code for error responses, if applicable.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SearchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
