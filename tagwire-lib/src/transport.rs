//! HTTP transport seam for the search client.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SearchError;

/// Raw response handed back by a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl TransportResponse {
    /// `true` for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The GET primitive consumed by [`SearchClient`](crate::client::SearchClient).
///
/// The default implementation is [`HttpTransport`]. Tests and embedders can
/// substitute their own (a canned-response fake, an instrumented client)
/// without touching the scheduling or extraction logic above it.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a GET request against `url`.
    async fn get(&self, url: &str) -> Result<TransportResponse, SearchError>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Creates a transport with a default client and no timeout.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: None,
        }
    }

    /// Creates a transport that applies `timeout` to every request.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Some(timeout),
        }
    }

    /// Wraps an existing client (shared connection pools, proxies, extra
    /// headers).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, SearchError> {
        let mut request = self.client.get(url);

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let ok = TransportResponse {
            status: 204,
            body: String::new(),
        };
        assert!(ok.is_success());

        let redirect = TransportResponse {
            status: 304,
            body: String::new(),
        };
        assert!(!redirect.is_success());

        let error = TransportResponse {
            status: 500,
            body: String::new(),
        };
        assert!(!error.is_success());
    }
}
