use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

use super::{Transport, TransportError, TransportRequest, TransportResponse};
use crate::config::ClientConfig;

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport around an existing client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            timeout: Duration::from_millis(30_000),
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates a transport from configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self::new(client).with_timeout(config.timeout()))
    }

    fn map_error(&self, url: &str, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else if err.is_connect() {
            TransportError::Connect {
                url: url.to_string(),
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        } else {
            TransportError::Request {
                url: url.to_string(),
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(
        skip(self, request),
        fields(method = %request.method, url = %request.url)
    )]
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let url = request.url.to_string();

        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers)
            .timeout(self.timeout);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.map_error(&url, e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_error(&url, e))?;

        tracing::debug!(status = status.as_u16(), body_len = body.len(), "Response received");

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Scheme;

    #[test]
    fn test_builder() {
        let transport =
            ReqwestTransport::new(Client::new()).with_timeout(Duration::from_millis(1500));
        assert_eq!(transport.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig {
            scheme: Scheme::Http,
            timeout_ms: 750,
            user_agent: "scimctl-test".into(),
        };
        let transport = ReqwestTransport::from_config(&config).unwrap();
        assert_eq!(transport.timeout, Duration::from_millis(750));
    }
}
