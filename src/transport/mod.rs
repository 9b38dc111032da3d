//! HTTP transport abstraction.
//!
//! The directory client only needs "send this method/URL/headers/body, give
//! me back a status code and the raw body". That capability is the
//! [`Transport`] trait; [`ReqwestTransport`] is the production
//! implementation. Connection pooling, TLS and timeouts live behind it.
//!
//! A transport never interprets status codes: any response that made it back
//! from the server is `Ok`, and callers check the status themselves.

mod reqwest_transport;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
pub use reqwest_transport::ReqwestTransport;
use thiserror::Error;
use url::Url;

/// An outbound request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl TransportRequest {
    pub fn new(method: Method, url: Url, headers: HeaderMap, body: Option<Bytes>) -> Self {
        Self {
            method,
            url,
            headers,
            body,
        }
    }
}

/// A response as received from the server, before any status handling.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Errors raised when a request could not be completed at all.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// The connection could not be established.
    #[error("Failed to connect to {url}: {message}")]
    Connect {
        url: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Any other failure while sending the request or reading the body.
    #[error("Request to {url} failed: {message}")]
    Request {
        url: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl TransportError {
    /// Creates a request error without an underlying source.
    pub fn request(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Request {
            url: url.into(),
            message: message.into(),
            source: None,
        }
    }
}

/// Generic HTTP capability used by the directory client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the server's response, whatever its status.
    async fn execute(&self, request: TransportRequest)
    -> Result<TransportResponse, TransportError>;

    async fn get(&self, url: Url, headers: HeaderMap) -> Result<TransportResponse, TransportError> {
        self.execute(TransportRequest::new(Method::GET, url, headers, None))
            .await
    }

    async fn post(
        &self,
        url: Url,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<TransportResponse, TransportError> {
        self.execute(TransportRequest::new(Method::POST, url, headers, Some(body)))
            .await
    }

    async fn patch(
        &self,
        url: Url,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<TransportResponse, TransportError> {
        self.execute(TransportRequest::new(Method::PATCH, url, headers, Some(body)))
            .await
    }

    async fn delete(
        &self,
        url: Url,
        headers: HeaderMap,
    ) -> Result<TransportResponse, TransportError> {
        self.execute(TransportRequest::new(Method::DELETE, url, headers, None))
            .await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        (**self).execute(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        (**self).execute(request).await
    }
}
