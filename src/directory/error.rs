//! Error types for directory operations.

use http::StatusCode;
use thiserror::Error;

use crate::{
    scim::ScimErrorResponse,
    transport::{TransportError, TransportResponse},
};

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Errors that can occur while talking to the directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// No matching resource, or the server answered 404.
    #[error("{resource} not found: {detail}")]
    NotFound {
        /// Resource kind ("Group", "User").
        resource: String,
        /// What was looked up.
        detail: String,
    },

    /// The server rejected the bearer token (401).
    #[error("Unauthorized: {detail}")]
    Unauthorized { detail: String },

    /// The token is valid but lacks permission (403).
    #[error("Forbidden: {detail}")]
    Forbidden { detail: String },

    /// The server answered with a recognizable error body.
    #[error("Directory returned {status}: {detail}")]
    Server {
        status: u16,
        /// SCIM error type (e.g. "uniqueness"), if provided.
        scim_type: Option<String>,
        detail: String,
    },

    /// Unrecognized non-success status.
    #[error("Unable to {operation}; code={status}, body={body}")]
    UnexpectedStatus {
        operation: String,
        status: u16,
        body: String,
    },

    /// The response body does not have the expected shape.
    #[error("Unexpected response: {message}")]
    Protocol { message: String },

    /// A username could not be resolved to a user ID.
    #[error("Unable to get user ID for username {username}: {source}")]
    DependencyResolution {
        username: String,
        #[source]
        source: Box<DirectoryError>,
    },

    /// The request could not be completed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request body could not be encoded.
    #[error("Failed to serialize request: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The tenant did not form a valid URL.
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The token cannot be sent as a header value.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),
}

impl DirectoryError {
    /// Creates a not-found error.
    pub fn not_found(resource: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            detail: detail.into(),
        }
    }

    /// Creates a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Wraps a resolver failure with the username that caused it.
    pub fn dependency(username: impl Into<String>, source: DirectoryError) -> Self {
        Self::DependencyResolution {
            username: username.into(),
            source: Box::new(source),
        }
    }

    /// Returns true for `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DirectoryError::NotFound { .. })
    }

    /// Returns the HTTP status code behind this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            DirectoryError::Unauthorized { .. } => Some(401),
            DirectoryError::Forbidden { .. } => Some(403),
            DirectoryError::Server { status, .. } => Some(*status),
            DirectoryError::UnexpectedStatus { status, .. } => Some(*status),
            DirectoryError::DependencyResolution { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Map well-known failure responses onto error kinds.
///
/// Handles 401, 403 and 404 by status alone, and any other non-success status
/// that carries a SCIM or vendor error body. Returns `None` when the response
/// is not recognized, leaving the caller to report it generically.
pub fn classify_response(response: &TransportResponse, resource: &str) -> Option<DirectoryError> {
    let status = response.status;
    if status.is_success() {
        return None;
    }

    let parsed = ScimErrorResponse::parse(&response.body);
    let detail = parsed
        .as_ref()
        .map(ScimErrorResponse::message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

    match status {
        StatusCode::UNAUTHORIZED => Some(DirectoryError::Unauthorized { detail }),
        StatusCode::FORBIDDEN => Some(DirectoryError::Forbidden { detail }),
        StatusCode::NOT_FOUND => Some(DirectoryError::not_found(resource, detail)),
        _ => parsed.map(|body| DirectoryError::Server {
            status: status.as_u16(),
            scim_type: body.scim_type.clone(),
            detail,
        }),
    }
}

/// Classify a failure response, falling back to `UnexpectedStatus`.
pub fn status_error(response: &TransportResponse, resource: &str, operation: &str) -> DirectoryError {
    classify_response(response, resource).unwrap_or_else(|| DirectoryError::UnexpectedStatus {
        operation: operation.to_string(),
        status: response.status.as_u16(),
        body: response.body_text(),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn response(status: u16, body: &str) -> TransportResponse {
        TransportResponse::new(StatusCode::from_u16(status).unwrap(), body.to_string())
    }

    #[rstest]
    #[case(401, "Unauthorized")]
    #[case(403, "Forbidden")]
    #[case(404, "NotFound")]
    fn test_classify_by_status(#[case] status: u16, #[case] expected: &str) {
        let err = classify_response(&response(status, ""), "Group").unwrap();
        let kind = match err {
            DirectoryError::Unauthorized { .. } => "Unauthorized",
            DirectoryError::Forbidden { .. } => "Forbidden",
            DirectoryError::NotFound { .. } => "NotFound",
            _ => "other",
        };
        assert_eq!(kind, expected);
    }

    #[test]
    fn test_classify_not_found_uses_body_detail() {
        let body = r#"{"schemas":["urn:ietf:params:scim:api:messages:2.0:Error"],"status":"404","detail":"Group g-1 not found"}"#;
        match classify_response(&response(404, body), "Group") {
            Some(DirectoryError::NotFound { resource, detail }) => {
                assert_eq!(resource, "Group");
                assert_eq!(detail, "Group g-1 not found");
            }
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_scim_body() {
        let body = r#"{"schemas":["urn:ietf:params:scim:api:messages:2.0:Error"],"status":"409","scimType":"uniqueness","detail":"exists"}"#;
        match classify_response(&response(409, body), "Group") {
            Some(DirectoryError::Server {
                status,
                scim_type,
                detail,
            }) => {
                assert_eq!(status, 409);
                assert_eq!(scim_type.as_deref(), Some("uniqueness"));
                assert_eq!(detail, "exists");
            }
            other => panic!("Expected Server, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_unrecognized() {
        assert!(classify_response(&response(500, "boom"), "Group").is_none());
        assert!(classify_response(&response(200, ""), "Group").is_none());
    }

    #[test]
    fn test_status_error_fallback() {
        match status_error(&response(502, "bad gateway"), "Group", "delete the Group") {
            DirectoryError::UnexpectedStatus {
                operation,
                status,
                body,
            } => {
                assert_eq!(operation, "delete the Group");
                assert_eq!(status, 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("Expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[test]
    fn test_dependency_error_names_username() {
        let err = DirectoryError::dependency(
            "alice",
            DirectoryError::not_found("User", "no user found with userName alice"),
        );
        assert!(err.to_string().contains("alice"));
        assert!(!err.is_not_found());
        assert_eq!(err.status(), None);
    }
}
