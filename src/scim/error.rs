//! SCIM 2.0 Error Bodies
//!
//! Decoding of error responses returned by the directory, per RFC 7644
//! Section 3.12. Some tenants answer with a vendor message body instead
//! (`messageId` / `messageDescription`); both shapes are accepted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::SCHEMA_ERROR;

/// SCIM error response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimErrorResponse {
    /// SCIM schema URIs (contains the Error schema for RFC-shaped bodies)
    #[serde(default)]
    pub schemas: Vec<String>,

    /// HTTP status code, sent as a string by the RFC and as a number by some servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,

    /// SCIM-specific error type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scim_type: Option<String>,

    /// Human-readable error detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Vendor message identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Vendor message text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_description: Option<String>,
}

impl ScimErrorResponse {
    /// Parse an error body, returning `None` if it carries no recognizable
    /// error information.
    pub fn parse(body: &[u8]) -> Option<Self> {
        let parsed: Self = serde_json::from_slice(body).ok()?;
        if parsed.is_scim_error() || parsed.detail.is_some() || parsed.message_id.is_some() {
            Some(parsed)
        } else {
            None
        }
    }

    /// Whether the body declares the SCIM Error schema
    pub fn is_scim_error(&self) -> bool {
        self.schemas.iter().any(|s| s == SCHEMA_ERROR)
    }

    /// The status code carried in the body, if any
    pub fn status_code(&self) -> Option<u16> {
        match self.status.as_ref()? {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            _ => None,
        }
    }

    /// Best available human-readable message
    pub fn message(&self) -> String {
        match (&self.detail, &self.message_id, &self.message_description) {
            (Some(detail), _, _) => detail.clone(),
            (None, Some(id), Some(description)) => format!("{id}: {description}"),
            (None, Some(id), None) => id.clone(),
            (None, None, Some(description)) => description.clone(),
            (None, None, None) => "no error detail".to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
