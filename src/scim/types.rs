//! SCIM 2.0 Group Resource and Protocol Types
//!
//! This module defines the Group resource as exchanged with the remote
//! directory (core schema plus the vendor group and notification extensions)
//! and the list envelope returned by collection queries, per RFC 7643/7644.

use serde::{Deserialize, Serialize};

// =============================================================================
// Schema URIs
// =============================================================================

/// SCIM Core Group schema URI
pub const SCHEMA_GROUP: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";

/// Vendor Group extension schema URI (description, owners)
pub const SCHEMA_GROUP_EXTENSION: &str = "urn:ietf:params:scim:schemas:extension:ibm:2.0:Group";

/// Vendor Notification extension schema URI
pub const SCHEMA_NOTIFICATION: &str =
    "urn:ietf:params:scim:schemas:extension:ibm:2.0:Notification";

/// SCIM ListResponse schema URI
pub const SCHEMA_LIST_RESPONSE: &str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";

/// SCIM Error schema URI
pub const SCHEMA_ERROR: &str = "urn:ietf:params:scim:api:messages:2.0:Error";

/// SCIM PatchOp schema URI
pub const SCHEMA_PATCH_OP: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

/// Media type used for every request and response body.
pub const SCIM_CONTENT_TYPE: &str = "application/scim+json";

// =============================================================================
// Group Resource (RFC 7643)
// =============================================================================

/// SCIM Group resource.
///
/// `id` is assigned by the server and is the only key the server addresses
/// groups by; `display_name` is a convenience key the client resolves to `id`
/// on every name-addressed call.
///
/// Absent fields take their value from [`Group::default`], so a group read
/// without `schemas` still carries the core Group URN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Group {
    /// SCIM schema URIs for this resource
    pub schemas: Vec<String>,

    /// Server-assigned unique identifier (empty until created)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Client-assigned identifier for correlation with an external system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// Human-readable group name
    #[serde(default)]
    pub display_name: String,

    /// Whether the group is visible to end users
    #[serde(default)]
    pub visible: bool,

    /// Group members. On create these carry usernames; on read, opaque IDs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,

    /// Vendor group extension
    #[serde(
        rename = "urn:ietf:params:scim:schemas:extension:ibm:2.0:Group",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub extension: Option<GroupExtension>,

    /// Notification settings, passed through untouched
    #[serde(
        rename = "urn:ietf:params:scim:schemas:extension:ibm:2.0:Notification",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub notification: Option<GroupNotification>,

    /// Resource metadata (server-populated, read-only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<GroupMeta>,
}

impl Group {
    /// Create a new group with the given display name and no members
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    /// Add a user member, identified by username until the group is created
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Set the description in the vendor group extension
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.extension
            .get_or_insert_with(GroupExtension::default)
            .description = Some(description.into());
        self
    }

    /// Owners declared in the vendor group extension
    pub fn owners(&self) -> &[Owner] {
        self.extension
            .as_ref()
            .map(|ext| ext.owners.as_slice())
            .unwrap_or_default()
    }
}

impl Default for Group {
    fn default() -> Self {
        Self {
            schemas: vec![SCHEMA_GROUP.to_string()],
            id: String::new(),
            external_id: None,
            display_name: String::new(),
            visible: false,
            members: Vec::new(),
            extension: None,
            notification: None,
            meta: None,
        }
    }
}

/// Group member reference.
///
/// `value` is a username when supplied by a caller and an opaque user ID on
/// the wire; the client rewrites it before transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Member type (e.g. "user" or "group"), not enforced by the client
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub member_type: Option<String>,

    /// Username (caller side) or opaque user ID (wire side)
    #[serde(default)]
    pub value: String,

    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    /// URI reference to the member, informational only
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub ref_uri: Option<String>,
}

impl Member {
    /// Create a user member reference
    pub fn user(value: impl Into<String>) -> Self {
        Self {
            member_type: Some("user".to_string()),
            value: value.into(),
            display: None,
            ref_uri: None,
        }
    }
}

/// Vendor group extension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupExtension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<Owner>,
}

/// Group owner: an opaque reference plus optional display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub value: String,

    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub ref_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Notification settings for group changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNotification {
    /// Notification channel (e.g. "EMAIL", "NONE")
    #[serde(default)]
    pub notify_type: String,

    #[serde(default)]
    pub notify_password: bool,

    #[serde(default)]
    pub notify_manager: bool,
}

/// Server-populated timestamps, kept exactly as the server formats them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

// =============================================================================
// Protocol Types (RFC 7644)
// =============================================================================

/// SCIM list response for group collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupListResponse {
    /// Total number of results available
    #[serde(default)]
    pub total_results: u64,

    /// SCIM schema URIs
    #[serde(default)]
    pub schemas: Vec<String>,

    /// Number of results returned in this response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_per_page: Option<u64>,

    /// 1-based index of the first result in this response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u64>,

    /// The groups in this page
    #[serde(rename = "Resources", default)]
    pub groups: Vec<Group>,
}

/// Sort and page-size hints for a collection query.
///
/// Empty values are never sent; a `None` or blank `sort_by` and a `None`
/// `count` leave the corresponding query parameter off the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupListQuery {
    /// Attribute to sort by (e.g. "displayName")
    pub sort_by: Option<String>,

    /// Maximum number of results per page
    pub count: Option<u32>,
}

impl GroupListQuery {
    pub fn sorted_by(mut self, attr: impl Into<String>) -> Self {
        self.sort_by = Some(attr.into());
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
