//! SCIM 2.0 PATCH Operations
//!
//! Wire types for PATCH requests per RFC 7644 Section 3.5.2, plus the typed
//! view the group client uses to rewrite membership changes.
//!
//! Callers describe membership changes with usernames:
//!
//! ```json
//! [
//!   { "op": "add", "path": "members", "value": [{"value": "alice"}] },
//!   { "op": "remove", "path": "members[value eq \"bob\"]" }
//! ]
//! ```
//!
//! The server needs opaque user IDs, so each operation is parsed once into a
//! [`GroupPatch`] and rebuilt after the usernames are resolved:
//!
//! ```json
//! {
//!   "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
//!   "Operations": [
//!     { "op": "add", "path": "members", "value": [{"value": "u-1"}] },
//!     { "op": "remove", "path": "members[value eq \"u-2\"]" }
//!   ]
//! }
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{filter::member_value_path, types::SCHEMA_PATCH_OP};

/// Operation name for adding values.
pub const OP_ADD: &str = "add";

/// Operation name for removing values.
pub const OP_REMOVE: &str = "remove";

/// Attribute path of the membership list.
pub const PATH_MEMBERS: &str = "members";

/// Captures the comparand of `value eq ...`, with or without quotes.
static MEMBER_VALUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"value eq "?([^"]+)"?"#).unwrap());

/// A SCIM PATCH request containing one or more operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRequest {
    /// SCIM schema URIs (always the PatchOp schema when built here)
    #[serde(default)]
    pub schemas: Vec<String>,

    /// List of patch operations to apply, in order
    #[serde(rename = "Operations")]
    pub operations: Vec<PatchOp>,
}

impl PatchRequest {
    /// Create a new patch request with operations
    pub fn new(operations: Vec<PatchOp>) -> Self {
        Self {
            schemas: vec![SCHEMA_PATCH_OP.to_string()],
            operations,
        }
    }
}

/// A group update document: the target group's display name together with
/// the PATCH envelope to apply to it.
///
/// ```json
/// {
///   "displayName": "Engineers",
///   "scimPatch": {
///     "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
///     "Operations": [{ "op": "remove", "path": "members[value eq \"bob\"]" }]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPatchRequest {
    /// Display name of the group to update
    #[serde(rename = "displayName")]
    pub display_name: String,

    /// Operations to apply, with usernames in member values
    #[serde(rename = "scimPatch")]
    pub scim_patch: PatchRequest,
}

impl GroupPatchRequest {
    pub fn new(display_name: impl Into<String>, operations: Vec<PatchOp>) -> Self {
        Self {
            display_name: display_name.into(),
            scim_patch: PatchRequest::new(operations),
        }
    }
}

/// A single SCIM PATCH operation as it appears on the wire.
///
/// `op` is kept as a plain string: operations this client does not rewrite
/// (`replace`, vendor extensions, typos) are forwarded exactly as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOp {
    pub op: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOp {
    /// Create an operation with an arbitrary op name
    pub fn new(op: impl Into<String>, path: Option<String>, value: Option<Value>) -> Self {
        Self {
            op: op.into(),
            path,
            value,
        }
    }

    /// Create an add operation on the membership list
    pub fn add_members(members: Vec<Value>) -> Self {
        Self::new(
            OP_ADD,
            Some(PATH_MEMBERS.to_string()),
            Some(Value::Array(members)),
        )
    }

    /// Create a remove operation with the given path
    pub fn remove(path: impl Into<String>) -> Self {
        Self::new(OP_REMOVE, Some(path.into()), None)
    }

    /// Create a replace operation
    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self::new("replace", Some(path.into()), Some(value))
    }
}

/// Typed view of a caller-supplied group patch operation.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupPatch {
    /// `add` on `members` with an array value
    AddMembers { members: Vec<MemberRef> },

    /// `remove` whose path names a member by username
    RemoveMember {
        username: String,
        /// Carried over unchanged if the caller supplied one
        value: Option<Value>,
    },

    /// Anything else: forwarded without modification
    Opaque(PatchOp),
}

/// One element of an `add members` value list.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberRef {
    /// An object with a string `value`, which holds a username
    Username {
        username: String,
        entry: Map<String, Value>,
    },

    /// Any other element, forwarded without modification
    Other(Value),
}

impl MemberRef {
    /// Rebuild the element with `value` replaced by the resolved user ID.
    ///
    /// All other keys of the entry are kept as supplied.
    pub fn into_resolved(self, user_id: impl Into<String>) -> Value {
        match self {
            MemberRef::Username { mut entry, .. } => {
                entry.insert("value".to_string(), Value::String(user_id.into()));
                Value::Object(entry)
            }
            MemberRef::Other(value) => value,
        }
    }
}

impl From<Value> for MemberRef {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(entry) => match entry.get("value") {
                Some(Value::String(username)) => MemberRef::Username {
                    username: username.clone(),
                    entry,
                },
                _ => MemberRef::Other(Value::Object(entry)),
            },
            other => MemberRef::Other(other),
        }
    }
}

impl From<PatchOp> for GroupPatch {
    fn from(op: PatchOp) -> Self {
        if op.op == OP_ADD && op.path.as_deref() == Some(PATH_MEMBERS) {
            return match op.value {
                Some(Value::Array(values)) => GroupPatch::AddMembers {
                    members: values.into_iter().map(MemberRef::from).collect(),
                },
                value => GroupPatch::Opaque(PatchOp { value, ..op }),
            };
        }

        if op.op == OP_REMOVE
            && let Some(username) = op.path.as_deref().and_then(extract_member_value)
        {
            return GroupPatch::RemoveMember {
                username,
                value: op.value,
            };
        }

        GroupPatch::Opaque(op)
    }
}

impl GroupPatch {
    /// Build the wire form of a resolved member removal.
    ///
    /// The caller's original path is discarded in favour of the canonical
    /// `members[value eq "<id>"]` selector.
    pub fn remove_member_op(user_id: &str, value: Option<Value>) -> PatchOp {
        PatchOp::new(OP_REMOVE, Some(member_value_path(user_id)), value)
    }
}

/// Extract the comparand of a `value eq ...` expression from a PATCH path.
///
/// Accepts both `members[value eq "alice"]` and `value eq alice`. For an
/// unquoted comparand the capture runs to the end of the string, so
/// `members[value eq alice]` yields `alice]`.
pub fn extract_member_value(path: &str) -> Option<String> {
    MEMBER_VALUE_REGEX
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

// =============================================================================
// Tests
// =============================================================================
