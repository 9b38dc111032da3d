//! SCIM 2.0 Protocol Types
//!
//! Wire-level types for talking to a SCIM 2.0 (System for Cross-domain
//! Identity Management) directory as a client.
//!
//! ## RFC References
//!
//! - RFC 7643: SCIM Core Schema
//! - RFC 7644: SCIM Protocol
//!
//! ## Module Structure
//!
//! - [`types`]: Group resource, member/owner references, list envelope
//! - [`error`]: error bodies returned by the directory
//! - [`filter`]: filter expression builders
//! - [`patch`]: PATCH request envelope and the typed membership view

pub mod error;
pub mod filter;
pub mod patch;
pub mod types;

pub use error::ScimErrorResponse;
pub use filter::{eq_filter, member_value_path};
pub use patch::{
    GroupPatch, GroupPatchRequest, MemberRef, PatchOp, PatchRequest, extract_member_value,
};
pub use types::*;
