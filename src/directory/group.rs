//! Group management against a SCIM 2.0 directory.
//!
//! Every public operation takes a display name, while the server only
//! addresses groups by ID, so each call starts with a filtered lookup
//! (`displayName eq "<name>"`). Membership writes then resolve usernames to
//! user IDs through the injected [`UserResolver`] before anything is sent.
//!
//! All steps run one after another; a failure at any step ends the call and
//! nothing after it is sent.

use bytes::Bytes;
use http::StatusCode;
use serde_json::Value;
use tracing::instrument;

use super::{
    error::{DirectoryError, DirectoryResult, status_error},
    request::{
        API_GROUPS, collection_url, create_headers, filtered_url, first_resource_id,
        read_headers, resource_url, write_headers,
    },
    user::UserResolver,
};
use crate::{
    config::{AuthConfig, Scheme},
    scim::{
        Group, GroupListQuery, GroupListResponse, GroupPatch, MemberRef, PatchOp, PatchRequest,
        filter::{ATTR_DISPLAY_NAME, eq_filter},
        patch::OP_REMOVE,
    },
    transport::Transport,
};

const RESOURCE: &str = "Group";

/// Client for the tenant's group collection.
#[derive(Debug, Clone)]
pub struct GroupClient<T, R> {
    transport: T,
    resolver: R,
    scheme: Scheme,
}

impl<T: Transport, R: UserResolver> GroupClient<T, R> {
    /// Creates a client that reaches tenants over HTTPS.
    pub fn new(transport: T, resolver: R) -> Self {
        Self {
            transport,
            resolver,
            scheme: Scheme::default(),
        }
    }

    /// Sets the URL scheme used for tenant endpoints.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Resolve a display name to the group's ID.
    ///
    /// Fails with `NotFound` when nothing matches. When several groups share
    /// the name, the first one returned by the server wins.
    #[instrument(skip(self, auth), fields(tenant = %auth.tenant))]
    pub async fn group_id(&self, auth: &AuthConfig, name: &str) -> DirectoryResult<String> {
        let filter = eq_filter(ATTR_DISPLAY_NAME, name);
        let url = filtered_url(self.scheme, auth, API_GROUPS, &filter)?;

        let response = self.transport.get(url, read_headers(auth)?).await?;

        if response.status != StatusCode::OK {
            let err = status_error(&response, RESOURCE, "get the Group");
            tracing::error!(group = name, error = %err, "Unable to get the Group");
            return Err(err);
        }

        first_resource_id(&response.body, RESOURCE, &filter)
    }

    /// Fetch a group by display name.
    ///
    /// Returns the group as the server reports it (member values are user
    /// IDs) together with the URL it was read from.
    #[instrument(skip(self, auth), fields(tenant = %auth.tenant))]
    pub async fn get_group(&self, auth: &AuthConfig, name: &str) -> DirectoryResult<(Group, String)> {
        let id = self
            .group_id(auth, name)
            .await
            .inspect_err(|e| tracing::error!(group = name, error = %e, "Unable to get the group ID"))?;

        let url = resource_url(self.scheme, auth, API_GROUPS, &id)?;
        let location = url.to_string();

        let response = self.transport.get(url, read_headers(auth)?).await?;

        if response.status != StatusCode::OK {
            let err = status_error(&response, RESOURCE, "get the Group");
            tracing::error!(group = name, error = %err, "Unable to get the Group");
            return Err(err);
        }

        let group: Group = serde_json::from_slice(&response.body).map_err(|e| {
            tracing::error!(group = name, error = %e, "Unable to decode the Group");
            DirectoryError::protocol(format!("unable to decode the Group: {e}"))
        })?;

        Ok((group, location))
    }

    /// List groups, optionally sorted and limited.
    ///
    /// Returns the list envelope and the exact URL queried.
    #[instrument(skip(self, auth), fields(tenant = %auth.tenant))]
    pub async fn get_groups(
        &self,
        auth: &AuthConfig,
        query: &GroupListQuery,
    ) -> DirectoryResult<(GroupListResponse, String)> {
        let mut url = collection_url(self.scheme, auth, API_GROUPS)?;

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(sort_by) = query.sort_by.as_deref().filter(|s| !s.is_empty()) {
            params.push(("sortBy", sort_by.to_string()));
        }
        if let Some(count) = query.count {
            params.push(("count", count.to_string()));
        }
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        let location = url.to_string();
        let response = self.transport.get(url, read_headers(auth)?).await?;

        if response.status != StatusCode::OK {
            let err = status_error(&response, RESOURCE, "get the Groups");
            tracing::error!(error = %err, "Unable to get the Groups");
            return Err(err);
        }

        let list: GroupListResponse = serde_json::from_slice(&response.body).map_err(|e| {
            tracing::error!(error = %e, body = %response.body_text(), "Unable to decode the Groups");
            DirectoryError::protocol(format!("unable to decode the Groups: {e}"))
        })?;

        Ok((list, location))
    }

    /// Replace every member's username with its user ID.
    ///
    /// Consumes the group and returns the rewritten copy; the first username
    /// that fails to resolve aborts the whole rewrite.
    pub async fn resolve_members(&self, auth: &AuthConfig, mut group: Group) -> DirectoryResult<Group> {
        for member in &mut group.members {
            member.value = self.resolve_username(auth, &member.value).await?;
        }
        Ok(group)
    }

    /// Create a group whose members are given by username.
    ///
    /// Returns the URL of the new resource. Success is exactly `201 Created`
    /// with a body carrying the new `id`.
    #[instrument(
        skip(self, auth, group),
        fields(tenant = %auth.tenant, group = %group.display_name, members = group.members.len())
    )]
    pub async fn create_group(&self, auth: &AuthConfig, group: Group) -> DirectoryResult<String> {
        let group = self.resolve_members(auth, group).await?;

        let body = serde_json::to_vec(&group).inspect_err(
            |e| tracing::error!(error = %e, "Unable to marshal group data"),
        )?;

        let url = collection_url(self.scheme, auth, API_GROUPS)?;
        let response = self
            .transport
            .post(url, create_headers(auth)?, Bytes::from(body))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Unable to create group"))?;

        if response.status != StatusCode::CREATED {
            let err = status_error(&response, RESOURCE, "create the Group");
            tracing::error!(
                code = response.status.as_u16(),
                body = %response.body_text(),
                "Failed to create group"
            );
            return Err(err);
        }

        let created: Value = serde_json::from_slice(&response.body)
            .map_err(|e| DirectoryError::protocol(format!("failed to parse response: {e}")))?;
        let id = created
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DirectoryError::protocol("created group has no string id"))?;

        Ok(resource_url(self.scheme, auth, API_GROUPS, id)?.to_string())
    }

    /// Delete a group by display name. Success is exactly `204 No Content`.
    #[instrument(skip(self, auth), fields(tenant = %auth.tenant))]
    pub async fn delete_group(&self, auth: &AuthConfig, name: &str) -> DirectoryResult<()> {
        let id = self
            .group_id(auth, name)
            .await
            .inspect_err(|e| tracing::error!(group = name, error = %e, "Unable to get the group ID"))?;

        let url = resource_url(self.scheme, auth, API_GROUPS, &id)?;
        let response = self
            .transport
            .delete(url, write_headers(auth)?)
            .await
            .inspect_err(|e| tracing::error!(group = name, error = %e, "Unable to delete the Group"))?;

        if response.status != StatusCode::NO_CONTENT {
            let err = status_error(&response, RESOURCE, "delete the Group");
            tracing::error!(group = name, error = %err, "Unable to delete the Group");
            return Err(err);
        }

        Ok(())
    }

    /// Rewrite caller-supplied operations into their wire form.
    ///
    /// - `add` on `members`: each element with a string `value` gets that
    ///   username replaced by the user ID; other elements are kept as given.
    /// - `remove` whose path contains `value eq <username>` (quoted or not):
    ///   the path becomes `members[value eq "<id>"]`.
    /// - Everything else, including a `remove` path with no username in it,
    ///   is forwarded unchanged.
    ///
    /// The input is consumed and a new list returned. Any resolution failure
    /// aborts the rewrite.
    pub async fn translate_operations(
        &self,
        auth: &AuthConfig,
        operations: Vec<PatchOp>,
    ) -> DirectoryResult<Vec<PatchOp>> {
        let mut translated = Vec::with_capacity(operations.len());

        for op in operations {
            let op = match GroupPatch::from(op) {
                GroupPatch::AddMembers { members } => {
                    let mut values = Vec::with_capacity(members.len());
                    for member in members {
                        let value = match member {
                            MemberRef::Username { ref username, .. } => {
                                let user_id = self.resolve_username(auth, username).await?;
                                member.into_resolved(user_id)
                            }
                            MemberRef::Other(value) => {
                                tracing::debug!("Member entry without a string value left as is");
                                value
                            }
                        };
                        values.push(value);
                    }
                    PatchOp::add_members(values)
                }
                GroupPatch::RemoveMember { username, value } => {
                    let user_id = self.resolve_username(auth, &username).await?;
                    GroupPatch::remove_member_op(&user_id, value)
                }
                GroupPatch::Opaque(op) => {
                    if op.op == OP_REMOVE {
                        tracing::warn!(
                            path = op.path.as_deref().unwrap_or_default(),
                            "Remove path names no member, forwarding unchanged"
                        );
                    }
                    op
                }
            };
            translated.push(op);
        }

        Ok(translated)
    }

    /// Apply membership and attribute changes to a group by display name.
    ///
    /// The group is looked up first; then every operation is translated (see
    /// [`translate_operations`](Self::translate_operations)); only then is a
    /// single PATCH sent. Success is exactly `204 No Content`.
    #[instrument(
        skip(self, auth, operations),
        fields(tenant = %auth.tenant, operations = operations.len())
    )]
    pub async fn update_group(
        &self,
        auth: &AuthConfig,
        name: &str,
        operations: Vec<PatchOp>,
    ) -> DirectoryResult<()> {
        let id = self
            .group_id(auth, name)
            .await
            .inspect_err(|e| tracing::error!(group = name, error = %e, "Unable to get the group ID"))?;

        let operations = self.translate_operations(auth, operations).await?;

        let body = serde_json::to_vec(&PatchRequest::new(operations)).inspect_err(
            |e| tracing::error!(error = %e, "Unable to marshal the patch request"),
        )?;

        let url = resource_url(self.scheme, auth, API_GROUPS, &id)?;
        let response = self
            .transport
            .patch(url, write_headers(auth)?, Bytes::from(body))
            .await
            .inspect_err(|e| tracing::error!(group = name, error = %e, "Unable to update group"))?;

        if response.status != StatusCode::NO_CONTENT {
            let err = status_error(&response, RESOURCE, "update the Group");
            tracing::error!(
                group = name,
                code = response.status.as_u16(),
                body = %response.body_text(),
                "Failed to update group"
            );
            return Err(err);
        }

        Ok(())
    }

    async fn resolve_username(&self, auth: &AuthConfig, username: &str) -> DirectoryResult<String> {
        self.resolver
            .resolve_user_id(auth, username)
            .await
            .map_err(|e| {
                tracing::error!(username, error = %e, "Unable to get user ID for username");
                DirectoryError::dependency(username, e)
            })
    }
}
