//! Request construction and response decoding shared by the group and user
//! clients.

use http::{
    HeaderMap, HeaderName, HeaderValue,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde_json::Value;
use url::Url;

use super::error::{DirectoryError, DirectoryResult};
use crate::{
    config::{AuthConfig, Scheme},
    scim::SCIM_CONTENT_TYPE,
};

/// Group collection path, relative to the tenant root.
pub const API_GROUPS: &str = "v2.0/Groups";

/// User collection path, relative to the tenant root.
pub const API_USERS: &str = "v2.0/Users";

/// Vendor header that stops new members from being forced to reset their password.
pub const HEADER_NO_PASSWORD_RESET: &str = "groupshouldnotneedtoresetpassword";

/// `<scheme>://<tenant>/<api>`
pub fn collection_url(scheme: Scheme, auth: &AuthConfig, api: &str) -> DirectoryResult<Url> {
    parse_url(format!("{scheme}://{}/{api}", auth.tenant))
}

/// `<scheme>://<tenant>/<api>/<id>`
pub fn resource_url(
    scheme: Scheme,
    auth: &AuthConfig,
    api: &str,
    id: &str,
) -> DirectoryResult<Url> {
    parse_url(format!("{scheme}://{}/{api}/{id}", auth.tenant))
}

/// Collection URL with a single `filter` query parameter.
pub fn filtered_url(
    scheme: Scheme,
    auth: &AuthConfig,
    api: &str,
    filter: &str,
) -> DirectoryResult<Url> {
    let mut url = collection_url(scheme, auth, api)?;
    url.query_pairs_mut().append_pair("filter", filter);
    Ok(url)
}

fn parse_url(raw: String) -> DirectoryResult<Url> {
    Url::parse(&raw).map_err(|source| DirectoryError::InvalidUrl { url: raw, source })
}

/// Headers for read requests: `Accept` and `Authorization`.
pub fn read_headers(auth: &AuthConfig) -> DirectoryResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(SCIM_CONTENT_TYPE));
    let mut bearer = HeaderValue::from_str(&auth.bearer())?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);
    Ok(headers)
}

/// Headers for write requests: read headers plus `Content-Type`.
pub fn write_headers(auth: &AuthConfig) -> DirectoryResult<HeaderMap> {
    let mut headers = read_headers(auth)?;
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(SCIM_CONTENT_TYPE));
    Ok(headers)
}

/// Headers for group creation: write headers plus the vendor password-reset header.
pub fn create_headers(auth: &AuthConfig) -> DirectoryResult<HeaderMap> {
    let mut headers = write_headers(auth)?;
    headers.insert(
        HeaderName::from_static(HEADER_NO_PASSWORD_RESET),
        HeaderValue::from_static("false"),
    );
    Ok(headers)
}

/// Extract `Resources[0].id` from a filtered list response.
///
/// The body is read as a generic JSON document since only the ID is needed.
/// An absent or empty `Resources` array means nothing matched. When several
/// resources match, the first is used.
pub fn first_resource_id(body: &[u8], resource: &str, lookup: &str) -> DirectoryResult<String> {
    let data: Value = serde_json::from_slice(body)
        .map_err(|e| DirectoryError::protocol(format!("failed to parse response: {e}")))?;

    let Some(data) = data.as_object() else {
        return Err(DirectoryError::protocol("response is not a JSON object"));
    };

    let resources = match data.get("Resources").and_then(Value::as_array) {
        Some(resources) if !resources.is_empty() => resources,
        _ => {
            return Err(DirectoryError::not_found(
                resource,
                format!("no {} found with {lookup}", resource.to_lowercase()),
            ));
        }
    };

    if resources.len() > 1 {
        tracing::warn!(
            resource,
            lookup,
            matches = resources.len(),
            "Lookup matched more than one resource, using the first"
        );
    }

    let first = resources[0]
        .as_object()
        .ok_or_else(|| DirectoryError::protocol("invalid resource format"))?;

    first
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DirectoryError::protocol("ID not found or invalid type"))
}
