//! Username to user ID resolution.
//!
//! Group membership is addressed by opaque user IDs on the wire, while callers
//! name members by username. [`UserResolver`] is the seam between the two;
//! decorate it to add caching or batching without touching the group client.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use super::{
    error::{DirectoryResult, status_error},
    request::{API_USERS, filtered_url, first_resource_id, read_headers},
};
use crate::{
    config::{AuthConfig, Scheme},
    scim::filter::{ATTR_USER_NAME, eq_filter},
    transport::Transport,
};

/// Resolves a username to the directory's opaque user ID.
#[async_trait]
pub trait UserResolver: Send + Sync {
    async fn resolve_user_id(&self, auth: &AuthConfig, username: &str) -> DirectoryResult<String>;
}

#[async_trait]
impl<R: UserResolver + ?Sized> UserResolver for Arc<R> {
    async fn resolve_user_id(&self, auth: &AuthConfig, username: &str) -> DirectoryResult<String> {
        (**self).resolve_user_id(auth, username).await
    }
}

#[async_trait]
impl<R: UserResolver + ?Sized> UserResolver for &R {
    async fn resolve_user_id(&self, auth: &AuthConfig, username: &str) -> DirectoryResult<String> {
        (**self).resolve_user_id(auth, username).await
    }
}

/// Resolves usernames with a filtered query on the tenant's user collection.
#[derive(Debug, Clone)]
pub struct ScimUserResolver<T> {
    transport: T,
    scheme: Scheme,
}

impl<T: Transport> ScimUserResolver<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            scheme: Scheme::default(),
        }
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }
}

#[async_trait]
impl<T: Transport> UserResolver for ScimUserResolver<T> {
    #[instrument(skip(self, auth), fields(tenant = %auth.tenant))]
    async fn resolve_user_id(&self, auth: &AuthConfig, username: &str) -> DirectoryResult<String> {
        let filter = eq_filter(ATTR_USER_NAME, username);
        let url = filtered_url(self.scheme, auth, API_USERS, &filter)?;

        let response = self.transport.get(url, read_headers(auth)?).await?;

        if response.status != http::StatusCode::OK {
            return Err(status_error(&response, "User", "get the User"));
        }

        first_resource_id(&response.body, "User", &filter)
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};
    use serde_json::json;

    use super::*;
    use crate::{
        directory::{DirectoryError, test_utils::MockTransport},
        transport::TransportResponse,
    };

    fn auth() -> AuthConfig {
        AuthConfig::new("tenant", "tok")
    }

    #[tokio::test]
    async fn test_resolve_user_id() {
        let transport = MockTransport::new().respond_json(
            StatusCode::OK,
            json!({"totalResults": 1, "Resources": [{"id": "u-1", "userName": "alice"}]}),
        );
        let resolver = ScimUserResolver::new(&transport);

        let id = resolver.resolve_user_id(&auth(), "alice").await.unwrap();
        assert_eq!(id, "u-1");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(requests[0].url.path(), "/v2.0/Users");
        assert_eq!(
            transport.query_param(0, "filter").as_deref(),
            Some(r#"userName eq "alice""#)
        );
    }

    #[tokio::test]
    async fn test_resolve_unknown_user() {
        let transport = MockTransport::new()
            .respond_json(StatusCode::OK, json!({"totalResults": 0, "Resources": []}));
        let resolver = ScimUserResolver::new(&transport);

        let err = resolver
            .resolve_user_id(&auth(), "ghost")
            .await
            .unwrap_err();
        match err {
            DirectoryError::NotFound { resource, detail } => {
                assert_eq!(resource, "User");
                assert!(detail.contains("ghost"));
            }
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_unauthorized() {
        let transport = MockTransport::new()
            .respond(TransportResponse::new(StatusCode::UNAUTHORIZED, ""));
        let resolver = ScimUserResolver::new(&transport);

        let err = resolver.resolve_user_id(&auth(), "alice").await.unwrap_err();
        assert!(matches!(err, DirectoryError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_resolve_uses_configured_scheme() {
        let transport = MockTransport::new()
            .respond_json(StatusCode::OK, json!({"Resources": [{"id": "u-1"}]}));
        let resolver = ScimUserResolver::new(&transport).with_scheme(Scheme::Http);

        resolver.resolve_user_id(&auth(), "alice").await.unwrap();
        assert_eq!(transport.requests()[0].url.scheme(), "http");
    }
}
