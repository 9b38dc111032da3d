//! SCIM directory client.
//!
//! - [`GroupClient`]: group lookup, read, create, delete and membership patching
//! - [`UserResolver`]: username to user ID resolution, with [`ScimUserResolver`]
//!   as the network-backed implementation
//! - [`DirectoryError`]: failure kinds shared by both
//!
//! Both clients are generic over [`Transport`](crate::transport::Transport) so
//! tests can script the server without a socket.

mod error;
mod group;
mod request;
#[cfg(test)]
pub(crate) mod test_utils;
mod user;

use std::sync::Arc;

pub use error::{DirectoryError, DirectoryResult, classify_response, status_error};
pub use group::GroupClient;
pub use request::{API_GROUPS, API_USERS, HEADER_NO_PASSWORD_RESET};
pub use user::{ScimUserResolver, UserResolver};

use crate::{
    config::ClientConfig,
    transport::{ReqwestTransport, TransportError},
};

/// Group client wired to the production transport and resolver.
pub type ScimGroupClient =
    GroupClient<Arc<ReqwestTransport>, ScimUserResolver<Arc<ReqwestTransport>>>;

impl ScimGroupClient {
    /// Build a client whose group and user requests share one connection pool.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let transport = Arc::new(ReqwestTransport::from_config(config)?);
        let resolver = ScimUserResolver::new(Arc::clone(&transport)).with_scheme(config.scheme);
        Ok(GroupClient::new(transport, resolver).with_scheme(config.scheme))
    }
}
