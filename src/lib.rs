//! Client for managing groups in a SCIM 2.0 identity directory.
//!
//! Groups are addressed by display name and members by username; the client
//! resolves both to the opaque IDs the directory expects before sending any
//! write.
//!
//! ```ignore
//! use scimctl::{config::{AuthConfig, ClientConfig}, directory::ScimGroupClient};
//!
//! let client = ScimGroupClient::from_config(&ClientConfig::default())?;
//! let auth = AuthConfig::new("example.verify.ibm.com", token);
//! let (group, url) = client.get_group(&auth, "Engineers").await?;
//! ```

pub mod config;
pub mod directory;
#[cfg(feature = "cli")]
pub mod observability;
pub mod scim;
pub mod transport;

#[cfg(test)]
mod tests;
