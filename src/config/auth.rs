use std::fmt;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Tenant host and bearer token for the directory API.
///
/// The token is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Tenant hostname, optionally with a port (e.g. `example.verify.ibm.com`).
    pub tenant: String,

    /// OAuth bearer token sent in the `Authorization` header.
    pub token: String,
}

impl AuthConfig {
    pub fn new(tenant: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            token: token.into(),
        }
    }

    /// Value of the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.tenant.trim().is_empty() {
            return Err(ConfigError::Validation("auth.tenant must not be empty".into()));
        }
        if self.tenant.contains("://") || self.tenant.contains('/') {
            return Err(ConfigError::Validation(format!(
                "auth.tenant must be a bare host name without scheme or path, got '{}'",
                self.tenant
            )));
        }
        if self.token.trim().is_empty() {
            return Err(ConfigError::Validation("auth.token must not be empty".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("tenant", &self.tenant)
            .field("token", &"<redacted>")
            .finish()
    }
}
