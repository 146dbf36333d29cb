//! Identity types shared across the filter.

use serde::{Deserialize, Serialize};

// =============================================================================
// Authority
// =============================================================================

/// A granted authority (role) attached to a verified identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Authority(String);

impl Authority {
    /// The built-in authority every verified principal carries.
    pub const AUTHENTICATED: &'static str = "authenticated";

    /// Creates an authority from a role name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The built-in `authenticated` authority.
    #[must_use]
    pub fn authenticated() -> Self {
        Self(Self::AUTHENTICATED.to_string())
    }

    /// The role name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Authority {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

// =============================================================================
// Verified Identity
// =============================================================================

/// A username plus its granted authorities, trusted only after passing one of
/// the two verification paths.
///
/// Scoped to a single request: the identity is established via
/// [`SecurityContext::elevate`](crate::context::SecurityContext::elevate) and
/// reverted when the request finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// The verified username.
    pub username: String,

    /// Authorities granted to the user, in the order the verifier produced
    /// them.
    pub authorities: Vec<Authority>,
}

impl VerifiedIdentity {
    /// Creates a verified identity.
    pub fn new(username: impl Into<String>, authorities: Vec<Authority>) -> Self {
        Self {
            username: username.into(),
            authorities,
        }
    }

    /// Returns `true` if the identity carries the given authority.
    #[must_use]
    pub fn has_authority(&self, name: &str) -> bool {
        self.authorities.iter().any(|a| a.name() == name)
    }
}
