//! Directory provider trait.
//!
//! Defines the interface to the external directory-style credential provider
//! (an LDAP-like service). The filter consumes two operations: verifying a
//! username/password pair, and looking up a user on behalf of a trusted
//! reverse proxy. The protocol itself is the implementation's concern.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::Authority;

// =============================================================================
// Directory Provider Trait
// =============================================================================

/// The external directory collaborator.
///
/// Both operations are synchronous from the caller's perspective: the request
/// task awaits the result. Timeouts and cancellation are the implementation's
/// responsibility.
#[async_trait]
pub trait DirectoryProvider: Send + Sync {
    /// Verify a username/password pair and retrieve the user's record.
    ///
    /// # Errors
    ///
    /// - [`AuthError::UserNotFound`](crate::AuthError::UserNotFound) if the
    ///   directory has no such user
    /// - [`AuthError::InvalidCredentials`](crate::AuthError::InvalidCredentials)
    ///   if the password is rejected
    /// - [`AuthError::Directory`](crate::AuthError::Directory) for provider
    ///   faults
    async fn retrieve_and_verify(&self, username: &str, password: &str)
    -> AuthResult<DirectoryUser>;

    /// Look up a user by name without a credential check.
    ///
    /// Only called for identities asserted by the trusted reverse proxy,
    /// which has already authenticated the caller.
    ///
    /// # Errors
    ///
    /// - [`AuthError::UserNotFound`](crate::AuthError::UserNotFound) if the
    ///   directory has no such user
    /// - [`AuthError::Directory`](crate::AuthError::Directory) for provider
    ///   faults
    async fn load_by_username(&self, username: &str) -> AuthResult<DirectoryUser>;
}

// =============================================================================
// Records
// =============================================================================

/// A user record as returned by the directory.
#[derive(Debug, Clone)]
pub struct DirectoryUser {
    /// The canonical username in the directory.
    pub username: String,

    /// Authorities granted by the directory, in directory order.
    pub authorities: Vec<Authority>,
}

impl DirectoryUser {
    /// Creates a directory user record.
    pub fn new(username: impl Into<String>, authorities: Vec<Authority>) -> Self {
        Self {
            username: username.into(),
            authorities,
        }
    }
}
