//! Local user store trait.
//!
//! Defines the interface for looking up locally registered users and their
//! API tokens. The store is read-only from the filter's point of view: a
//! lookup must never create a user record as a side effect.

use async_trait::async_trait;

use crate::AuthResult;

// =============================================================================
// User Store Trait
// =============================================================================

/// Read-only lookup of locally registered users.
///
/// # Example
///
/// ```ignore
/// use dirgate_auth::storage::UserStore;
///
/// async fn example(store: &impl UserStore) {
///     if let Some(user) = store.find_user("alice").await? {
///         println!("found {}", user.username);
///     }
/// }
/// ```
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by username.
    ///
    /// Returns `None` if no user with that name exists. Implementations must
    /// not create a record on miss.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_user(&self, username: &str) -> AuthResult<Option<LocalUser>>;
}

// =============================================================================
// Records
// =============================================================================

/// A locally registered user record.
#[derive(Debug, Clone)]
pub struct LocalUser {
    /// The username the record is registered under.
    pub username: String,

    /// The user's API token, if one has been issued.
    pub api_token: Option<ApiToken>,
}

impl LocalUser {
    /// Creates a user record.
    pub fn new(username: impl Into<String>, api_token: Option<ApiToken>) -> Self {
        Self {
            username: username.into(),
            api_token,
        }
    }
}

/// An issued API token.
///
/// The secret is kept private to the type; the only operation is an exact
/// comparison against a password supplied over Basic auth.
#[derive(Clone)]
pub struct ApiToken {
    secret: String,
}

impl ApiToken {
    /// Creates a token from its secret value.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Returns `true` if `password` is exactly the token secret.
    #[must_use]
    pub fn matches(&self, password: &str) -> bool {
        self.secret == password
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret.
        f.debug_struct("ApiToken").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_matches_exactly() {
        let token = ApiToken::new("secret");
        assert!(token.matches("secret"));
        assert!(!token.matches("Secret"));
        assert!(!token.matches("secret "));
    }

    #[test]
    fn test_token_debug_hides_secret() {
        let token = ApiToken::new("hunter2");
        assert!(!format!("{token:?}").contains("hunter2"));
    }
}
