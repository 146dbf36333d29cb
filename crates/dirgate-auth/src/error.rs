//! Authentication error types.
//!
//! This module defines all error types that can occur while resolving and
//! verifying a header-supplied identity.

/// Errors that can occur during identity resolution and verification.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No user with the given name is known to the collaborator.
    ///
    /// This is an expected verification outcome, not a system fault: the
    /// request simply proceeds unauthenticated.
    #[error("User not found: {username}")]
    UserNotFound {
        /// The username that could not be resolved.
        username: String,
    },

    /// The supplied password was rejected by the directory.
    ///
    /// Like [`AuthError::UserNotFound`], an expected verification outcome.
    #[error("Invalid credentials for user: {username}")]
    InvalidCredentials {
        /// The username whose credentials were rejected.
        username: String,
    },

    /// The directory collaborator failed for a reason other than a rejected
    /// identity (connection loss, protocol fault, ...).
    #[error("Directory error: {message}")]
    Directory {
        /// Description of the directory failure.
        message: String,
    },

    /// An error occurred while reading from the local user store.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The filter configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `UserNotFound` error.
    #[must_use]
    pub fn user_not_found(username: impl Into<String>) -> Self {
        Self::UserNotFound {
            username: username.into(),
        }
    }

    /// Creates a new `InvalidCredentials` error.
    #[must_use]
    pub fn invalid_credentials(username: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            username: username.into(),
        }
    }

    /// Creates a new `Directory` error.
    #[must_use]
    pub fn directory(message: impl Into<String>) -> Self {
        Self::Directory {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` for failure modes that are an expected outcome of
    /// verifying an unproven identity (unknown user, rejected password).
    ///
    /// Expected failures are logged at debug level and the request proceeds
    /// unauthenticated; anything else indicates a collaborator fault.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound { .. } | Self::InvalidCredentials { .. }
        )
    }
}
