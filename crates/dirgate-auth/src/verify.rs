//! Candidate verification.
//!
//! Confirms an extracted [`Candidate`] against one of two mutually exclusive
//! paths, selected by the strategy that produced it:
//!
//! - `ApiHeader`: local API token first, then the directory's
//!   username/password verification
//! - `ProxyHeader`: directory lookup by name only; trust in the asserted
//!   username is delegated to the reverse proxy
//!
//! Expected failures (unknown user, rejected credentials) resolve to
//! `Ok(None)` and are logged at debug level; collaborator faults propagate.
//! One verification attempt per request, no retries.

use crate::AuthResult;
use crate::extract::{Candidate, CandidateSource};
use crate::storage::{DirectoryProvider, DirectoryUser, UserStore};
use crate::types::{Authority, VerifiedIdentity};

/// Verifies a candidate, returning the identity to establish on success and
/// `None` when the candidate should be silently discarded.
pub async fn verify_candidate(
    candidate: &Candidate,
    users: &dyn UserStore,
    directory: &dyn DirectoryProvider,
) -> AuthResult<Option<VerifiedIdentity>> {
    match candidate.source {
        CandidateSource::ApiHeader => {
            // An ApiHeader candidate always carries a password.
            let Some(password) = candidate.password.as_deref() else {
                return Ok(None);
            };
            verify_api_credentials(&candidate.username, password, users, directory).await
        }
        CandidateSource::ProxyHeader => {
            verify_proxy_assertion(&candidate.username, directory).await
        }
    }
}

/// The `ApiHeader` path: API token match, else directory credential check.
async fn verify_api_credentials(
    username: &str,
    password: &str,
    users: &dyn UserStore,
    directory: &dyn DirectoryProvider,
) -> AuthResult<Option<VerifiedIdentity>> {
    // The lookup must not create a record on miss.
    let Some(user) = users.find_user(username).await? else {
        tracing::debug!(username = %username, "No local user for Basic credentials");
        return Ok(None);
    };

    if let Some(token) = &user.api_token
        && token.matches(password)
    {
        tracing::debug!(username = %username, "Authenticated via API token");
        return Ok(Some(verified(user.username, Vec::new())));
    }

    match directory.retrieve_and_verify(username, password).await {
        Ok(directory_user) => {
            tracing::debug!(username = %username, "Authenticated against directory");
            Ok(Some(verified(
                username.to_string(),
                directory_user.authorities,
            )))
        }
        Err(err) if err.is_expected() => {
            tracing::debug!(username = %username, error = %err, "Directory rejected credentials");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// The `ProxyHeader` path: lookup by name, no credential check.
async fn verify_proxy_assertion(
    username: &str,
    directory: &dyn DirectoryProvider,
) -> AuthResult<Option<VerifiedIdentity>> {
    match directory.load_by_username(username).await {
        Ok(DirectoryUser { authorities, .. }) => {
            Ok(Some(verified(username.to_string(), authorities)))
        }
        Err(err) if err.is_expected() => {
            tracing::debug!(username = %username, "User from HTTP header not found in directory");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Builds the identity to establish, ensuring the built-in `authenticated`
/// authority is present.
fn verified(username: String, mut authorities: Vec<Authority>) -> VerifiedIdentity {
    if !authorities
        .iter()
        .any(|a| a.name() == Authority::AUTHENTICATED)
    {
        authorities.insert(0, Authority::authenticated());
    }
    VerifiedIdentity::new(username, authorities)
}
