//! The pre-authentication filter.
//!
//! Per request: skip if an identity is already established, otherwise derive
//! a candidate from the headers, verify it, and on success run the rest of
//! the stack under the elevated identity. The elevation is reverted when the
//! downstream response (or failure) has been produced, so it never leaks into
//! an unrelated request.
//!
//! # Example
//!
//! ```ignore
//! use dirgate_auth::middleware::{self, PreauthState};
//!
//! let state = PreauthState::new(config, users, directory);
//! let app = middleware::apply(router, state);
//! ```

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::config::PreauthConfig;
use crate::context::SecurityContext;
use crate::extract::resolve_candidate;
use crate::storage::{DirectoryProvider, UserStore};
use crate::verify::verify_candidate;

// =============================================================================
// Filter State
// =============================================================================

/// Collaborators and configuration required by the filter.
#[derive(Clone)]
pub struct PreauthState {
    /// Compiled filter configuration (trusted header, extraction pattern).
    pub config: Arc<PreauthConfig>,

    /// Local user store for API token lookups.
    pub users: Arc<dyn UserStore>,

    /// External directory collaborator.
    pub directory: Arc<dyn DirectoryProvider>,
}

impl PreauthState {
    /// Creates the filter state.
    pub fn new(
        config: PreauthConfig,
        users: Arc<dyn UserStore>,
        directory: Arc<dyn DirectoryProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            users,
            directory,
        }
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Attaches the pre-authentication filter to a router.
pub fn apply<S>(router: Router<S>, state: PreauthState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(state, preauth_middleware))
}

async fn preauth_middleware(
    State(state): State<PreauthState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Downstream handlers observe the identity through this context; seed an
    // anonymous one when no earlier layer provided it.
    let context = match req.extensions().get::<SecurityContext>() {
        Some(context) => context.clone(),
        None => {
            let context = SecurityContext::new();
            req.extensions_mut().insert(context.clone());
            context
        }
    };

    // Precondition guard: an established identity wins over any header.
    if !context.is_anonymous() {
        return next.run(req).await;
    }

    let Some(candidate) = resolve_candidate(req.headers(), &state.config) else {
        return next.run(req).await;
    };

    match verify_candidate(&candidate, state.users.as_ref(), state.directory.as_ref()).await {
        Ok(Some(identity)) => {
            tracing::debug!(
                username = %identity.username,
                source = ?candidate.source,
                "Identity established from HTTP header"
            );
            let _elevated = context.elevate(identity);
            next.run(req).await
        }
        Ok(None) => next.run(req).await,
        Err(err) => {
            // A collaborator fault must not block the request; it only means
            // no elevation happens.
            tracing::warn!(
                username = %candidate.username,
                error = %err,
                "Pre-authentication verification failed"
            );
            next.run(req).await
        }
    }
}
