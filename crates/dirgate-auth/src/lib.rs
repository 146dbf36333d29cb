//! # dirgate-auth
//!
//! Header-based pre-authentication for the Dirgate server.
//!
//! This crate resolves a request-time identity for requests that arrive
//! without an established session: it derives a candidate username from HTTP
//! headers, verifies it against a locally stored API token or an external
//! directory-style credential provider, and establishes the verified identity
//! for the duration of request processing. Verification failure is silent;
//! the filter never blocks a request.
//!
//! ## Overview
//!
//! Two header strategies are tried in order: `Authorization: Basic ...`
//! (username and password), then a configurable trusted reverse-proxy header
//! (username only, trust delegated to the proxy). Which strategy matched
//! selects the verification path; identity is only ever established after
//! verification succeeds.
//!
//! ## Modules
//!
//! - [`config`] - filter settings and compiled configuration
//! - [`context`] - ambient security context with scoped elevation
//! - [`extract`] - candidate extraction from request headers
//! - [`verify`] - candidate verification against the collaborators
//! - [`middleware`] - the axum filter tying the pieces together
//! - [`storage`] - collaborator traits (local user store, directory provider)

pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod storage;
pub mod types;
pub mod verify;

pub use config::{PreauthConfig, PreauthSettings};
pub use context::{Identity, ScopedIdentity, SecurityContext};
pub use error::AuthError;
pub use extract::{Candidate, CandidateSource, resolve_candidate};
pub use middleware::{PreauthState, apply};
pub use storage::{ApiToken, DirectoryProvider, DirectoryUser, LocalUser, UserStore};
pub use types::{Authority, VerifiedIdentity};
pub use verify::verify_candidate;

/// Type alias for authentication results.
pub type AuthResult<T> = Result<T, AuthError>;
