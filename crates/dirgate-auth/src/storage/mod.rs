//! Collaborator traits for identity verification.
//!
//! This module defines the interfaces the filter consumes but does not
//! implement:
//!
//! - [`UserStore`] - the local user registry (API token lookup)
//! - [`DirectoryProvider`] - the external directory-style credential provider
//!
//! # Implementations
//!
//! Implementations are provided by the embedding server (e.g. its user
//! database and its LDAP client); the tests ship in-memory fakes.

pub mod directory;
pub mod user;

pub use directory::{DirectoryProvider, DirectoryUser};
pub use user::{ApiToken, LocalUser, UserStore};
