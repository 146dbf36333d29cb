//! HTTP middleware for header-based pre-authentication.
//!
//! ## Layers
//!
//! - [`PreauthState`] - collaborators and configuration for the filter
//! - [`apply`] - attaches the filter to a router
//!
//! The filter never rejects a request: it opportunistically elevates the
//! request identity when a header-supplied candidate verifies, and otherwise
//! passes the request through untouched.

mod preauth;

pub use preauth::{PreauthState, apply};
