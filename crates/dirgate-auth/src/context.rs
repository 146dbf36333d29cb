//! Ambient authentication context.
//!
//! The [`SecurityContext`] is the per-request slot holding the identity that
//! downstream handlers observe. It travels in the request extensions rather
//! than in a process-wide global, so the filter stays testable without
//! process-wide fixtures.
//!
//! Elevation is a scoped acquisition: [`SecurityContext::elevate`] returns a
//! [`ScopedIdentity`] guard that restores the prior identity when dropped, on
//! every exit path — normal completion, propagated error, or unwind.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::types::VerifiedIdentity;

// =============================================================================
// Identity
// =============================================================================

/// The identity currently active for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// No verified identity; the request is processed anonymously.
    Anonymous,

    /// A verified identity established for the remainder of the request.
    Authenticated(VerifiedIdentity),
}

impl Identity {
    /// Returns `true` if no identity has been established.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// The username, if an identity is established.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(&identity.username),
        }
    }
}

// =============================================================================
// Security Context
// =============================================================================

/// Request-scoped holder of the active [`Identity`].
///
/// Cloning is cheap and all clones share the same slot, so a handle stored in
/// the request extensions and a handle held by the elevation guard observe
/// the same identity. The slot is lock-free; reverting from a panicking
/// downstream handler cannot poison it.
#[derive(Debug, Clone)]
pub struct SecurityContext {
    slot: Arc<ArcSwap<Identity>>,
}

impl SecurityContext {
    /// Creates an anonymous context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Arc::new(ArcSwap::from_pointee(Identity::Anonymous)),
        }
    }

    /// Creates a context with an identity already established, as a session
    /// layer upstream of the filter would.
    #[must_use]
    pub fn authenticated(identity: VerifiedIdentity) -> Self {
        Self {
            slot: Arc::new(ArcSwap::from_pointee(Identity::Authenticated(identity))),
        }
    }

    /// The currently active identity.
    #[must_use]
    pub fn current(&self) -> Identity {
        (**self.slot.load()).clone()
    }

    /// Returns `true` if no identity is currently established.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.slot.load().is_anonymous()
    }

    /// Establishes `identity` as the active identity until the returned guard
    /// is dropped, at which point the prior identity is restored.
    #[must_use = "the identity is reverted as soon as the guard is dropped"]
    pub fn elevate(&self, identity: VerifiedIdentity) -> ScopedIdentity {
        let previous = self.slot.swap(Arc::new(Identity::Authenticated(identity)));
        ScopedIdentity {
            context: self.clone(),
            previous,
        }
    }
}

impl Default for SecurityContext {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Scoped Identity Guard
// =============================================================================

/// Guard returned by [`SecurityContext::elevate`].
///
/// Restores the pre-elevation identity on drop, including during unwinding.
#[derive(Debug)]
pub struct ScopedIdentity {
    context: SecurityContext,
    previous: Arc<Identity>,
}

impl Drop for ScopedIdentity {
    fn drop(&mut self) {
        self.context.slot.store(Arc::clone(&self.previous));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Authority, VerifiedIdentity};

    fn identity(username: &str) -> VerifiedIdentity {
        VerifiedIdentity::new(username, vec![Authority::authenticated()])
    }

    #[test]
    fn test_new_context_is_anonymous() {
        let context = SecurityContext::new();
        assert!(context.is_anonymous());
        assert_eq!(context.current(), Identity::Anonymous);
    }

    #[test]
    fn test_elevate_and_revert() {
        let context = SecurityContext::new();

        {
            let _guard = context.elevate(identity("alice"));
            assert_eq!(context.current().username(), Some("alice"));

            // Clones share the same slot.
            assert_eq!(context.clone().current().username(), Some("alice"));
        }

        assert!(context.is_anonymous());
    }

    #[test]
    fn test_nested_elevation_restores_in_order() {
        let context = SecurityContext::new();

        let outer = context.elevate(identity("alice"));
        {
            let _inner = context.elevate(identity("bob"));
            assert_eq!(context.current().username(), Some("bob"));
        }
        assert_eq!(context.current().username(), Some("alice"));

        drop(outer);
        assert!(context.is_anonymous());
    }

    #[test]
    fn test_revert_on_unwind() {
        let context = SecurityContext::new();
        let elevated = context.clone();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = elevated.elevate(identity("alice"));
            panic!("downstream handler failed");
        }));

        assert!(result.is_err());
        assert!(context.is_anonymous());
    }

    #[test]
    fn test_preexisting_identity() {
        let context = SecurityContext::authenticated(identity("carol"));
        assert!(!context.is_anonymous());
        assert_eq!(context.current().username(), Some("carol"));
    }
}
