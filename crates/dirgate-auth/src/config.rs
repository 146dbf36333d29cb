//! Pre-authentication filter configuration.
//!
//! Settings are supplied by the owning realm at configuration time and are
//! read-only for the lifetime of every request. The serde-facing
//! [`PreauthSettings`] is compiled into a [`PreauthConfig`], which holds the
//! username-extraction pattern in compiled form.
//!
//! # Example (TOML)
//!
//! ```toml
//! [preauth]
//! trusted_header = "X-Forwarded-User"
//! username_pattern = '^(\w+)@'
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Raw filter settings as they arrive from the configuration file.
///
/// Both fields are optional; with neither set, the filter only honors the
/// `Authorization` header. An empty string is treated as unset, matching how
/// operators commonly blank out a field instead of removing it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PreauthSettings {
    /// Name of the trusted reverse-proxy header carrying a username.
    ///
    /// Only set this when every request is guaranteed to pass through a
    /// reverse proxy that strips the header from client input.
    pub trusted_header: Option<String>,

    /// Optional regular expression with exactly one capture group, applied to
    /// the raw trusted-header value to extract the username.
    pub username_pattern: Option<String>,
}

/// Compiled, request-ready filter configuration.
///
/// Safe for concurrent reads; never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct PreauthConfig {
    trusted_header: Option<String>,
    username_pattern: Option<Regex>,
}

impl PreauthConfig {
    /// Compiles settings into a runtime configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if `username_pattern` is present,
    /// non-empty, and not a valid regular expression. A pattern with a capture
    /// group count other than one is NOT a configuration error: the extractor
    /// falls back to the raw header value at match time.
    pub fn from_settings(settings: &PreauthSettings) -> Result<Self, AuthError> {
        let trusted_header = settings
            .trusted_header
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(ToString::to_string);

        let username_pattern = settings
            .username_pattern
            .as_deref()
            .filter(|pattern| !pattern.is_empty())
            .map(Regex::new)
            .transpose()
            .map_err(|e| {
                AuthError::configuration(format!("invalid username extraction pattern: {e}"))
            })?;

        Ok(Self {
            trusted_header,
            username_pattern,
        })
    }

    /// Name of the trusted reverse-proxy header, if configured.
    #[must_use]
    pub fn trusted_header(&self) -> Option<&str> {
        self.trusted_header.as_deref()
    }

    /// Compiled username-extraction pattern, if configured.
    #[must_use]
    pub fn username_pattern(&self) -> Option<&Regex> {
        self.username_pattern.as_ref()
    }
}
