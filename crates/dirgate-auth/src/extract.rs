//! Identity extraction from request headers.
//!
//! Two independent strategies are tried in a fixed order; the first one to
//! produce a candidate wins:
//!
//! 1. `Authorization: Basic <credentials>` - username and password
//! 2. the configured trusted reverse-proxy header - username only
//!
//! Extraction alone never authenticates: a [`Candidate`] is an unproven
//! claim until the verifier accepts it.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use base64::{Engine, engine::general_purpose::STANDARD};
use regex::Regex;

use crate::config::PreauthConfig;

// =============================================================================
// Candidate
// =============================================================================

/// Which strategy produced a candidate. Verification is dispatched on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// The `Authorization: Basic ...` header.
    ApiHeader,

    /// The configured trusted reverse-proxy header.
    ProxyHeader,
}

/// An unverified identity extracted from a request header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The claimed username.
    pub username: String,

    /// The accompanying secret; present only for [`CandidateSource::ApiHeader`].
    pub password: Option<String>,

    /// The strategy that produced this candidate.
    pub source: CandidateSource,
}

// =============================================================================
// Extraction
// =============================================================================

/// Derives a candidate identity from the request headers, or `None` if
/// neither strategy applies.
#[must_use]
pub fn resolve_candidate(headers: &HeaderMap, config: &PreauthConfig) -> Option<Candidate> {
    let strategies: [&dyn Fn() -> Option<Candidate>; 2] = [
        &|| from_authorization_header(headers),
        &|| from_proxy_header(headers, config),
    ];

    strategies.iter().find_map(|strategy| strategy())
}

/// Strategy 1: `Authorization` header with Basic credentials.
///
/// The scheme comparison is case-insensitive per RFC 7617. Anything that does
/// not decode into `username:password` is an expected non-match, not an
/// error.
fn from_authorization_header(headers: &HeaderMap) -> Option<Candidate> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = strip_basic_scheme(value)?;

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;

    // Split on the first colon only; the password may itself contain colons.
    let (username, password) = credentials.split_once(':')?;

    Some(Candidate {
        username: username.to_string(),
        password: Some(password.to_string()),
        source: CandidateSource::ApiHeader,
    })
}

fn strip_basic_scheme(value: &str) -> Option<&str> {
    let (scheme, rest) = value.split_at_checked(6)?;
    scheme.eq_ignore_ascii_case("basic ").then_some(rest)
}

/// Strategy 2: the trusted reverse-proxy header.
///
/// Only consulted when the Authorization strategy produced nothing. The
/// header is trusted because it arrives from a reverse proxy that has already
/// authenticated the caller; no password accompanies it.
fn from_proxy_header(headers: &HeaderMap, config: &PreauthConfig) -> Option<Candidate> {
    let header_name = config.trusted_header()?;
    let raw = headers.get(header_name)?.to_str().ok()?;

    let username = match config.username_pattern() {
        Some(pattern) => extract_username(pattern, raw),
        None => raw.to_string(),
    };

    tracing::debug!(header = header_name, username = %username, "User from HTTP header");

    Some(Candidate {
        username,
        password: None,
        source: CandidateSource::ProxyHeader,
    })
}

/// Applies the extraction pattern to the raw header value.
///
/// The pattern only applies when it has exactly one capture group, it
/// matches, and the group participates in the match; in every other case the
/// raw value is used verbatim. A structurally unusable pattern is never an
/// error.
fn extract_username(pattern: &Regex, raw: &str) -> String {
    // captures_len counts the implicit whole-match group 0.
    if pattern.captures_len() == 2
        && let Some(captures) = pattern.captures(raw)
        && let Some(group) = captures.get(1)
    {
        return group.as_str().to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PreauthSettings;
    use axum::http::HeaderValue;

    fn basic_header(credentials: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = format!("Basic {}", STANDARD.encode(credentials));
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
        headers
    }

    fn proxy_config(header: &str, pattern: Option<&str>) -> PreauthConfig {
        PreauthConfig::from_settings(&PreauthSettings {
            trusted_header: Some(header.to_string()),
            username_pattern: pattern.map(ToString::to_string),
        })
        .unwrap()
    }

    #[test]
    fn test_basic_credentials() {
        let candidate =
            resolve_candidate(&basic_header("alice:secret"), &PreauthConfig::default()).unwrap();

        assert_eq!(candidate.username, "alice");
        assert_eq!(candidate.password.as_deref(), Some("secret"));
        assert_eq!(candidate.source, CandidateSource::ApiHeader);
    }

    #[test]
    fn test_password_may_contain_colons() {
        let candidate =
            resolve_candidate(&basic_header("alice:se:cr:et"), &PreauthConfig::default()).unwrap();

        assert_eq!(candidate.username, "alice");
        assert_eq!(candidate.password.as_deref(), Some("se:cr:et"));
    }

    #[test]
    fn test_basic_scheme_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        let value = format!("bAsIc {}", STANDARD.encode("alice:secret"));
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&value).unwrap());

        let candidate = resolve_candidate(&headers, &PreauthConfig::default()).unwrap();
        assert_eq!(candidate.username, "alice");
    }

    #[test]
    fn test_missing_colon_is_no_match() {
        let headers = basic_header("no-colon-here");
        assert!(resolve_candidate(&headers, &PreauthConfig::default()).is_none());
    }

    #[test]
    fn test_invalid_base64_is_no_match() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic !!!"));
        assert!(resolve_candidate(&headers, &PreauthConfig::default()).is_none());
    }

    #[test]
    fn test_non_basic_scheme_is_no_match() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer token"));
        assert!(resolve_candidate(&headers, &PreauthConfig::default()).is_none());
    }

    #[test]
    fn test_proxy_header_verbatim_without_pattern() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-User", HeaderValue::from_static("bob@EXAMPLE"));

        let candidate =
            resolve_candidate(&headers, &proxy_config("X-Forwarded-User", None)).unwrap();

        assert_eq!(candidate.username, "bob@EXAMPLE");
        assert_eq!(candidate.password, None);
        assert_eq!(candidate.source, CandidateSource::ProxyHeader);
    }

    #[test]
    fn test_proxy_header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-user", HeaderValue::from_static("bob"));

        let candidate =
            resolve_candidate(&headers, &proxy_config("X-Forwarded-User", None)).unwrap();
        assert_eq!(candidate.username, "bob");
    }

    #[test]
    fn test_pattern_with_one_group_extracts() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-User", HeaderValue::from_static("bob@EXAMPLE"));

        let candidate = resolve_candidate(
            &headers,
            &proxy_config("X-Forwarded-User", Some(r"^(\w+)@")),
        )
        .unwrap();

        assert_eq!(candidate.username, "bob");
    }

    #[test]
    fn test_pattern_with_two_groups_falls_back_to_raw() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-User", HeaderValue::from_static("bob@EXAMPLE"));

        let candidate = resolve_candidate(
            &headers,
            &proxy_config("X-Forwarded-User", Some(r"^(\w+)@(\w+)")),
        )
        .unwrap();

        assert_eq!(candidate.username, "bob@EXAMPLE");
    }

    #[test]
    fn test_pattern_with_zero_groups_falls_back_to_raw() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-User", HeaderValue::from_static("bob@EXAMPLE"));

        let candidate = resolve_candidate(
            &headers,
            &proxy_config("X-Forwarded-User", Some(r"^\w+@")),
        )
        .unwrap();

        assert_eq!(candidate.username, "bob@EXAMPLE");
    }

    #[test]
    fn test_non_participating_group_falls_back_to_raw() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-User", HeaderValue::from_static("@EXAMPLE"));

        // The optional group matches nothing, so the pattern does not apply.
        let candidate = resolve_candidate(
            &headers,
            &proxy_config("X-Forwarded-User", Some(r"^(\w+)?@")),
        )
        .unwrap();

        assert_eq!(candidate.username, "@EXAMPLE");
    }

    #[test]
    fn test_non_matching_pattern_falls_back_to_raw() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-User", HeaderValue::from_static("bob"));

        let candidate = resolve_candidate(
            &headers,
            &proxy_config("X-Forwarded-User", Some(r"^(\w+)@")),
        )
        .unwrap();

        assert_eq!(candidate.username, "bob");
    }

    #[test]
    fn test_authorization_takes_precedence_over_proxy_header() {
        let mut headers = basic_header("alice:secret");
        headers.insert("X-Forwarded-User", HeaderValue::from_static("bob"));

        let candidate =
            resolve_candidate(&headers, &proxy_config("X-Forwarded-User", None)).unwrap();

        assert_eq!(candidate.username, "alice");
        assert_eq!(candidate.source, CandidateSource::ApiHeader);
    }

    #[test]
    fn test_no_headers_no_candidate() {
        let headers = HeaderMap::new();
        assert!(resolve_candidate(&headers, &proxy_config("X-Forwarded-User", None)).is_none());
        assert!(resolve_candidate(&headers, &PreauthConfig::default()).is_none());
    }
}
