//! Resolution of the "current user" for mood operations.
//!
//! Handlers never trust an owner id directly; they ask the injected [`OwnerResolver`].
//! The placeholder resolver accepts whatever the caller claims, which is enough until
//! real authentication lands behind the same trait.

use axum::http::HeaderMap;

use crate::error::ApiError;

pub const OWNER_HEADER: &str = "x-owner-id";
pub const DEFAULT_OWNER_ID: &str = "testuser123";

/// Identifier of the user owning a mood entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// First candidate that is present and not blank, trimmed
pub fn first_claimed<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
}

pub trait OwnerResolver: Send + Sync {
    /// Resolve the owner for a request. `claimed` is the id supplied in the query or body.
    fn resolve(&self, headers: &HeaderMap, claimed: Option<&str>) -> Result<OwnerId, ApiError>;
}

/// Trusts the caller: claimed id, then the `X-Owner-Id` header, then the configured default.
#[derive(Debug, Clone)]
pub struct PlaceholderOwnerResolver {
    default_owner: String,
}

impl PlaceholderOwnerResolver {
    pub fn new(default_owner: impl Into<String>) -> Self {
        Self {
            default_owner: default_owner.into(),
        }
    }
}

impl Default for PlaceholderOwnerResolver {
    fn default() -> Self {
        Self::new(DEFAULT_OWNER_ID)
    }
}

impl OwnerResolver for PlaceholderOwnerResolver {
    fn resolve(&self, headers: &HeaderMap, claimed: Option<&str>) -> Result<OwnerId, ApiError> {
        let from_header = headers
            .get(OWNER_HEADER)
            .and_then(|value| value.to_str().ok());

        first_claimed([claimed, from_header, Some(self.default_owner.as_str())])
            .map(|owner| OwnerId(owner.to_string()))
            .ok_or_else(|| ApiError::validation("Owner ID cannot be empty"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_claimed_owner_wins() {
        let resolver = PlaceholderOwnerResolver::default();
        let mut headers = HeaderMap::new();
        headers.insert(OWNER_HEADER, HeaderValue::from_static("header-user"));

        let owner = resolver.resolve(&headers, Some("u1")).unwrap();
        assert_eq!(owner.as_str(), "u1");
    }

    #[test]
    fn test_header_used_when_nothing_claimed() {
        let resolver = PlaceholderOwnerResolver::default();
        let mut headers = HeaderMap::new();
        headers.insert(OWNER_HEADER, HeaderValue::from_static("header-user"));

        let owner = resolver.resolve(&headers, None).unwrap();
        assert_eq!(owner.as_str(), "header-user");
    }

    #[test]
    fn test_blank_claim_falls_back_to_default() {
        let resolver = PlaceholderOwnerResolver::default();

        let owner = resolver.resolve(&HeaderMap::new(), Some("   ")).unwrap();
        assert_eq!(owner.as_str(), DEFAULT_OWNER_ID);
    }

    #[test]
    fn test_claimed_owner_is_trimmed() {
        let resolver = PlaceholderOwnerResolver::new("fallback");

        let owner = resolver.resolve(&HeaderMap::new(), Some("  u7 ")).unwrap();
        assert_eq!(owner.to_string(), "u7");
    }

    #[test]
    fn test_first_claimed_skips_blank_candidates() {
        assert_eq!(first_claimed([None, Some(""), Some(" b ")]), Some("b"));
        assert_eq!(first_claimed([Some("a"), Some("b")]), Some("a"));
        assert_eq!(first_claimed([None, Some("  ")]), None);
    }

    #[test]
    fn test_no_owner_at_all_is_rejected() {
        let resolver = PlaceholderOwnerResolver::new("");

        let result = resolver.resolve(&HeaderMap::new(), None);
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
