//! Domain Value Objects
//!
//! Immutable value types for the landing page domain.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Slug
// ============================================================================

pub const SLUG_MIN_LENGTH: usize = 3;
pub const SLUG_MAX_LENGTH: usize = 50;

/// Slugs that collide with application routes
pub const RESERVED_SLUGS: &[&str] = &[
    "admin", "api", "app", "assets", "blog", "dashboard", "docs", "edit", "editor", "help",
    "login", "logout", "new", "preview", "privacy", "public", "register", "settings", "signup",
    "static", "support", "terms", "www",
];

/// Why a slug was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("Slug is required")]
    Empty,

    #[error("Slug must be at least 3 characters")]
    TooShort,

    #[error("Slug must be at most 50 characters")]
    TooLong,

    #[error("Slug may only contain lowercase letters, digits and hyphens")]
    InvalidCharacters,

    #[error("Slug is reserved")]
    Reserved,
}

/// URL path segment of a published page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Validate a slug (surrounding whitespace is ignored)
    pub fn new(raw: &str) -> Result<Self, SlugError> {
        let slug = raw.trim();

        if slug.is_empty() {
            return Err(SlugError::Empty);
        }

        // Rules are ASCII-only, so byte length is the character count once
        // the character check passes; check characters first.
        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SlugError::InvalidCharacters);
        }

        if slug.len() < SLUG_MIN_LENGTH {
            return Err(SlugError::TooShort);
        }

        if slug.len() > SLUG_MAX_LENGTH {
            return Err(SlugError::TooLong);
        }

        if RESERVED_SLUGS.contains(&slug) {
            return Err(SlugError::Reserved);
        }

        Ok(Self(slug.to_string()))
    }

    /// Wrap a stored slug without re-validating
    pub fn from_db(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Page Status
// ============================================================================

/// Publication state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PageStatus {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slugs() {
        for slug in ["abc", "my-page", "promo-2026", "a-b", &"x".repeat(SLUG_MAX_LENGTH)] {
            assert_eq!(Slug::new(slug).unwrap().as_str(), slug);
        }
        assert_eq!(Slug::new("  my-page ").unwrap().as_str(), "my-page");
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(Slug::new(""), Err(SlugError::Empty));
        assert_eq!(Slug::new("ab"), Err(SlugError::TooShort));
        assert_eq!(Slug::new(&"x".repeat(SLUG_MAX_LENGTH + 1)), Err(SlugError::TooLong));
    }

    #[test]
    fn test_invalid_characters() {
        for slug in ["My-Page", "my_page", "my page", "página", "my.page", "my/page"] {
            assert_eq!(Slug::new(slug), Err(SlugError::InvalidCharacters), "{slug}");
        }
    }

    #[test]
    fn test_reserved_words() {
        for slug in RESERVED_SLUGS {
            if slug.len() >= SLUG_MIN_LENGTH {
                assert_eq!(Slug::new(slug), Err(SlugError::Reserved), "{slug}");
            }
        }
        assert!(Slug::new("admin-tools").is_ok());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_value(PageStatus::Published).unwrap(), "published");
        assert_eq!(
            serde_json::from_value::<PageStatus>(serde_json::json!("archived")).unwrap(),
            PageStatus::Archived
        );
        assert!(serde_json::from_value::<PageStatus>(serde_json::json!("deleted")).is_err());
        assert_eq!(PageStatus::default(), PageStatus::Draft);
    }
}
