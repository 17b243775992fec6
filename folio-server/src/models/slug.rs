//! Slug validation for categories and technologies
//!
//! Slug format: lowercase alphanumeric words joined by single hyphens

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for slugs
const MAX_SLUG_LEN: usize = 64;

/// Matches DB usage in URLs: `react`, `api-integration`, `web-3d`
static SLUG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("invalid slug regex")
});

/// Validated slug
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Create a new slug, validating format.
    ///
    /// # Rules
    /// - Max 64 characters
    /// - Lowercase alphanumeric separated by single hyphens
    ///
    /// # Example
    /// ```
    /// use folio_server::models::Slug;
    ///
    /// assert!(Slug::new("api-integration").is_ok());
    /// assert!(Slug::new("Bot").is_err());  // uppercase
    /// assert!(Slug::new("-bot").is_err());  // starts with dash
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();

        if s.is_empty() {
            return Err(ValidationError::Required { field: "slug" });
        }

        if s.len() > MAX_SLUG_LEN {
            return Err(ValidationError::TooLong {
                field: "slug",
                max: MAX_SLUG_LEN,
            });
        }

        if !SLUG_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "slug",
                reason: "must be lowercase alphanumeric words separated by hyphens",
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Validate an optional slug, treating absence as a missing field.
    pub fn required(s: Option<&str>) -> Result<Self, ValidationError> {
        Self::new(s.unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
