//! Required text fields

use super::ValidationError;

/// Validated non-blank text for a named field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredText(String);

impl RequiredText {
    /// Accept `value` if it is present and not blank.
    ///
    /// Surrounding whitespace is trimmed; `field` names the requirement in
    /// the error so clients can tell which input was missing.
    ///
    /// # Example
    /// ```
    /// use folio_server::models::RequiredText;
    ///
    /// assert!(RequiredText::new("title", Some("Portfolio")).is_ok());
    /// assert!(RequiredText::new("title", Some("   ")).is_err());
    /// assert!(RequiredText::new("title", None).is_err());
    /// ```
    pub fn new(field: &'static str, value: Option<&str>) -> Result<Self, ValidationError> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Ok(Self(v.to_owned())),
            _ => Err(ValidationError::Required { field }),
        }
    }

    /// Like [`RequiredText::new`] but absence is fine.
    pub fn optional(
        field: &'static str,
        value: Option<&str>,
    ) -> Result<Option<Self>, ValidationError> {
        value.map(|v| Self::new(field, Some(v))).transpose()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RequiredText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
