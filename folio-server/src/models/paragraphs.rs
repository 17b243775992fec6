//! About-page paragraphs

use super::ValidationError;

/// Ordered, non-empty list of paragraphs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraphs(Vec<String>);

impl Paragraphs {
    /// Blank entries are dropped, the rest are kept exactly as given; at
    /// least one paragraph must remain.
    pub fn new(items: Option<Vec<String>>) -> Result<Self, ValidationError> {
        let items: Vec<String> = items
            .unwrap_or_default()
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect();

        if items.is_empty() {
            return Err(ValidationError::Required { field: "paragraphs" });
        }
        Ok(Self(items))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
