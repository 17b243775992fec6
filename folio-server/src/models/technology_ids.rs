//! Technology id sets attached to projects

use serde::Deserialize;

use super::ValidationError;

/// Deduplicated, sorted set of technology ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<i32>")]
pub struct TechnologyIds(Vec<i32>);

impl TechnologyIds {
    /// Normalize a list of ids. Duplicates collapse, ids must be positive.
    pub fn new(mut ids: Vec<i32>) -> Result<Self, ValidationError> {
        if let Some(bad) = ids.iter().find(|id| **id <= 0) {
            return Err(ValidationError::InvalidVariant {
                field: "technologyIds",
                value: bad.to_string(),
            });
        }
        ids.sort_unstable();
        ids.dedup();
        Ok(Self(ids))
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<i32>> for TechnologyIds {
    type Error = ValidationError;

    fn try_from(ids: Vec<i32>) -> Result<Self, Self::Error> {
        Self::new(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedups_and_sorts() {
        let ids = TechnologyIds::new(vec![3, 2, 3, 1]).unwrap();
        assert_eq!(ids.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn rejects_non_positive() {
        assert!(TechnologyIds::new(vec![1, 0]).is_err());
        assert!(TechnologyIds::new(vec![-4]).is_err());
    }

    #[test]
    fn deserializes_from_json_array() {
        let ids: TechnologyIds = serde_json::from_str("[2, 3, 2]").unwrap();
        assert_eq!(ids.as_slice(), &[2, 3]);
    }
}
