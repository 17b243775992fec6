//! Serde helpers for partial updates

use serde::{Deserialize, Deserializer};

/// Distinguish an absent field from an explicit `null`.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on an
/// `Option<Option<T>>`: absent -> `None`, `null` -> `Some(None)`,
/// value -> `Some(Some(v))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        category_id: Option<Option<i32>>,
    }

    #[test]
    fn absent_null_and_value() {
        let p: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(p.category_id, None);

        let p: Patch = serde_json::from_str(r#"{"category_id": null}"#).unwrap();
        assert_eq!(p.category_id, Some(None));

        let p: Patch = serde_json::from_str(r#"{"category_id": 4}"#).unwrap();
        assert_eq!(p.category_id, Some(Some(4)));
    }
}
