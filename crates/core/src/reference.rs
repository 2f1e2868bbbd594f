//! Deserialization of nullable fields in update payloads.
//!
//! An update body distinguishes three cases for a nullable reference such as
//! a card's `project`:
//!
//! - field absent            -> `None` (keep the stored value)
//! - `null` or `""`          -> `Some(None)` (clear the reference)
//! - an id (number or digits) -> `Some(Some(id))` (point at another entity)
//!
//! Use with `#[serde(default, deserialize_with = "reference::nullable_ref")]`.
//! Plain nullable values (dates, estimates, free text) use [`nullable`] the
//! same way, where only `null` clears.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::types::DbId;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRef {
    Id(DbId),
    Text(String),
}

impl RawRef {
    fn into_id(self) -> Result<Option<DbId>, String> {
        match self {
            RawRef::Id(id) => Ok(Some(id)),
            RawRef::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    Ok(None)
                } else {
                    text.parse()
                        .map(Some)
                        .map_err(|_| format!("invalid reference id '{text}'"))
                }
            }
        }
    }
}

/// Tri-state reference used by update DTOs. See the module docs.
pub fn nullable_ref<'de, D>(deserializer: D) -> Result<Option<Option<DbId>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawRef> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(Some(None)),
        Some(raw) => raw.into_id().map(Some).map_err(D::Error::custom),
    }
}

/// Tri-state value for a nullable scalar field: absent keeps, `null` clears.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Optional reference used by create DTOs: `null`, `""` and absence all mean
/// "no reference".
pub fn optional_ref<'de, D>(deserializer: D) -> Result<Option<DbId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawRef> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(raw) => raw.into_id().map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Update {
        #[serde(default, deserialize_with = "nullable_ref")]
        project: Option<Option<DbId>>,
    }

    #[derive(Debug, Deserialize)]
    struct Create {
        #[serde(default, deserialize_with = "optional_ref")]
        project: Option<DbId>,
    }

    #[derive(Debug, Deserialize)]
    struct Estimate {
        #[serde(default, deserialize_with = "nullable")]
        hours: Option<Option<f64>>,
    }

    fn update(json: &str) -> Option<Option<DbId>> {
        serde_json::from_str::<Update>(json).unwrap().project
    }

    #[test]
    fn absent_field_keeps_reference() {
        assert_eq!(update("{}"), None);
    }

    #[test]
    fn null_and_empty_string_clear_reference() {
        assert_eq!(update(r#"{"project": null}"#), Some(None));
        assert_eq!(update(r#"{"project": ""}"#), Some(None));
        assert_eq!(update(r#"{"project": "  "}"#), Some(None));
    }

    #[test]
    fn numeric_and_string_ids_accepted() {
        assert_eq!(update(r#"{"project": 7}"#), Some(Some(7)));
        assert_eq!(update(r#"{"project": "42"}"#), Some(Some(42)));
    }

    #[test]
    fn garbage_id_rejected() {
        assert!(serde_json::from_str::<Update>(r#"{"project": "abc"}"#).is_err());
        assert!(serde_json::from_str::<Update>(r#"{"project": true}"#).is_err());
    }

    #[test]
    fn nullable_value_separates_null_from_absent() {
        let parse = |json: &str| serde_json::from_str::<Estimate>(json).unwrap().hours;
        assert_eq!(parse("{}"), None);
        assert_eq!(parse(r#"{"hours": null}"#), Some(None));
        assert_eq!(parse(r#"{"hours": 2.5}"#), Some(Some(2.5)));
        assert!(serde_json::from_str::<Estimate>(r#"{"hours": "two"}"#).is_err());
    }

    #[test]
    fn create_reference_collapses_empty_to_none() {
        let parse = |json: &str| serde_json::from_str::<Create>(json).unwrap().project;
        assert_eq!(parse("{}"), None);
        assert_eq!(parse(r#"{"project": ""}"#), None);
        assert_eq!(parse(r#"{"project": null}"#), None);
        assert_eq!(parse(r#"{"project": 3}"#), Some(3));
    }
}
