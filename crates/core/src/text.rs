//! Normalization of required free-text fields (titles, note content).
//!
//! Create operations reject a blank required field with a validation error;
//! update operations treat a blank one as "nothing to change".

use crate::error::CoreError;

/// Trim `value`, returning `None` when nothing but whitespace remains.
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trim a required field for a create operation.
///
/// `field` names the field in the error message, e.g. `"title"`.
pub fn require(value: &str, field: &str) -> Result<String, CoreError> {
    non_blank(value).ok_or_else(|| CoreError::Validation(format!("{field} should be present")))
}

/// Trim an optional field, mapping blank input to `None`.
pub fn optional(value: Option<&str>) -> Option<String> {
    value.and_then(non_blank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank("  To dos "), Some("To dos".to_string()));
        assert_eq!(non_blank(" \t\n"), None);
        assert_eq!(non_blank(""), None);
    }

    #[test]
    fn require_reports_field_name() {
        let err = require("   ", "title").unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: title should be present");
        assert_eq!(require(" WIP ", "title").unwrap(), "WIP");
    }

    #[test]
    fn optional_drops_blank_values() {
        assert_eq!(optional(None), None);
        assert_eq!(optional(Some("  ")), None);
        assert_eq!(optional(Some(" red ")), Some("red".to_string()));
    }
}
