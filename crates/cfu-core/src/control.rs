//! # Control Record and Category Set
//!
//! The persisted entity of the system. A [`Control`] is addressed by its
//! `control_id` for update and delete; the wire shape is camelCase JSON
//! (`controlId`, `category`, `description`).
//!
//! Fields are plain strings: the server may hand back anything it stored, and
//! drafts are allowed to be invalid while the user types. Validity is a
//! property checked by [`crate::validate`], not encoded in the type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed set of control categories.
///
/// Serialized as the human-readable display string, which is also the value
/// the server stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Access Control")]
    AccessControl,
    #[serde(rename = "Data Protection")]
    DataProtection,
    #[serde(rename = "Monitoring")]
    Monitoring,
}

impl Category {
    /// All categories, in select-box order.
    pub const ALL: [Category; 3] = [
        Category::AccessControl,
        Category::DataProtection,
        Category::Monitoring,
    ];

    /// The display string, identical to the stored value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessControl => "Access Control",
            Self::DataProtection => "Data Protection",
            Self::Monitoring => "Monitoring",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the three category values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0:?}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Exact, case-sensitive match. Surrounding whitespace is not stripped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// A compliance-control record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    /// Natural key, `CTRL-` followed by three digits.
    pub control_id: String,
    /// One of the [`Category`] display strings.
    pub category: String,
    /// Free text, 10 to 500 characters after trimming.
    pub description: String,
}

impl Control {
    pub fn new(
        control_id: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            control_id: control_id.into(),
            category: category.into(),
            description: description.into(),
        }
    }

    /// The parsed category, if the stored value is a known one.
    pub fn category(&self) -> Option<Category> {
        self.category.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_display() {
        for c in Category::ALL {
            assert_eq!(c.to_string().parse::<Category>().unwrap(), c);
        }
    }

    #[test]
    fn category_parse_is_case_sensitive() {
        assert!("monitoring".parse::<Category>().is_err());
        assert!("Monitoring ".parse::<Category>().is_err());
        assert!("Access control".parse::<Category>().is_err());
    }

    #[test]
    fn category_serializes_as_display_string() {
        let json = serde_json::to_string(&Category::DataProtection).unwrap();
        assert_eq!(json, "\"Data Protection\"");
    }

    #[test]
    fn control_uses_camel_case_wire_names() {
        let c = Control::new("CTRL-001", "Monitoring", "Quarterly log review");
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["controlId"], "CTRL-001");
        assert_eq!(v["category"], "Monitoring");
        assert_eq!(v["description"], "Quarterly log review");
    }

    #[test]
    fn control_ignores_unknown_fields_from_server() {
        let c: Control = serde_json::from_value(serde_json::json!({
            "controlId": "CTRL-002",
            "category": "Access Control",
            "description": "Enforce MFA for admins",
            "createdAt": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(c.control_id, "CTRL-002");
        assert_eq!(c.category(), Some(Category::AccessControl));
    }

    #[test]
    fn unknown_stored_category_parses_to_none() {
        let c = Control::new("CTRL-003", "Physical", "Badge readers on doors");
        assert_eq!(c.category(), None);
    }
}
