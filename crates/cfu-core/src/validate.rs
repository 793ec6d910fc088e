//! # Field Validators
//!
//! One pure function per form field. Each maps a raw input string to
//! `Ok(())` or the first failing check's [`FieldError`]. The order of checks
//! inside a validator is significant: only the first failure is reported.
//!
//! | Field | Checks, in order |
//! |-------|------------------|
//! | control id | non-empty after trim; matches `CTRL-` + 3 ASCII digits |
//! | category | non-empty after trim; exact member of [`Category::ALL`] |
//! | description | non-empty after trim; trimmed length in 10..=500; none of `< > { } [ ]` |
//!
//! The format and markup checks look at the untrimmed value. A control id
//! with surrounding spaces is therefore a format error, not a valid id.

use std::fmt;

use thiserror::Error;

use crate::control::Category;

/// Minimum description length, in UTF-16 code units, after trimming.
pub const DESCRIPTION_MIN_CHARS: usize = 10;

/// Maximum description length, in UTF-16 code units, after trimming.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

const CONTROL_ID_PREFIX: &str = "CTRL-";
const CONTROL_ID_DIGITS: usize = 3;
const FORBIDDEN_DESCRIPTION_CHARS: [char; 6] = ['<', '>', '{', '}', '[', ']'];

/// The three editable fields of a control form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    ControlId,
    Category,
    Description,
}

impl Field {
    /// All fields, in form order.
    pub const ALL: [Field; 3] = [Field::ControlId, Field::Category, Field::Description];

    /// JSON property name of the field.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::ControlId => "controlId",
            Self::Category => "category",
            Self::Description => "description",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ControlId => "Control ID",
            Self::Category => "Category",
            Self::Description => "Description",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A field-scoped validation failure. `Display` is the user-facing message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldError {
    #[error("Control ID is required")]
    ControlIdRequired,

    #[error("Format must be CTRL-XXX")]
    ControlIdFormat,

    #[error("Category is required")]
    CategoryRequired,

    #[error("Invalid category")]
    CategoryInvalid,

    #[error("Description is required")]
    DescriptionRequired,

    #[error("Description must be 10-500 characters long")]
    DescriptionLength,

    #[error("Description cannot contain HTML or script tags")]
    DescriptionMarkup,
}

impl FieldError {
    /// The field this error belongs to.
    pub fn field(&self) -> Field {
        match self {
            Self::ControlIdRequired | Self::ControlIdFormat => Field::ControlId,
            Self::CategoryRequired | Self::CategoryInvalid => Field::Category,
            Self::DescriptionRequired | Self::DescriptionLength | Self::DescriptionMarkup => {
                Field::Description
            }
        }
    }
}

/// Whether `value` is exactly `CTRL-` followed by three ASCII digits.
pub fn is_well_formed_control_id(value: &str) -> bool {
    match value.strip_prefix(CONTROL_ID_PREFIX) {
        Some(digits) => {
            digits.len() == CONTROL_ID_DIGITS && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Validate a control identifier.
pub fn validate_control_id(value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::ControlIdRequired);
    }
    if !is_well_formed_control_id(value) {
        return Err(FieldError::ControlIdFormat);
    }
    Ok(())
}

/// Validate a category value against the enumerated set.
pub fn validate_category(value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::CategoryRequired);
    }
    if value.parse::<Category>().is_err() {
        return Err(FieldError::CategoryInvalid);
    }
    Ok(())
}

/// Validate a free-text description.
///
/// Length is counted in UTF-16 code units of the trimmed text, so a
/// character outside the Basic Multilingual Plane counts as two.
pub fn validate_description(value: &str) -> Result<(), FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::DescriptionRequired);
    }
    let len = trimmed.encode_utf16().count();
    if !(DESCRIPTION_MIN_CHARS..=DESCRIPTION_MAX_CHARS).contains(&len) {
        return Err(FieldError::DescriptionLength);
    }
    if value.contains(FORBIDDEN_DESCRIPTION_CHARS) {
        return Err(FieldError::DescriptionMarkup);
    }
    Ok(())
}

/// The validator for a given field.
pub fn validator_for(field: Field) -> fn(&str) -> Result<(), FieldError> {
    match field {
        Field::ControlId => validate_control_id,
        Field::Category => validate_category,
        Field::Description => validate_description,
    }
}
