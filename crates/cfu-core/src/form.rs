//! # Draft, Error Map, and Form Controller
//!
//! A form owns one [`Draft`] (raw field values) and a parallel [`ErrorMap`]
//! (one optional error per field). The [`FormController`] applies the form
//! events:
//!
//! ```text
//! on_change(field, value) ──▶ draft[field] = value, errors[field] = validate(value)
//! on_blur(field)          ──▶ errors[field] = validate(draft[field])
//! prepare_submit()        ──▶ errors = validate(draft)  ──▶ Ok(Control) | Err(ErrorMap)
//! ```
//!
//! `can_submit` is derived on every call and never stored. Two controllers
//! (create and edit) never share state; each owns its draft by value.

use serde::{Deserialize, Serialize};

use crate::control::Control;
use crate::validate::{validator_for, Field, FieldError};

/// In-progress, unsaved field values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub control_id: String,
    pub category: String,
    pub description: String,
}

impl Draft {
    /// A draft with every field empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A draft seeded from an existing record.
    pub fn from_control(control: &Control) -> Self {
        Self {
            control_id: control.control_id.clone(),
            category: control.category.clone(),
            description: control.description.clone(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::ControlId => &self.control_id,
            Field::Category => &self.category,
            Field::Description => &self.description,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::ControlId => self.control_id = value,
            Field::Category => self.category = value,
            Field::Description => self.description = value,
        }
    }

    /// Whether every field holds at least one character.
    ///
    /// Untrimmed: a field containing only spaces counts as filled here and is
    /// caught by its validator instead.
    pub fn is_filled(&self) -> bool {
        Field::ALL.iter().all(|f| !self.get(*f).is_empty())
    }

    /// The record this draft would submit. Does not validate.
    pub fn to_control(&self) -> Control {
        Control::new(
            self.control_id.clone(),
            self.category.clone(),
            self.description.clone(),
        )
    }
}

/// Per-field validation state. `None` means the field is currently valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorMap {
    control_id: Option<FieldError>,
    category: Option<FieldError>,
    description: Option<FieldError>,
}

impl ErrorMap {
    /// A map with no errors.
    pub fn clean() -> Self {
        Self::default()
    }

    /// Run every validator against `draft`.
    pub fn validate(draft: &Draft) -> Self {
        let mut map = Self::clean();
        for field in Field::ALL {
            map.revalidate(field, draft.get(field));
        }
        map
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        match field {
            Field::ControlId => self.control_id,
            Field::Category => self.category,
            Field::Description => self.description,
        }
    }

    pub fn set(&mut self, field: Field, error: Option<FieldError>) {
        match field {
            Field::ControlId => self.control_id = error,
            Field::Category => self.category = error,
            Field::Description => self.description = error,
        }
    }

    /// Recompute one field's entry from a raw value.
    pub fn revalidate(&mut self, field: Field, value: &str) {
        self.set(field, validator_for(field)(value).err());
    }

    /// The user-facing message for `field`, or `""` when it is valid.
    pub fn message(&self, field: Field) -> String {
        self.get(field).map(|e| e.to_string()).unwrap_or_default()
    }

    pub fn is_clean(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Errors present, in form order.
    pub fn errors(&self) -> impl Iterator<Item = FieldError> + '_ {
        Field::ALL.into_iter().filter_map(|f| self.get(f))
    }
}

/// Owns one form's draft and error state and applies form events to them.
#[derive(Debug, Clone, Default)]
pub struct FormController {
    draft: Draft,
    errors: ErrorMap,
}

impl FormController {
    /// An empty form (the "create new" form).
    pub fn new() -> Self {
        Self::default()
    }

    /// A form seeded from an existing record with no stale errors.
    pub fn seeded(control: &Control) -> Self {
        Self {
            draft: Draft::from_control(control),
            errors: ErrorMap::clean(),
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// Store the raw value and validate that field only.
    pub fn on_change(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value);
        self.errors.revalidate(field, self.draft.get(field));
    }

    /// Re-validate a field from its current draft value.
    pub fn on_blur(&mut self, field: Field) {
        self.errors.revalidate(field, self.draft.get(field));
    }

    /// Every field non-empty and no recorded error.
    pub fn can_submit(&self) -> bool {
        self.draft.is_filled() && self.errors.is_clean()
    }

    /// Validate the whole draft and replace the error map with the result.
    ///
    /// Returns the payload to send when every field is valid, otherwise the
    /// fresh error map. Has no side effect beyond the error map.
    pub fn prepare_submit(&mut self) -> Result<Control, ErrorMap> {
        self.errors = ErrorMap::validate(&self.draft);
        if self.errors.is_clean() {
            Ok(self.draft.to_control())
        } else {
            tracing::debug!(
                errors = self.errors.errors().count(),
                "submission refused by local validation"
            );
            Err(self.errors)
        }
    }

    /// Discard the draft and errors.
    pub fn reset(&mut self) {
        self.draft = Draft::empty();
        self.errors = ErrorMap::clean();
    }
}
