//! # cfu-core: Foundational Types for Control Framework Upload
//!
//! Defines the compliance-control record, the enumerated category set, the
//! three field validators, and the per-form draft/error state that every
//! other crate in the workspace builds on. Depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Validators are pure.** `validate_control_id`, `validate_category` and
//!    `validate_description` take a raw string and return `Ok(())` or the
//!    first failing [`FieldError`]. No I/O, no state.
//!
//! 2. **One `Category` enum.** The three-value category set is defined once;
//!    adding a category forces every `match` to handle it.
//!
//! 3. **Errors are per field.** [`ErrorMap`] holds at most one error per
//!    [`Field`]. Presentation reads `message(field)`, which is `""` for a
//!    valid field.
//!
//! 4. **Submission gates on fresh validation.** [`FormController::prepare_submit`]
//!    re-runs every validator against the full draft instead of trusting the
//!    live error map.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cfu-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod control;
pub mod form;
pub mod validate;

// Re-export primary types for ergonomic imports.
pub use control::{Category, Control, ParseCategoryError};
pub use form::{Draft, ErrorMap, FormController};
pub use validate::{
    is_well_formed_control_id, validate_category, validate_control_id, validate_description,
    validator_for, Field, FieldError, DESCRIPTION_MAX_CHARS, DESCRIPTION_MIN_CHARS,
};
