//! # Output Rendering
//!
//! Table output for people, JSON and YAML for scripts. Writers are passed
//! in so handlers can be tested against a buffer.

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use cfu_core::{Control, ErrorMap, Field};

/// Output format selected with `--format`.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

/// One validated field in `validate` output.
#[derive(Debug, Serialize)]
pub struct FieldReport {
    pub field: &'static str,
    pub valid: bool,
    /// Empty when the field is valid.
    pub message: String,
}

impl FieldReport {
    pub fn new(errors: &ErrorMap, field: Field) -> Self {
        Self {
            field: field.wire_name(),
            valid: errors.get(field).is_none(),
            message: errors.message(field),
        }
    }
}

/// Write `value` as JSON or YAML. Returns `false` for table output, which
/// each caller renders itself.
fn write_structured<T: Serialize + ?Sized>(
    out: &mut dyn Write,
    format: OutputFormat,
    value: &T,
) -> Result<bool> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(value)?)?,
        OutputFormat::Yaml => write!(out, "{}", serde_yaml::to_string(value)?)?,
        OutputFormat::Table => return Ok(false),
    }
    Ok(true)
}

/// Print controls in the order given.
pub fn write_controls(out: &mut dyn Write, format: OutputFormat, controls: &[&Control]) -> Result<()> {
    if write_structured(out, format, controls)? {
        return Ok(());
    }
    if controls.is_empty() {
        writeln!(out, "No controls.")?;
        return Ok(());
    }

    let headers = ["CONTROL ID", "CATEGORY", "DESCRIPTION"];
    let id_width = controls
        .iter()
        .map(|c| c.control_id.chars().count())
        .chain([headers[0].len()])
        .max()
        .unwrap_or_default();
    let category_width = controls
        .iter()
        .map(|c| c.category.chars().count())
        .chain([headers[1].len()])
        .max()
        .unwrap_or_default();

    writeln!(
        out,
        "{:<id_width$}  {:<category_width$}  {}",
        headers[0], headers[1], headers[2]
    )?;
    for c in controls {
        writeln!(
            out,
            "{:<id_width$}  {:<category_width$}  {}",
            c.control_id, c.category, c.description
        )?;
    }
    Ok(())
}

/// Print per-field validation results.
pub fn write_reports(out: &mut dyn Write, format: OutputFormat, reports: &[FieldReport]) -> Result<()> {
    if write_structured(out, format, reports)? {
        return Ok(());
    }
    for r in reports {
        if r.valid {
            writeln!(out, "  {}: ok", r.field)?;
        } else {
            writeln!(out, "  {}: {}", r.field, r.message)?;
        }
    }
    Ok(())
}

/// Print every error in `errors`, one per line, to a diagnostic stream.
pub fn write_error_map(out: &mut dyn Write, errors: &ErrorMap) -> Result<()> {
    for field in Field::ALL {
        if let Some(e) = errors.get(field) {
            writeln!(out, "  {}: {e}", field.label())?;
        }
    }
    Ok(())
}
