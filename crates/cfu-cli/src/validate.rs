//! # Validate and Categories Subcommands
//!
//! Offline commands: no service is contacted.

use std::io::Write;

use anyhow::{bail, Result};
use clap::Args;

use cfu_core::{Category, ErrorMap};

use crate::controls::{FieldArgs, EXIT_INVALID, EXIT_OK};
use crate::output::{write_reports, FieldReport, OutputFormat};

/// Arguments for `cfu validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub fields: FieldArgs,
}

/// `cfu validate`: run the field validators on the given values.
pub fn run_validate(args: &ValidateArgs, format: OutputFormat, out: &mut dyn Write) -> Result<u8> {
    let given = args.fields.given();
    if given.is_empty() {
        bail!("nothing to validate: pass --control-id, --category, or --description");
    }

    let mut errors = ErrorMap::clean();
    for (field, value) in &given {
        errors.revalidate(*field, value);
    }
    let reports: Vec<FieldReport> = given
        .iter()
        .map(|(field, _)| FieldReport::new(&errors, *field))
        .collect();
    write_reports(out, format, &reports)?;

    Ok(if errors.is_clean() { EXIT_OK } else { EXIT_INVALID })
}

/// `cfu categories`: print the accepted category names.
pub fn run_categories(format: OutputFormat, out: &mut dyn Write) -> Result<u8> {
    let names: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
    match format {
        OutputFormat::Table => {
            for name in &names {
                writeln!(out, "{name}")?;
            }
        }
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&names)?)?,
        OutputFormat::Yaml => write!(out, "{}", serde_yaml::to_string(&names)?)?,
    }
    Ok(EXIT_OK)
}
