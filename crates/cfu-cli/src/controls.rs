//! # Control Subcommands
//!
//! `list`, `create`, `update`, and `delete` against the control service.
//! Each handler drives the same sessions an interactive front end would, so
//! local validation, reconciliation, and error messages are identical.
//!
//! Handlers return the process exit code: [`EXIT_OK`], [`EXIT_FAILURE`] when
//! the service refused or could not be reached, [`EXIT_INVALID`] when local
//! validation refused the submission.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use cfu_client::ControlRepository;
use cfu_core::{Control, Field};
use cfu_session::{ControlBoard, MutationOutcome, SessionError};

use crate::output::{write_controls, write_error_map, OutputFormat};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INVALID: u8 = 2;

/// Optional field values, shared by `update` and `validate`.
#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    /// Control identifier (format CTRL-XXX).
    #[arg(long)]
    pub control_id: Option<String>,

    /// Category: "Access Control", "Data Protection", or "Monitoring".
    #[arg(long)]
    pub category: Option<String>,

    /// Description, 10 to 500 characters, no markup.
    #[arg(long)]
    pub description: Option<String>,
}

impl FieldArgs {
    /// The fields that were given, in form order.
    pub fn given(&self) -> Vec<(Field, &str)> {
        [
            (Field::ControlId, self.control_id.as_deref()),
            (Field::Category, self.category.as_deref()),
            (Field::Description, self.description.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

/// Arguments for `cfu create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Control identifier (format CTRL-XXX).
    #[arg(long)]
    pub control_id: String,

    /// Category: "Access Control", "Data Protection", or "Monitoring".
    #[arg(long)]
    pub category: String,

    /// Description, 10 to 500 characters, no markup.
    #[arg(long)]
    pub description: String,
}

/// Arguments for `cfu update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Control ID of the record to update.
    pub original_id: String,

    /// Replacement values. Fields not given keep their current value.
    #[command(flatten)]
    pub fields: FieldArgs,
}

/// Arguments for `cfu delete`.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Control ID of the record to delete.
    pub control_id: String,
}

/// Shared context for every handler.
pub struct Context<'a> {
    pub repo: Arc<dyn ControlRepository>,
    pub format: OutputFormat,
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
}

impl Context<'_> {
    fn board(&self) -> ControlBoard<dyn ControlRepository> {
        ControlBoard::new(Arc::clone(&self.repo))
    }

    fn print_list(&mut self, board: &ControlBoard<dyn ControlRepository>) -> Result<()> {
        let shown: Vec<&Control> = board.list().displayed().collect();
        write_controls(self.out, self.format, &shown)
    }

    /// Report a finished mutation and print the reconciled list.
    fn report(
        &mut self,
        board: &ControlBoard<dyn ControlRepository>,
        result: Result<MutationOutcome, SessionError>,
        done: &str,
    ) -> Result<u8> {
        match result {
            Ok(outcome) => {
                if self.format == OutputFormat::Table {
                    writeln!(self.out, "OK: {done}")?;
                }
                if let Some(e) = &outcome.refresh_error {
                    tracing::warn!(error = %e, "list refresh after {} failed", outcome.operation);
                    writeln!(self.err, "warning: {e}; the list below may be stale")?;
                }
                self.print_list(board)?;
                Ok(EXIT_OK)
            }
            Err(SessionError::Validation(errors)) => {
                writeln!(self.err, "error: validation failed")?;
                write_error_map(self.err, &errors)?;
                Ok(EXIT_INVALID)
            }
            Err(e) => {
                writeln!(self.err, "error: {e}")?;
                Ok(EXIT_FAILURE)
            }
        }
    }
}

/// `cfu list`
pub async fn run_list(ctx: &mut Context<'_>) -> Result<u8> {
    let mut board = ctx.board();
    if let Err(e) = board.refresh().await {
        writeln!(ctx.err, "error: {e}")?;
        return Ok(EXIT_FAILURE);
    }
    ctx.print_list(&board)?;
    Ok(EXIT_OK)
}

/// `cfu create`
pub async fn run_create(args: &CreateArgs, ctx: &mut Context<'_>) -> Result<u8> {
    let mut board = ctx.board();
    let form = board.create_session();
    form.on_change(Field::ControlId, args.control_id.as_str());
    form.on_change(Field::Category, args.category.as_str());
    form.on_change(Field::Description, args.description.as_str());

    let result = board.submit_create().await;
    ctx.report(&board, result, &format!("created {}", args.control_id))
}

/// `cfu update`
pub async fn run_update(args: &UpdateArgs, ctx: &mut Context<'_>) -> Result<u8> {
    let mut board = ctx.board();
    if let Err(e) = board.refresh().await {
        writeln!(ctx.err, "error: {e}")?;
        return Ok(EXIT_FAILURE);
    }
    if board.open_edit(&args.original_id).is_none() {
        writeln!(ctx.err, "error: no control with ID {}", args.original_id)?;
        return Ok(EXIT_FAILURE);
    }
    for (field, value) in args.fields.given() {
        board.edit_session().on_change(field, value)?;
    }

    let result = board.confirm_edit().await;
    ctx.report(&board, result, &format!("updated {}", args.original_id))
}

/// `cfu delete`
pub async fn run_delete(args: &DeleteArgs, ctx: &mut Context<'_>) -> Result<u8> {
    let mut board = ctx.board();
    if let Err(e) = board.refresh().await {
        writeln!(ctx.err, "error: {e}")?;
        return Ok(EXIT_FAILURE);
    }
    if board.open_edit(&args.control_id).is_none() {
        writeln!(ctx.err, "error: no control with ID {}", args.control_id)?;
        return Ok(EXIT_FAILURE);
    }

    let result = board.delete_edited().await;
    ctx.report(&board, result, &format!("deleted {}", args.control_id))
}
