//! # cfu CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cfu_cli::controls::{
    run_create, run_delete, run_list, run_update, Context, CreateArgs, DeleteArgs, UpdateArgs,
    EXIT_FAILURE, EXIT_OK,
};
use cfu_cli::output::OutputFormat;
use cfu_cli::validate::{run_categories, run_validate, ValidateArgs};
use cfu_client::{ClientConfig, HttpControlRepository};

/// Control Framework Upload CLI.
///
/// Lists, creates, updates, and deletes compliance controls on the control
/// service, applying the same field validation as the upload form.
#[derive(Parser, Debug)]
#[command(name = "cfu", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Base URL of the control service. Overrides CFU_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List controls, most recent first.
    List,

    /// Create a new control.
    Create(CreateArgs),

    /// Update an existing control.
    Update(UpdateArgs),

    /// Delete a control.
    Delete(DeleteArgs),

    /// Validate field values without contacting the service.
    Validate(ValidateArgs),

    /// Print the accepted categories.
    Categories,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Commands::Validate(args) => return run_validate(args, cli.format, &mut stdout),
        Commands::Categories => return run_categories(cli.format, &mut stdout),
        _ => {}
    }

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url)?;
    }
    tracing::debug!(base_url = %config.base_url, "using control service");
    let repo = Arc::new(HttpControlRepository::new(config)?);

    let mut stderr = std::io::stderr().lock();
    let mut ctx = Context {
        repo,
        format: cli.format,
        out: &mut stdout,
        err: &mut stderr,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match &cli.command {
            Commands::List => run_list(&mut ctx).await,
            Commands::Create(args) => run_create(args, &mut ctx).await,
            Commands::Update(args) => run_update(args, &mut ctx).await,
            Commands::Delete(args) => run_delete(args, &mut ctx).await,
            Commands::Validate(_) | Commands::Categories => Ok(EXIT_OK),
        }
    })
}
