//! # cfu-cli: Control Framework Upload Command-Line Interface
//!
//! A clap-based front end over `cfu-session`. Every mutating command goes
//! through the same create and edit sessions an interactive form would use,
//! so a control the CLI accepts is one the form would accept.
//!
//! ## Subcommands
//!
//! - `list`: Fetch and print the collection, newest first
//! - `create`: Validate and submit a new control
//! - `update`: Edit an existing control by its current ID
//! - `delete`: Delete a control by ID
//! - `validate`: Run the field validators offline
//! - `categories`: Print the accepted categories
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from handlers; handlers write to the
//!   streams they are given.
//! - No business logic here. Validation lives in `cfu-core`, submission and
//!   reconciliation in `cfu-session`.

pub mod controls;
pub mod output;
pub mod validate;
