//! # cfu-session: Form Sessions and List Reconciliation
//!
//! Wires the pure form state of `cfu-core` to a [`cfu_client::ControlRepository`]:
//!
//! - [`ControlList`]: the server-derived collection, replaced wholesale
//!   after every accepted mutation.
//! - [`CreateSession`]: the "new control" form and its submission.
//! - [`EditSession`]: open, edit, confirm, delete, or cancel one record.
//! - [`ControlBoard`]: one repository, one list, and both sessions.
//!
//! ## Submission Model
//!
//! Sessions refuse a second submission while one is in flight. Each session
//! exposes a synchronous two-phase API (`begin_*` returning a
//! [`PendingMutation`], then `complete`) for event loops that run network
//! work elsewhere, and an `async` convenience that does both and reconciles
//! the list. Every `begin_*` issues a ticket for that dispatch only; a result
//! carrying an older ticket, or arriving after the session was cancelled or
//! reopened, is ignored and reported as [`SessionError::Discarded`].
//!
//! Dropping an `async` submission future before it resolves leaves the
//! session submitting; `reset` or `cancel` recovers it.
//!
//! ## Crate Policy
//!
//! - Sessions never touch each other's state.
//! - No retries. Every failure is reported once and the session returns to
//!   an editable state.

pub mod board;
pub mod create;
pub mod edit;
pub mod error;
pub mod list;
pub mod mutation;

pub use board::ControlBoard;
pub use create::CreateSession;
pub use edit::{EditSession, EditState};
pub use error::SessionError;
pub use list::ControlList;
pub use mutation::{reconcile, MutationOutcome, MutationRequest, PendingMutation};
