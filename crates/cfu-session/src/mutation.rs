//! # In-Flight Mutations
//!
//! A session does not call the repository itself in the two-phase API.
//! `begin_*` validates, marks the session as submitting, and hands out a
//! [`PendingMutation`] ticket. The caller dispatches the ticket wherever its
//! event loop runs network work and feeds the result back through the
//! session's `complete`. The ticket records the session generation it was
//! issued under, so a result arriving after cancel, reopen, or a later
//! dispatch is ignored.

use cfu_client::{ControlRepository, Operation, RepositoryError};
use cfu_core::Control;

use crate::error::SessionError;
use crate::list::ControlList;

/// The repository call a ticket stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRequest {
    Create(Control),
    Update { original_id: String, control: Control },
    Delete { control_id: String },
}

impl MutationRequest {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Create(_) => Operation::Create,
            Self::Update { .. } => Operation::Update,
            Self::Delete { .. } => Operation::Delete,
        }
    }
}

/// A mutation started by a session and not yet completed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending mutation must be completed or the session stays submitting"]
pub struct PendingMutation {
    pub(crate) generation: u64,
    request: MutationRequest,
}

impl PendingMutation {
    pub(crate) fn new(generation: u64, request: MutationRequest) -> Self {
        Self {
            generation,
            request,
        }
    }

    pub fn request(&self) -> &MutationRequest {
        &self.request
    }

    /// Perform the repository call this ticket stands for.
    pub async fn dispatch<R>(&self, repo: &R) -> Result<(), RepositoryError>
    where
        R: ControlRepository + ?Sized,
    {
        match &self.request {
            MutationRequest::Create(control) => repo.create(control).await,
            MutationRequest::Update {
                original_id,
                control,
            } => repo.update(original_id, control).await,
            MutationRequest::Delete { control_id } => repo.delete(control_id).await,
        }
    }
}

/// Result of a mutation that the service accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub operation: Operation,
    /// Set when the follow-up list refresh failed. The mutation itself
    /// succeeded; the displayed list is stale until the next refresh.
    pub refresh_error: Option<RepositoryError>,
}

impl MutationOutcome {
    pub fn is_reconciled(&self) -> bool {
        self.refresh_error.is_none()
    }
}

/// Re-fetch the list after an accepted mutation.
pub async fn reconcile<R>(list: &mut ControlList, repo: &R, operation: Operation) -> MutationOutcome
where
    R: ControlRepository + ?Sized,
{
    let refresh_error = list.refresh(repo).await.err();
    MutationOutcome {
        operation,
        refresh_error,
    }
}

/// Dispatch a ticket, hand the result to `complete`, and reconcile on success.
pub(crate) async fn run<R, F>(
    ticket: PendingMutation,
    repo: &R,
    list: &mut ControlList,
    complete: F,
) -> Result<MutationOutcome, SessionError>
where
    R: ControlRepository + ?Sized,
    F: FnOnce(PendingMutation, Result<(), RepositoryError>) -> Result<(), SessionError>,
{
    let operation = ticket.request().operation();
    let result = ticket.dispatch(repo).await;
    complete(ticket, result)?;
    Ok(reconcile(list, repo, operation).await)
}
