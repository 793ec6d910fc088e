//! # Edit Session
//!
//! Lifecycle of editing one existing control.
//!
//! ```text
//! Closed ──open──▶ Open ──confirm/delete──▶ Submitting ──ok──▶ Closed
//!   ▲                │  ▲                        │
//!   └────cancel──────┘  └─────────err────────────┘
//! ```
//!
//! `open` seeds a fresh draft from the selected record and captures its
//! control id as the address for update and delete, so renaming the id in
//! the draft still updates the right record. Every `open`, `cancel`, and
//! dispatch bumps the generation; a result carrying an older generation is
//! ignored.

use std::fmt;

use cfu_client::{ControlRepository, RepositoryError};
use cfu_core::{Control, Draft, ErrorMap, Field, FormController};

use crate::error::SessionError;
use crate::list::ControlList;
use crate::mutation::{self, MutationOutcome, MutationRequest, PendingMutation};

/// Edit session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditState {
    Closed,
    Open,
    /// An update or delete is in flight. Edits and new submissions are refused.
    Submitting,
}

impl EditState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "CLOSED",
            Self::Open => "OPEN",
            Self::Submitting => "SUBMITTING",
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

impl fmt::Display for EditState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State for editing a single existing control.
#[derive(Debug, Clone)]
pub struct EditSession {
    state: EditState,
    form: FormController,
    original_id: Option<String>,
    generation: u64,
    error: Option<RepositoryError>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self {
            state: EditState::Closed,
            form: FormController::new(),
            original_id: None,
            generation: 0,
            error: None,
        }
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    /// The control id the session was opened on.
    pub fn original_id(&self) -> Option<&str> {
        self.original_id.as_deref()
    }

    pub fn draft(&self) -> &Draft {
        self.form.draft()
    }

    pub fn errors(&self) -> &ErrorMap {
        self.form.errors()
    }

    /// The last repository failure for this opening of the session.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(RepositoryError::message)
    }

    /// Open the session on `control`, discarding any previous draft,
    /// errors, or in-flight result.
    pub fn open(&mut self, control: &Control) {
        self.generation += 1;
        self.form = FormController::seeded(control);
        self.original_id = Some(control.control_id.clone());
        self.error = None;
        self.state = EditState::Open;
        tracing::info!(control_id = %control.control_id, "edit session opened");
    }

    fn require_state(&self, expected: EditState) -> Result<(), SessionError> {
        match self.state {
            s if s == expected => Ok(()),
            EditState::Closed => Err(SessionError::NotOpen),
            EditState::Submitting => Err(SessionError::SubmissionInFlight),
            EditState::Open => Err(SessionError::NotOpen),
        }
    }

    fn address(&self) -> Result<String, SessionError> {
        self.original_id.clone().ok_or(SessionError::NotOpen)
    }

    pub fn on_change(&mut self, field: Field, value: impl Into<String>) -> Result<(), SessionError> {
        self.require_state(EditState::Open)?;
        self.form.on_change(field, value);
        Ok(())
    }

    pub fn on_blur(&mut self, field: Field) -> Result<(), SessionError> {
        self.require_state(EditState::Open)?;
        self.form.on_blur(field);
        Ok(())
    }

    /// Whether the save control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.state == EditState::Open && self.form.can_submit()
    }

    /// Validate the draft and start an update addressed to the original id.
    ///
    /// Validation failure leaves the session Open with the refreshed map.
    pub fn begin_confirm(&mut self) -> Result<PendingMutation, SessionError> {
        self.require_state(EditState::Open)?;
        let original_id = self.address()?;
        let control = self.form.prepare_submit().map_err(SessionError::Validation)?;
        self.state = EditState::Submitting;
        self.error = None;
        self.generation += 1;
        tracing::info!(
            original_id = %original_id,
            control_id = %control.control_id,
            "update submitted"
        );
        Ok(PendingMutation::new(
            self.generation,
            MutationRequest::Update {
                original_id,
                control,
            },
        ))
    }

    /// Start deleting the record the session was opened on. The draft is not
    /// validated.
    pub fn begin_delete(&mut self) -> Result<PendingMutation, SessionError> {
        self.require_state(EditState::Open)?;
        let control_id = self.address()?;
        self.state = EditState::Submitting;
        self.error = None;
        self.generation += 1;
        tracing::info!(control_id = %control_id, "delete submitted");
        Ok(PendingMutation::new(
            self.generation,
            MutationRequest::Delete { control_id },
        ))
    }

    /// Apply the result of a ticket from [`begin_confirm`](Self::begin_confirm)
    /// or [`begin_delete`](Self::begin_delete).
    ///
    /// Success closes the session. Failure returns it to Open with the draft
    /// untouched and the message recorded. A ticket from an earlier opening
    /// or an earlier dispatch yields [`SessionError::Discarded`] and changes nothing.
    pub fn complete(
        &mut self,
        ticket: PendingMutation,
        result: Result<(), RepositoryError>,
    ) -> Result<(), SessionError> {
        if ticket.generation != self.generation || self.state != EditState::Submitting {
            tracing::debug!(
                operation = %ticket.request().operation(),
                "ignoring result for a discarded edit session"
            );
            return Err(SessionError::Discarded);
        }
        let operation = ticket.request().operation();
        match result {
            Ok(()) => {
                tracing::info!(%operation, "edit session closed after success");
                self.close();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%operation, error = %e, "edit session mutation rejected");
                self.state = EditState::Open;
                self.error = Some(e.clone());
                Err(SessionError::Repository(e))
            }
        }
    }

    /// Validate, update, and reconcile in one call.
    pub async fn confirm_submit<R>(
        &mut self,
        repo: &R,
        list: &mut ControlList,
    ) -> Result<MutationOutcome, SessionError>
    where
        R: ControlRepository + ?Sized,
    {
        let ticket = self.begin_confirm()?;
        mutation::run(ticket, repo, list, |t, r| self.complete(t, r)).await
    }

    /// Delete and reconcile in one call.
    pub async fn delete<R>(
        &mut self,
        repo: &R,
        list: &mut ControlList,
    ) -> Result<MutationOutcome, SessionError>
    where
        R: ControlRepository + ?Sized,
    {
        let ticket = self.begin_delete()?;
        mutation::run(ticket, repo, list, |t, r| self.complete(t, r)).await
    }

    /// Discard the draft and close without calling the repository.
    pub fn cancel(&mut self) {
        if self.state.is_open() {
            tracing::info!(original_id = ?self.original_id, "edit session cancelled");
        }
        self.generation += 1;
        self.close();
    }

    fn close(&mut self) {
        self.state = EditState::Closed;
        self.form.reset();
        self.original_id = None;
        self.error = None;
    }
}
