//! # Create Session
//!
//! The "new control" form. Starts empty, validates live on every change and
//! blur, and on submit re-validates the whole draft before calling
//! `create`. A successful submission resets the form to empty and
//! reconciles the list; a rejected one keeps the draft so the user can
//! correct and resubmit.
//!
//! ```text
//! Editing ──submit──▶ Submitting ──ok──▶ Editing (empty draft) + list refresh
//!                         │
//!                         └──err──▶ Editing (draft kept, error shown)
//! ```

use cfu_client::{ControlRepository, RepositoryError};
use cfu_core::{Draft, ErrorMap, Field, FormController};

use crate::error::SessionError;
use crate::list::ControlList;
use crate::mutation::{self, MutationOutcome, MutationRequest, PendingMutation};

/// Form state for creating a new control.
#[derive(Debug, Clone, Default)]
pub struct CreateSession {
    form: FormController,
    in_flight: bool,
    generation: u64,
    error: Option<RepositoryError>,
}

impl CreateSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &Draft {
        self.form.draft()
    }

    pub fn errors(&self) -> &ErrorMap {
        self.form.errors()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// The last repository failure, shown until the next submission.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(RepositoryError::message)
    }

    pub fn on_change(&mut self, field: Field, value: impl Into<String>) {
        self.form.on_change(field, value);
    }

    pub fn on_blur(&mut self, field: Field) {
        self.form.on_blur(field);
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.in_flight && self.form.can_submit()
    }

    /// Validate and start a create. Refused while another is in flight.
    pub fn begin_submit(&mut self) -> Result<PendingMutation, SessionError> {
        if self.in_flight {
            return Err(SessionError::SubmissionInFlight);
        }
        let control = self.form.prepare_submit().map_err(SessionError::Validation)?;
        self.in_flight = true;
        self.error = None;
        // Each ticket is good for exactly one submission.
        self.generation += 1;
        tracing::info!(control_id = %control.control_id, "create submitted");
        Ok(PendingMutation::new(
            self.generation,
            MutationRequest::Create(control),
        ))
    }

    /// Apply the result of a ticket from [`begin_submit`](Self::begin_submit).
    ///
    /// `Ok` means the service accepted the record and the caller should
    /// reconcile the list.
    pub fn complete_submit(
        &mut self,
        ticket: PendingMutation,
        result: Result<(), RepositoryError>,
    ) -> Result<(), SessionError> {
        if ticket.generation != self.generation || !self.in_flight {
            tracing::debug!("ignoring create result for a discarded form");
            return Err(SessionError::Discarded);
        }
        self.in_flight = false;
        match result {
            Ok(()) => {
                tracing::info!("create accepted");
                self.form.reset();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "create rejected");
                self.error = Some(e.clone());
                Err(SessionError::Repository(e))
            }
        }
    }

    /// Validate, create, and reconcile in one call.
    pub async fn submit<R>(
        &mut self,
        repo: &R,
        list: &mut ControlList,
    ) -> Result<MutationOutcome, SessionError>
    where
        R: ControlRepository + ?Sized,
    {
        let ticket = self.begin_submit()?;
        mutation::run(ticket, repo, list, |t, r| self.complete_submit(t, r)).await
    }

    /// Discard the draft. Any in-flight result is ignored when it arrives.
    pub fn reset(&mut self) {
        self.form.reset();
        self.in_flight = false;
        self.error = None;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfu_client::{MockControlRepository, Operation};
    use cfu_core::{Control, FieldError};

    fn fill(session: &mut CreateSession, id: &str, category: &str, description: &str) {
        session.on_change(Field::ControlId, id);
        session.on_change(Field::Category, category);
        session.on_change(Field::Description, description);
    }

    fn fill_valid(session: &mut CreateSession) {
        fill(session, "CTRL-001", "Monitoring", "Implement quarterly access reviews");
    }

    #[tokio::test]
    async fn successful_submit_resets_and_reconciles_once() {
        let repo = MockControlRepository::with_controls(vec![Control::new(
            "CTRL-000",
            "Access Control",
            "Enforce MFA for all admins",
        )]);
        let mut list = ControlList::new();
        let mut session = CreateSession::new();
        fill_valid(&mut session);

        let outcome = session.submit(&repo, &mut list).await.unwrap();

        assert!(outcome.is_reconciled());
        assert_eq!(outcome.operation, Operation::Create);
        assert_eq!(repo.calls(Operation::Create).await, 1);
        assert_eq!(repo.calls(Operation::List).await, 1);
        let shown: Vec<_> = list.displayed().map(|c| c.control_id.as_str()).collect();
        assert_eq!(shown, ["CTRL-001", "CTRL-000"]);
        assert_eq!(session.draft(), &Draft::empty());
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_repository() {
        let repo = MockControlRepository::new();
        let mut list = ControlList::new();
        let mut session = CreateSession::new();
        fill(&mut session, "CTRL-1", "Monitoring", "short");

        let err = session.submit(&repo, &mut list).await.unwrap_err();

        match err {
            SessionError::Validation(map) => {
                assert_eq!(map.get(Field::ControlId), Some(FieldError::ControlIdFormat));
                assert_eq!(map.get(Field::Description), Some(FieldError::DescriptionLength));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(repo.calls(Operation::Create).await, 0);
        assert_eq!(repo.calls(Operation::List).await, 0);
        assert_eq!(session.draft().control_id, "CTRL-1");
    }

    #[tokio::test]
    async fn rejected_submit_keeps_draft_and_surfaces_message() {
        let repo = MockControlRepository::new();
        repo.fail_next(
            Operation::Create,
            RepositoryError::request(409, "Control ID already exists"),
        )
        .await;
        let mut list = ControlList::new();
        let mut session = CreateSession::new();
        fill_valid(&mut session);

        let err = session.submit(&repo, &mut list).await.unwrap_err();

        assert_eq!(
            err,
            SessionError::Repository(RepositoryError::request(409, "Control ID already exists"))
        );
        assert_eq!(session.error_message(), Some("Control ID already exists"));
        assert_eq!(session.draft().control_id, "CTRL-001");
        assert_eq!(repo.calls(Operation::List).await, 0);
        assert!(session.can_submit());
    }

    #[tokio::test]
    async fn failed_refresh_still_resets_form() {
        let repo = MockControlRepository::new();
        repo.fail_next(Operation::List, RepositoryError::transport("connection reset"))
            .await;
        let mut list = ControlList::new();
        let mut session = CreateSession::new();
        fill_valid(&mut session);

        let outcome = session.submit(&repo, &mut list).await.unwrap();

        assert_eq!(
            outcome.refresh_error,
            Some(RepositoryError::transport("connection reset"))
        );
        assert_eq!(session.draft(), &Draft::empty());
        assert_eq!(repo.snapshot().await.len(), 1);
    }

    #[test]
    fn second_submit_is_refused_while_in_flight() {
        let mut session = CreateSession::new();
        fill_valid(&mut session);

        let _ticket = session.begin_submit().unwrap();
        assert!(session.is_submitting());
        assert!(!session.can_submit());
        assert_eq!(session.begin_submit().unwrap_err(), SessionError::SubmissionInFlight);
    }

    #[test]
    fn result_after_reset_is_ignored() {
        let mut session = CreateSession::new();
        fill_valid(&mut session);
        let ticket = session.begin_submit().unwrap();

        session.reset();
        session.on_change(Field::ControlId, "CTRL-777");

        let err = session
            .complete_submit(ticket, Err(RepositoryError::request(500, "Submission failed")))
            .unwrap_err();
        assert_eq!(err, SessionError::Discarded);
        assert_eq!(session.draft().control_id, "CTRL-777");
        assert_eq!(session.error_message(), None);
    }

    #[test]
    fn earlier_ticket_cannot_complete_a_later_submission() {
        let mut session = CreateSession::new();
        fill_valid(&mut session);
        let first = session.begin_submit().unwrap();
        let copy = first.clone();
        session
            .complete_submit(first, Err(RepositoryError::request(409, "Control ID already exists")))
            .unwrap_err();

        session.on_change(Field::ControlId, "CTRL-002");
        let second = session.begin_submit().unwrap();

        assert_eq!(session.complete_submit(copy, Ok(())), Err(SessionError::Discarded));
        assert!(session.is_submitting());
        assert_eq!(session.draft().control_id, "CTRL-002");

        session.complete_submit(second, Ok(())).unwrap();
        assert!(!session.is_submitting());
        assert_eq!(session.draft(), &Draft::empty());
    }

    #[test]
    fn two_phase_success_clears_in_flight() {
        let mut session = CreateSession::new();
        fill_valid(&mut session);
        let ticket = session.begin_submit().unwrap();
        assert_eq!(
            ticket.request(),
            &MutationRequest::Create(Control::new(
                "CTRL-001",
                "Monitoring",
                "Implement quarterly access reviews"
            ))
        );

        session.complete_submit(ticket, Ok(())).unwrap();
        assert!(!session.is_submitting());
        assert_eq!(session.draft(), &Draft::empty());
    }
}
