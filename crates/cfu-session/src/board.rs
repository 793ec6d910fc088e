//! # Control Board
//!
//! Owns everything one user-facing screen needs: the repository handle, the
//! reconciled list, the create form, and the edit session. The two sessions
//! own disjoint state; the board only lends each of them the shared list
//! when a mutation needs reconciling.

use std::sync::Arc;

use cfu_client::{ControlRepository, RepositoryError};
use cfu_core::Control;

use crate::create::CreateSession;
use crate::edit::EditSession;
use crate::error::SessionError;
use crate::list::ControlList;
use crate::mutation::MutationOutcome;

/// Repository, list, and both form sessions.
pub struct ControlBoard<R: ControlRepository + ?Sized> {
    repo: Arc<R>,
    list: ControlList,
    create: CreateSession,
    edit: EditSession,
}

impl<R: ControlRepository + ?Sized> ControlBoard<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            list: ControlList::new(),
            create: CreateSession::new(),
            edit: EditSession::new(),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    pub fn list(&self) -> &ControlList {
        &self.list
    }

    pub fn create_session(&mut self) -> &mut CreateSession {
        &mut self.create
    }

    pub fn edit_session(&mut self) -> &mut EditSession {
        &mut self.edit
    }

    /// Fetch the collection from the service.
    pub async fn refresh(&mut self) -> Result<(), RepositoryError> {
        self.list.refresh(self.repo.as_ref()).await
    }

    /// Submit the create form.
    pub async fn submit_create(&mut self) -> Result<MutationOutcome, SessionError> {
        self.create.submit(self.repo.as_ref(), &mut self.list).await
    }

    /// Open the edit session on the listed record with `control_id`.
    ///
    /// Returns the record, or `None` when the current list has no such id.
    pub fn open_edit(&mut self, control_id: &str) -> Option<&Control> {
        let control = self.list.find(control_id)?;
        self.edit.open(control);
        Some(control)
    }

    /// Confirm the edit session's draft.
    pub async fn confirm_edit(&mut self) -> Result<MutationOutcome, SessionError> {
        self.edit
            .confirm_submit(self.repo.as_ref(), &mut self.list)
            .await
    }

    /// Delete the record the edit session is open on.
    pub async fn delete_edited(&mut self) -> Result<MutationOutcome, SessionError> {
        self.edit.delete(self.repo.as_ref(), &mut self.list).await
    }
}
