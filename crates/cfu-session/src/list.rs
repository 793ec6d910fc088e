//! # List Reconciler
//!
//! Holds the control collection exactly as the service last returned it.
//! After every successful create, update or delete the whole collection is
//! fetched again and replaced; nothing is patched, appended, or removed
//! locally. Display order is the reverse of server order, so the most
//! recently returned record comes first.

use cfu_client::{ControlRepository, RepositoryError};
use cfu_core::Control;

/// The canonical, server-derived control collection.
#[derive(Debug, Clone, Default)]
pub struct ControlList {
    /// Server order.
    controls: Vec<Control>,
    last_error: Option<RepositoryError>,
}

impl ControlList {
    /// An empty list that has not been fetched yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the collection and replace local state with it.
    ///
    /// On failure the previous collection is kept and the error recorded.
    pub async fn refresh<R>(&mut self, repo: &R) -> Result<(), RepositoryError>
    where
        R: ControlRepository + ?Sized,
    {
        match repo.list().await {
            Ok(controls) => {
                tracing::debug!(count = controls.len(), "control list replaced");
                self.controls = controls;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "control list refresh failed");
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Records in display order (newest first).
    pub fn displayed(&self) -> impl Iterator<Item = &Control> + '_ {
        self.controls.iter().rev()
    }

    /// Records in the order the service returned them.
    pub fn server_order(&self) -> &[Control] {
        &self.controls
    }

    pub fn find(&self, control_id: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.control_id == control_id)
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// The error from the most recent refresh, if it failed.
    pub fn last_error(&self) -> Option<&RepositoryError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfu_client::{MockControlRepository, Operation};

    fn control(id: &str) -> Control {
        Control::new(id, "Data Protection", "Encrypt backups at rest")
    }

    #[tokio::test]
    async fn refresh_replaces_and_displays_reversed() {
        let repo = MockControlRepository::with_controls(vec![
            control("CTRL-001"),
            control("CTRL-002"),
            control("CTRL-003"),
        ]);
        let mut list = ControlList::new();
        list.refresh(&repo).await.unwrap();

        let shown: Vec<_> = list.displayed().map(|c| c.control_id.as_str()).collect();
        assert_eq!(shown, ["CTRL-003", "CTRL-002", "CTRL-001"]);
        assert_eq!(list.server_order()[0].control_id, "CTRL-001");
        assert!(list.last_error().is_none());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_collection() {
        let repo = MockControlRepository::with_controls(vec![control("CTRL-001")]);
        let mut list = ControlList::new();
        list.refresh(&repo).await.unwrap();

        repo.fail_next(
            Operation::List,
            RepositoryError::request(500, "Unable to fetch controls"),
        )
        .await;
        let err = list.refresh(&repo).await.unwrap_err();

        assert_eq!(err.message(), "Unable to fetch controls");
        assert_eq!(list.len(), 1);
        assert_eq!(list.last_error(), Some(&err));
    }

    #[tokio::test]
    async fn refresh_drops_records_removed_on_the_server() {
        let repo = MockControlRepository::with_controls(vec![control("CTRL-001"), control("CTRL-002")]);
        let mut list = ControlList::new();
        list.refresh(&repo).await.unwrap();

        repo.delete("CTRL-001").await.unwrap();
        list.refresh(&repo).await.unwrap();

        assert!(list.find("CTRL-001").is_none());
        assert!(list.find("CTRL-002").is_some());
    }
}
