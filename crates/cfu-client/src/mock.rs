//! In-memory control repository for tests and offline use.
//!
//! Behaves like the control service: an ordered collection keyed by
//! `controlId`, with 409 on duplicate ids and 404 on unknown ids. Failures
//! can be scripted per operation with [`MockControlRepository::fail_next`],
//! and every call is counted.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use cfu_core::Control;

use crate::error::RepositoryError;
use crate::repository::{ControlRepository, Operation};

/// Mock repository holding controls in memory.
#[derive(Clone, Default)]
pub struct MockControlRepository {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    controls: Vec<Control>,
    scripted: HashMap<Operation, VecDeque<RepositoryError>>,
    calls: HashMap<Operation, usize>,
}

impl MockState {
    /// Count the call and pop a scripted failure, if one is queued.
    fn enter(&mut self, op: Operation) -> Result<(), RepositoryError> {
        *self.calls.entry(op).or_default() += 1;
        match self.scripted.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn position(&self, control_id: &str) -> Option<usize> {
        self.controls.iter().position(|c| c.control_id == control_id)
    }
}

impl MockControlRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository pre-populated with `controls`, in order.
    pub fn with_controls(controls: Vec<Control>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState {
                controls,
                ..MockState::default()
            })),
        }
    }

    /// Make the next call of `op` fail with `error`. Failures queue up.
    pub async fn fail_next(&self, op: Operation, error: RepositoryError) {
        self.inner
            .lock()
            .await
            .scripted
            .entry(op)
            .or_default()
            .push_back(error);
    }

    /// How many times `op` has been called, including failed calls.
    pub async fn calls(&self, op: Operation) -> usize {
        self.inner.lock().await.calls.get(&op).copied().unwrap_or(0)
    }

    /// Current stored collection, in server order.
    pub async fn snapshot(&self) -> Vec<Control> {
        self.inner.lock().await.controls.clone()
    }
}

fn not_found() -> RepositoryError {
    RepositoryError::request(404, "not found")
}

fn duplicate() -> RepositoryError {
    RepositoryError::request(409, "Control ID already exists")
}

#[async_trait]
impl ControlRepository for MockControlRepository {
    async fn list(&self) -> Result<Vec<Control>, RepositoryError> {
        let mut state = self.inner.lock().await;
        state.enter(Operation::List)?;
        Ok(state.controls.clone())
    }

    async fn create(&self, control: &Control) -> Result<(), RepositoryError> {
        let mut state = self.inner.lock().await;
        state.enter(Operation::Create)?;
        if state.position(&control.control_id).is_some() {
            return Err(duplicate());
        }
        state.controls.push(control.clone());
        Ok(())
    }

    async fn update(&self, original_id: &str, control: &Control) -> Result<(), RepositoryError> {
        let mut state = self.inner.lock().await;
        state.enter(Operation::Update)?;
        let idx = state.position(original_id).ok_or_else(not_found)?;
        if control.control_id != original_id && state.position(&control.control_id).is_some() {
            return Err(duplicate());
        }
        state.controls[idx] = control.clone();
        Ok(())
    }

    async fn delete(&self, control_id: &str) -> Result<(), RepositoryError> {
        let mut state = self.inner.lock().await;
        state.enter(Operation::Delete)?;
        let idx = state.position(control_id).ok_or_else(not_found)?;
        state.controls.remove(idx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(id: &str) -> Control {
        Control::new(id, "Monitoring", "Review audit logs weekly")
    }

    #[tokio::test]
    async fn create_then_list_preserves_order() {
        let repo = MockControlRepository::new();
        repo.create(&control("CTRL-001")).await.unwrap();
        repo.create(&control("CTRL-002")).await.unwrap();
        let ids: Vec<_> = repo.list().await.unwrap().into_iter().map(|c| c.control_id).collect();
        assert_eq!(ids, ["CTRL-001", "CTRL-002"]);
        assert_eq!(repo.calls(Operation::Create).await, 2);
        assert_eq!(repo.calls(Operation::List).await, 1);
    }

    #[tokio::test]
    async fn duplicate_create_is_a_conflict() {
        let repo = MockControlRepository::with_controls(vec![control("CTRL-001")]);
        let err = repo.create(&control("CTRL-001")).await.unwrap_err();
        assert_eq!(err.status(), Some(409));
    }

    #[tokio::test]
    async fn update_can_rename_in_place() {
        let repo = MockControlRepository::with_controls(vec![control("CTRL-001"), control("CTRL-002")]);
        repo.update("CTRL-001", &control("CTRL-009")).await.unwrap();
        let ids: Vec<_> = repo.snapshot().await.into_iter().map(|c| c.control_id).collect();
        assert_eq!(ids, ["CTRL-009", "CTRL-002"]);
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids_are_not_found() {
        let repo = MockControlRepository::new();
        assert_eq!(
            repo.update("CTRL-404", &control("CTRL-404")).await.unwrap_err().message(),
            "not found"
        );
        assert_eq!(repo.delete("CTRL-404").await.unwrap_err().status(), Some(404));
    }

    #[tokio::test]
    async fn scripted_failures_fire_once_in_order() {
        let repo = MockControlRepository::new();
        repo.fail_next(Operation::List, RepositoryError::transport("down")).await;
        assert_eq!(repo.list().await.unwrap_err().message(), "down");
        assert!(repo.list().await.is_ok());
        assert_eq!(repo.calls(Operation::List).await, 2);
    }
}
