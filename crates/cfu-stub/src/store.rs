//! In-memory control storage.
//!
//! A single ordered `Vec<Control>` behind a `parking_lot::RwLock`. Order is
//! insertion order and is what `GET /controls` returns; an update replaces
//! the record in place.

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use cfu_core::Control;

/// Why a store mutation was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("Control ID already exists")]
    Duplicate,
}

struct Inner {
    controls: RwLock<Vec<Control>>,
}

/// Shared application state.
///
/// Cheaply cloneable via `Arc`; all clones share the same data.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_controls(Vec::new())
    }

    /// State pre-populated with `controls`, in order.
    pub fn with_controls(controls: Vec<Control>) -> Self {
        Self {
            inner: Arc::new(Inner {
                controls: RwLock::new(controls),
            }),
        }
    }

    /// Every stored control, in insertion order.
    pub fn list(&self) -> Vec<Control> {
        self.inner.controls.read().clone()
    }

    pub fn insert(&self, control: Control) -> Result<(), StoreError> {
        let mut controls = self.inner.controls.write();
        if controls.iter().any(|c| c.control_id == control.control_id) {
            return Err(StoreError::Duplicate);
        }
        controls.push(control);
        Ok(())
    }

    /// Replace the record addressed by `original_id`, keeping its position.
    pub fn replace(&self, original_id: &str, control: Control) -> Result<(), StoreError> {
        let mut controls = self.inner.controls.write();
        let idx = controls
            .iter()
            .position(|c| c.control_id == original_id)
            .ok_or(StoreError::NotFound)?;
        let collides = control.control_id != original_id
            && controls.iter().any(|c| c.control_id == control.control_id);
        if collides {
            return Err(StoreError::Duplicate);
        }
        controls[idx] = control;
        Ok(())
    }

    pub fn remove(&self, control_id: &str) -> Result<Control, StoreError> {
        let mut controls = self.inner.controls.write();
        let idx = controls
            .iter()
            .position(|c| c.control_id == control_id)
            .ok_or(StoreError::NotFound)?;
        Ok(controls.remove(idx))
    }
}
