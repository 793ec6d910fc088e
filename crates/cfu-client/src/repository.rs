//! # Control Repository Interface
//!
//! The four remote operations on the control collection, each returning a
//! tagged result: `Ok` with the payload or `Err` with a [`RepositoryError`]
//! whose message is ready to show the user.
//!
//! Implementations must be `Send + Sync` so one repository can be shared by
//! the create and edit sessions behind an `Arc`. The trait is object-safe to
//! allow swapping the HTTP implementation for [`crate::mock`] in tests.

use async_trait::async_trait;

use cfu_core::Control;

use crate::error::RepositoryError;

/// Default failure message for `list`.
pub const LIST_FAILED: &str = "Unable to fetch controls";
/// Default failure message for `create`.
pub const CREATE_FAILED: &str = "Submission failed";
/// Default failure message for `update`.
pub const UPDATE_FAILED: &str = "Update failed.";
/// Default failure message for `delete`.
pub const DELETE_FAILED: &str = "Delete failed.";
/// Transport failure message for mutating operations.
pub const NETWORK_ERROR: &str = "Network error occurred. Please try again later.";

/// Remote operations on the control collection.
#[async_trait]
pub trait ControlRepository: Send + Sync {
    /// Fetch the full collection, in server order.
    async fn list(&self) -> Result<Vec<Control>, RepositoryError>;

    /// Store a new record.
    async fn create(&self, control: &Control) -> Result<(), RepositoryError>;

    /// Replace the record currently addressed by `original_id`. The payload
    /// may carry a different id.
    async fn update(&self, original_id: &str, control: &Control) -> Result<(), RepositoryError>;

    /// Remove the record addressed by `control_id`.
    async fn delete(&self, control_id: &str) -> Result<(), RepositoryError>;
}

/// Which repository operation a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Message used when the service gives no usable error text.
    pub fn default_failure(&self) -> &'static str {
        match self {
            Self::List => LIST_FAILED,
            Self::Create => CREATE_FAILED,
            Self::Update => UPDATE_FAILED,
            Self::Delete => DELETE_FAILED,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(s)
    }
}

#[async_trait]
impl<R: ControlRepository + ?Sized> ControlRepository for std::sync::Arc<R> {
    async fn list(&self) -> Result<Vec<Control>, RepositoryError> {
        (**self).list().await
    }

    async fn create(&self, control: &Control) -> Result<(), RepositoryError> {
        (**self).create(control).await
    }

    async fn update(&self, original_id: &str, control: &Control) -> Result<(), RepositoryError> {
        (**self).update(original_id, control).await
    }

    async fn delete(&self, control_id: &str) -> Result<(), RepositoryError> {
        (**self).delete(control_id).await
    }
}
