//! Session error types.

use thiserror::Error;

use cfu_client::RepositoryError;
use cfu_core::ErrorMap;

/// Errors from create and edit session operations.
///
/// None of these are fatal: every variant leaves the session in a stable,
/// editable (or closed) state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The edit session is closed.
    #[error("no record is open for editing")]
    NotOpen,

    /// A submission or delete for this session has not completed yet.
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    /// Local validation refused the submission; the map holds the errors.
    #[error("validation failed on {} field(s)", .0.errors().count())]
    Validation(ErrorMap),

    /// The repository rejected the request or could not be reached.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// The session was cancelled or reopened while the request was in
    /// flight; its result was ignored.
    #[error("result arrived for a discarded session")]
    Discarded,
}
