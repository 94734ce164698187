use crate::api::ApiError;
use crate::libs::messages::Message;
use thiserror::Error;

/// Outcome of a failed task or session operation.
///
/// Each remote failure keeps the underlying [`ApiError`] as its source.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("failed to load tasks")]
    LoadFailed(#[source] ApiError),

    #[error("failed to add task")]
    AddFailed(#[source] ApiError),

    #[error("failed to update task")]
    UpdateFailed(#[source] ApiError),

    #[error("failed to delete task")]
    DeleteFailed(#[source] ApiError),

    #[error("authentication service unavailable")]
    AuthUnavailable(#[source] ApiError),

    /// The operation was skipped because nobody is signed in.
    #[error("no active session")]
    NoSession,
}

impl TaskError {
    /// The notice shown to the user for this failure.
    pub fn message(&self) -> Message {
        match self {
            TaskError::LoadFailed(_) => Message::TasksLoadFailed,
            TaskError::AddFailed(_) => Message::TaskAddFailed,
            TaskError::UpdateFailed(_) => Message::TaskUpdateFailed,
            TaskError::DeleteFailed(_) => Message::TaskDeleteFailed,
            TaskError::AuthUnavailable(_) => Message::AuthUnavailable,
            TaskError::NoSession => Message::SignInRequired,
        }
    }
}
