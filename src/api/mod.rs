//! Remote service clients and the collaborator interfaces built on them.
//!
//! The task store and the session guard never talk HTTP themselves. They are
//! generic over two traits defined here:
//!
//! - [`AuthClient`]: session lookup, change notifications and sign-out
//! - [`TaskBackend`]: row-level CRUD over the tasks relation
//!
//! The production implementations live in [`auth`] (GoTrue-style auth REST
//! API) and [`rest`] (PostgREST table endpoint). Tests provide in-memory ones.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todoer::api::{auth::GoTrueAuth, rest::RestTaskBackend};
//! use todoer::libs::config::Config;
//!
//! # fn main() -> anyhow::Result<()> {
//! let backend_config = Config::read()?.backend()?;
//! let auth = GoTrueAuth::new(&backend_config);
//! let tasks = RestTaskBackend::new(&backend_config);
//! # Ok(())
//! # }
//! ```

use crate::libs::session::{Session, Subscription};
use crate::libs::task::{NewTaskRow, TaskId, TaskRow};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

pub mod auth;
pub mod rest;

/// Failure of a single round trip to the remote service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service responded {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("unexpected response: {0}")]
    InvalidRow(String),

    #[error("service returned no row")]
    EmptyResponse,
}

impl ApiError {
    /// True when the service refused the credentials rather than failing.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self,
            ApiError::Status { status, .. }
                if *status == StatusCode::BAD_REQUEST || *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Error envelope shared by PostgREST and GoTrue, fields vary per service.
#[derive(Deserialize, Default)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Passes successful responses through, turns the rest into [`ApiError::Status`].
pub(crate) async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let message = body
        .message
        .or(body.msg)
        .or(body.error_description)
        .or(body.error)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    Err(ApiError::Status { status, message })
}

/// Authentication collaborator.
#[allow(async_fn_in_trait)]
pub trait AuthClient {
    /// One-shot lookup of the current session, `None` when signed out.
    async fn current_session(&self) -> Result<Option<Session>, ApiError>;

    /// Subscribes to every later auth transition.
    fn on_session_change(&self) -> Subscription;

    async fn sign_out(&self) -> Result<(), ApiError>;
}

/// Remote store collaborator over the tasks relation.
///
/// Access is scoped to the session's user by the service's row policies; the
/// session is passed so implementations can authenticate the request.
#[allow(async_fn_in_trait)]
pub trait TaskBackend {
    /// All visible rows, newest `created_at` first.
    async fn select_all(&self, session: &Session) -> Result<Vec<TaskRow>, ApiError>;

    /// Inserts a row and returns it as stored, with `id` and `created_at` filled.
    async fn insert(&self, session: &Session, row: &NewTaskRow) -> Result<TaskRow, ApiError>;

    async fn update_completed(&self, session: &Session, id: &TaskId, completed: bool) -> Result<(), ApiError>;

    async fn delete(&self, session: &Session, id: &TaskId) -> Result<(), ApiError>;
}

impl<T: AuthClient + ?Sized> AuthClient for &T {
    async fn current_session(&self) -> Result<Option<Session>, ApiError> {
        (**self).current_session().await
    }

    fn on_session_change(&self) -> Subscription {
        (**self).on_session_change()
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        (**self).sign_out().await
    }
}

impl<T: TaskBackend + ?Sized> TaskBackend for &T {
    async fn select_all(&self, session: &Session) -> Result<Vec<TaskRow>, ApiError> {
        (**self).select_all(session).await
    }

    async fn insert(&self, session: &Session, row: &NewTaskRow) -> Result<TaskRow, ApiError> {
        (**self).insert(session, row).await
    }

    async fn update_completed(&self, session: &Session, id: &TaskId, completed: bool) -> Result<(), ApiError> {
        (**self).update_completed(session, id, completed).await
    }

    async fn delete(&self, session: &Session, id: &TaskId) -> Result<(), ApiError> {
        (**self).delete(session, id).await
    }
}
