//! The task store: local cache of the signed-in user's tasks.
//!
//! Every operation is a single round trip to the [`TaskBackend`]. The local
//! collection is only touched after the backend confirmed the change, so a
//! failed call leaves it exactly as it was and there is nothing to roll back.
//!
//! ## Reconciliation Rules
//!
//! | operation | on success                               | on failure              |
//! |-----------|------------------------------------------|-------------------------|
//! | load      | replace everything with the fetched rows | empty collection        |
//! | add       | prepend the returned row                 | unchanged               |
//! | toggle    | set `completed` on that one record       | unchanged               |
//! | delete    | remove the record                        | unchanged               |
//!
//! Failures are reported through the [`Notifier`] and returned as a
//! [`TaskError`]. Without a session in the [`SessionContext`] nothing is sent
//! and [`TaskError::NoSession`] is returned.
//!
//! ## Concurrency
//!
//! Operations take `&self` and may interleave on one task. The collection
//! lock is never held across an await; two toggles of the same record send
//! two updates and whichever response arrives last decides the local flag.

use crate::api::{ApiError, TaskBackend};
use crate::libs::error::TaskError;
use crate::libs::messages::Message;
use crate::libs::notifier::Notifier;
use crate::libs::session::{Session, SessionContext};
use crate::libs::task::{NewTaskRow, Task, TaskId};
use parking_lot::Mutex;

pub struct TaskStore<B, N> {
    backend: B,
    notifier: N,
    context: SessionContext,
    tasks: Mutex<Vec<Task>>,
}

impl<B: TaskBackend, N: Notifier> TaskStore<B, N> {
    pub fn new(backend: B, notifier: N, context: SessionContext) -> Self {
        Self {
            backend,
            notifier,
            context,
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Snapshot of the collection, newest first.
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<Task> {
        self.tasks.lock().iter().find(|task| &task.id == id).cloned()
    }

    /// Finds a task by its id or by its 1-based position in the collection.
    pub fn resolve(&self, reference: &str) -> Option<Task> {
        let reference = reference.trim().trim_start_matches('#');
        let tasks = self.tasks.lock();
        if let Some(task) = tasks.iter().find(|task| task.id.as_str() == reference) {
            return Some(task.clone());
        }
        reference
            .parse::<usize>()
            .ok()
            .filter(|position| *position >= 1)
            .and_then(|position| tasks.get(position - 1).cloned())
    }

    /// Drops the cached tasks, e.g. when the session ended.
    pub fn clear(&self) {
        self.tasks.lock().clear();
    }

    fn session(&self) -> Result<Session, TaskError> {
        self.context.current().ok_or_else(|| {
            tracing::debug!("task operation skipped, no session");
            TaskError::NoSession
        })
    }

    /// Fetches all of the user's tasks and replaces the local collection.
    pub async fn load(&self) -> Result<Vec<Task>, TaskError> {
        let session = self.session()?;
        let fetched = self
            .backend
            .select_all(&session)
            .await
            .and_then(|rows| rows.into_iter().map(Task::try_from).collect::<Result<Vec<_>, ApiError>>());

        match fetched {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), user = %session.user.id, "tasks loaded");
                *self.tasks.lock() = tasks.clone();
                Ok(tasks)
            }
            Err(e) => {
                tracing::warn!(error = %e, "loading tasks failed");
                self.tasks.lock().clear();
                self.notifier.error(Message::TasksLoadFailed);
                Err(TaskError::LoadFailed(e))
            }
        }
    }

    /// Creates a task from `text`.
    ///
    /// Blank text is not an error: nothing is sent and `Ok(None)` is returned.
    pub async fn add(&self, text: &str) -> Result<Option<Task>, TaskError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let session = self.session()?;
        let row = NewTaskRow::new(session.user_id(), text);

        match self.backend.insert(&session, &row).await.and_then(Task::try_from) {
            Ok(task) => {
                tracing::debug!(id = %task.id, "task added");
                self.tasks.lock().insert(0, task.clone());
                self.notifier.success(Message::TaskAdded);
                Ok(Some(task))
            }
            Err(e) => {
                tracing::warn!(error = %e, "adding task failed");
                self.notifier.error(Message::TaskAddFailed);
                Err(TaskError::AddFailed(e))
            }
        }
    }

    /// Flips the completion flag of the task with `id`.
    ///
    /// The new value is decided before the request is sent. An id that is not
    /// in the collection is ignored and yields `Ok(None)`.
    pub async fn toggle(&self, id: &TaskId) -> Result<Option<Task>, TaskError> {
        let session = self.session()?;
        let Some(current) = self.get(id) else {
            tracing::debug!(%id, "toggle ignored, task not in collection");
            return Ok(None);
        };
        let completed = !current.completed;

        if let Err(e) = self.backend.update_completed(&session, id, completed).await {
            tracing::warn!(error = %e, %id, "updating task failed");
            self.notifier.error(Message::TaskUpdateFailed);
            return Err(TaskError::UpdateFailed(e));
        }

        let mut tasks = self.tasks.lock();
        let updated = tasks.iter_mut().find(|task| &task.id == id).map(|task| {
            task.completed = completed;
            task.clone()
        });
        Ok(updated)
    }

    /// Deletes the task with `id` remotely, then locally.
    pub async fn delete(&self, id: &TaskId) -> Result<(), TaskError> {
        let session = self.session()?;

        if let Err(e) = self.backend.delete(&session, id).await {
            tracing::warn!(error = %e, %id, "deleting task failed");
            self.notifier.error(Message::TaskDeleteFailed);
            return Err(TaskError::DeleteFailed(e));
        }

        self.tasks.lock().retain(|task| &task.id != id);
        self.notifier.success(Message::TaskDeleted);
        Ok(())
    }
}
