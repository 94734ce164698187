//! Session model, change notifications and the shared session context.
//!
//! A [`Session`] is the authenticated user context issued by the auth
//! service. Every auth transition is published as an [`AuthEvent`] through a
//! [`SessionBroadcast`]; interested owners hold a [`Subscription`] for as long
//! as they care and release it by consuming it.
//!
//! [`SessionContext`] is the one place the current session lives while a view
//! is open. The session guard writes to it, the task store reads from it.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CAPACITY: usize = 16;

/// Authenticated user as reported by the auth service.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// Email when known, the user id otherwise.
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// True when the access token is expired or will be within `margin`.
    pub fn expires_within(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.expires_at - margin <= now
    }
}

// Tokens stay out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEventKind {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// One auth transition together with the session that resulted from it.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub session: Option<Session>,
}

impl AuthEvent {
    pub fn signed_in(session: Session) -> Self {
        Self {
            kind: AuthEventKind::SignedIn,
            session: Some(session),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            kind: AuthEventKind::SignedOut,
            session: None,
        }
    }

    pub fn token_refreshed(session: Session) -> Self {
        Self {
            kind: AuthEventKind::TokenRefreshed,
            session: Some(session),
        }
    }
}

/// Publisher side of session-change notifications.
#[derive(Debug)]
pub struct SessionBroadcast {
    sender: broadcast::Sender<AuthEvent>,
    next_id: AtomicU64,
}

impl Default for SessionBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBroadcast {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            sender,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let receiver = self.sender.subscribe();
        tracing::debug!(subscription = id, subscribers = self.subscriber_count(), "session subscription opened");
        Subscription { id, receiver }
    }

    /// Publishes `event` to every live subscription. Having none is fine.
    pub fn emit(&self, event: AuthEvent) {
        tracing::debug!(kind = ?event.kind, subscribers = self.subscriber_count(), "auth event");
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Receiving end of session-change notifications.
///
/// Dropping the handle unsubscribes. [`Subscription::unsubscribe`] does the
/// same explicitly; it takes `self`, so a handle is released exactly once.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    receiver: broadcast::Receiver<AuthEvent>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Waits for the next event. `None` once the publisher is gone.
    pub async fn recv(&mut self) -> Option<AuthEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(subscription = self.id, skipped, "session subscription lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns an already queued event without waiting.
    pub fn try_recv(&mut self) -> Option<AuthEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(subscription = self.id, skipped, "session subscription lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {
        tracing::debug!(subscription = self.id, "session subscription released");
    }
}

/// Shared, explicitly owned holder of the current session.
///
/// Cloning yields another handle to the same slot.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            current: Arc::new(RwLock::new(session)),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().clone()
    }

    pub fn set(&self, session: Option<Session>) {
        *self.current.write() = session;
    }

    pub fn user_id(&self) -> Option<String> {
        self.current.read().as_ref().map(|s| s.user.id.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.read().is_some()
    }
}
