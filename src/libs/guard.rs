//! Session guard: decides whether the task list may load.
//!
//! The guard owns the view's subscription to session changes and keeps the
//! shared [`SessionContext`] current. It turns the stream of observations
//! into two signals:
//!
//! - [`GuardSignal::NavigateToSignIn`] once per transition to "no session"
//! - [`GuardSignal::Ready`] once per transition to a session (or to a
//!   different user), which is the cue for the task store to load
//!
//! ## Startup
//!
//! ```text
//!  start()
//!    │
//!    ├─ subscribe to session changes   (pushes queue up from here on)
//!    │
//!    └─ fetch current session          (initial determination)
//!            │                          pushes are applied while it runs
//!            │
//!            ▼
//!    Loading ──► Active        session found
//!       │
//!       └─────► Redirecting    no session
//! ```
//!
//! Pushes and the initial fetch may arrive in either order; the first one
//! that sees no session triggers navigation and later ones are suppressed.
//! The phase stays [`GuardPhase::Loading`] until the initial fetch resolved,
//! whatever the pushes said. A stalled fetch therefore never holds back
//! navigation, only the end of loading.
//!
//! ## Teardown
//!
//! [`SessionGuard::teardown`] releases the subscription. Dropping the guard
//! does the same, so it is released exactly once either way.

use crate::api::AuthClient;
use crate::libs::error::TaskError;
use crate::libs::notifier::Notifier;
use crate::libs::session::{AuthEvent, Session, SessionContext, Subscription};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;

#[derive(Debug, Clone, PartialEq)]
pub enum GuardSignal {
    NavigateToSignIn,
    Ready(Session),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardPhase {
    /// Waiting for the initial session fetch.
    Loading,
    /// No session; the view should be on its way to sign-in.
    Redirecting,
    /// A session exists and the list may be shown.
    Active,
}

/// Where an observation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    InitialFetch,
    Push,
}

/// Pure transition logic of the guard, independent of any I/O.
#[derive(Debug, Clone, Default)]
pub struct GuardState {
    initial_resolved: bool,
    redirected: bool,
    ready_for: Option<String>,
    current: Option<Session>,
}

impl GuardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one observation of the session and returns the signal it causes.
    pub fn observe(&mut self, session: Option<&Session>, source: Observation) -> Option<GuardSignal> {
        if source == Observation::InitialFetch {
            self.initial_resolved = true;
        }
        self.current = session.cloned();

        match session {
            None => {
                self.ready_for = None;
                if self.redirected {
                    return None;
                }
                self.redirected = true;
                Some(GuardSignal::NavigateToSignIn)
            }
            Some(session) => {
                self.redirected = false;
                if self.ready_for.as_deref() == Some(session.user_id()) {
                    // same user, e.g. a refreshed token
                    return None;
                }
                self.ready_for = Some(session.user_id().to_string());
                Some(GuardSignal::Ready(session.clone()))
            }
        }
    }

    pub fn phase(&self) -> GuardPhase {
        if !self.initial_resolved {
            GuardPhase::Loading
        } else if self.redirected {
            GuardPhase::Redirecting
        } else {
            GuardPhase::Active
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == GuardPhase::Loading
    }

    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }
}

type InitialFetch<'a> = Pin<Box<dyn Future<Output = Option<Session>> + 'a>>;

/// What woke the guard up.
enum Wakeup {
    Fetched(Option<Session>),
    Pushed(Option<AuthEvent>),
}

pub struct SessionGuard<'a, A: AuthClient, N: Notifier> {
    auth: &'a A,
    notifier: &'a N,
    context: SessionContext,
    subscription: Option<Subscription>,
    initial: Option<InitialFetch<'a>>,
    state: GuardState,
    pending: VecDeque<GuardSignal>,
}

impl<'a, A: AuthClient, N: Notifier> SessionGuard<'a, A, N> {
    /// Subscribes to session changes and starts the initial fetch.
    ///
    /// Returns once the fetch resolved or a push already produced a signal;
    /// in the latter case the fetch keeps running and the guard stays
    /// loading until it resolves. A failing fetch is reported as
    /// [`TaskError::AuthUnavailable`] and treated as "no session".
    pub async fn start(auth: &'a A, notifier: &'a N, context: SessionContext) -> Self {
        let subscription = auth.on_session_change();
        let mut guard = Self {
            auth,
            notifier,
            context,
            subscription: Some(subscription),
            initial: Some(Box::pin(Self::fetch(auth, notifier))),
            state: GuardState::new(),
            pending: VecDeque::new(),
        };
        while guard.initial.is_some() && guard.pending.is_empty() {
            guard.wait().await;
        }
        guard
    }

    async fn fetch(auth: &'a A, notifier: &'a N) -> Option<Session> {
        match auth.current_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "session lookup failed");
                let error = TaskError::AuthUnavailable(e);
                notifier.error(error.message());
                None
            }
        }
    }

    /// Waits for the pending initial fetch or the next push, whichever
    /// comes first, and applies it. Returns `false` when there is nothing
    /// left to wait for.
    async fn wait(&mut self) -> bool {
        let wakeup = match (self.initial.as_mut(), self.subscription.as_mut()) {
            (Some(initial), Some(subscription)) => tokio::select! {
                session = initial.as_mut() => Wakeup::Fetched(session),
                event = subscription.recv() => Wakeup::Pushed(event),
            },
            (Some(initial), None) => Wakeup::Fetched(initial.as_mut().await),
            (None, Some(subscription)) => Wakeup::Pushed(subscription.recv().await),
            (None, None) => return false,
        };

        match wakeup {
            Wakeup::Fetched(session) => {
                self.initial = None;
                self.apply(session.as_ref(), Observation::InitialFetch);
                true
            }
            Wakeup::Pushed(Some(event)) => {
                self.apply(event.session.as_ref(), Observation::Push);
                true
            }
            Wakeup::Pushed(None) => {
                // the broadcast closed
                self.release();
                self.initial.is_some()
            }
        }
    }

    /// Lets the initial fetch resolve, applying pushes seen meanwhile.
    async fn settle(&mut self) {
        while self.initial.is_some() {
            self.wait().await;
        }
    }

    fn apply(&mut self, session: Option<&Session>, source: Observation) {
        self.context.set(session.cloned());
        if let Some(signal) = self.state.observe(session, source) {
            tracing::debug!(
                ?source,
                signal = signal_name(&signal),
                user = ?self.context.user_id(),
                "session guard signal"
            );
            self.pending.push_back(signal);
        }
    }

    /// Next signal, waiting for session changes if none is queued.
    ///
    /// Returns `None` once the subscription is gone.
    pub async fn next_signal(&mut self) -> Option<GuardSignal> {
        loop {
            if let Some(signal) = self.pending.pop_front() {
                return Some(signal);
            }
            if !self.wait().await {
                return None;
            }
        }
    }

    fn drain_events(&mut self) {
        while let Some(event) = self.subscription.as_mut().and_then(|s| s.try_recv()) {
            self.apply(event.session.as_ref(), Observation::Push);
        }
    }

    /// Applies every already delivered session change without waiting.
    pub fn poll_signals(&mut self) -> Vec<GuardSignal> {
        self.drain_events();
        self.pending.drain(..).collect()
    }

    /// Looks the session up again, e.g. to pick up a refresh or an expiry.
    ///
    /// While the initial fetch is still pending, its result is the lookup.
    pub async fn revalidate(&mut self) -> Vec<GuardSignal> {
        self.drain_events();
        if self.initial.is_some() {
            self.settle().await;
        } else {
            let session = Self::fetch(self.auth, self.notifier).await;
            self.apply(session.as_ref(), Observation::Push);
        }
        self.poll_signals()
    }

    pub async fn sign_out(&mut self) -> Result<(), TaskError> {
        self.settle().await;
        let result = self.auth.sign_out().await.map_err(TaskError::AuthUnavailable);
        if let Err(e) = &result {
            self.notifier.error(e.message());
        }
        // signed out locally either way
        self.apply(None, Observation::Push);
        result
    }

    pub fn phase(&self) -> GuardPhase {
        self.state.phase()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn session(&self) -> Option<&Session> {
        self.state.session()
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn teardown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl<A: AuthClient, N: Notifier> Drop for SessionGuard<'_, A, N> {
    fn drop(&mut self) {
        self.release();
    }
}

fn signal_name(signal: &GuardSignal) -> &'static str {
    match signal {
        GuardSignal::NavigateToSignIn => "navigate_to_sign_in",
        GuardSignal::Ready(_) => "ready",
    }
}
