//! Command-line interface.
//!
//! One-shot commands (`list`, `add`, `toggle`, `delete`) all follow the same
//! path: the session guard settles the session, the task store loads the
//! user's tasks, then the single operation runs. `board` keeps the guard
//! alive for an interactive session.

pub mod add;
pub mod board;
pub mod delete;
pub mod init;
pub mod list;
pub mod login;
pub mod logout;
pub mod toggle;

use crate::{
    api::{auth::GoTrueAuth, rest::RestTaskBackend},
    libs::{
        config::Config,
        guard::{GuardSignal, SessionGuard},
        messages::Message,
        notifier::ConsoleNotifier,
        session::SessionContext,
        store::TaskStore,
    },
    msg_debug, msg_warning,
};
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configure the backend connection")]
    Init,
    #[command(about = "Sign in with email and password")]
    Login(login::LoginArgs),
    #[command(about = "Sign out and forget the stored session")]
    Logout,
    #[command(about = "Show your tasks")]
    List,
    #[command(about = "Add a task")]
    Add(add::AddArgs),
    #[command(about = "Mark a task completed or active again")]
    Toggle(toggle::ToggleArgs),
    #[command(about = "Delete a task")]
    Delete(delete::DeleteArgs),
    #[command(about = "Interactive task board")]
    Board,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init => init::cmd(),
            Commands::Login(args) => login::cmd(args).await,
            Commands::Logout => logout::cmd().await,
            Commands::List => list::cmd().await,
            Commands::Add(args) => add::cmd(args).await,
            Commands::Toggle(args) => toggle::cmd(args).await,
            Commands::Delete(args) => delete::cmd(args).await,
            Commands::Board => board::cmd().await,
        }
    }
}

/// The production collaborators wired together for one command.
pub(crate) struct Workspace {
    pub auth: GoTrueAuth,
    pub notifier: ConsoleNotifier,
    pub store: TaskStore<RestTaskBackend, ConsoleNotifier>,
}

impl Workspace {
    pub fn open() -> Result<Self> {
        let backend = Config::read()?.with_env().backend()?;
        let notifier = ConsoleNotifier;
        Ok(Self {
            auth: GoTrueAuth::new(&backend),
            notifier,
            store: TaskStore::new(RestTaskBackend::new(&backend), notifier, SessionContext::default()),
        })
    }

    pub async fn guard(&self) -> SessionGuard<'_, GoTrueAuth, ConsoleNotifier> {
        SessionGuard::start(&self.auth, &self.notifier, self.store.context().clone()).await
    }

    /// Settles the session and loads the tasks.
    ///
    /// Returns `false` when there is nobody signed in or loading failed; the
    /// user has been told either way.
    pub async fn ready(&self) -> bool {
        let mut guard = self.guard().await;
        let signal = guard.next_signal().await;
        guard.teardown();

        match signal {
            Some(GuardSignal::Ready(session)) => {
                msg_debug!(format!("loading tasks of user {}", session.user.id));
                self.store.load().await.is_ok()
            }
            _ => {
                msg_warning!(Message::SignInRequired);
                false
            }
        }
    }
}
