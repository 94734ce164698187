//! Interactive task board.
//!
//! The board is the long-lived owner of the session guard. Each turn it
//! re-validates the session (picking up refreshes and external sign-outs),
//! reacts to the guard's signals, renders the list and asks for the next
//! action. The guard's subscription is torn down when the board exits.

use super::Workspace;
use crate::{
    api::{auth::GoTrueAuth, rest::RestTaskBackend},
    libs::{
        guard::{GuardPhase, GuardSignal, SessionGuard},
        messages::Message,
        notifier::ConsoleNotifier,
        store::TaskStore,
        task::TaskId,
        view::{ItemIntent, TaskItemView, View},
    },
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

type Store = TaskStore<RestTaskBackend, ConsoleNotifier>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add,
    Toggle,
    Delete,
    Refresh,
    SignOut,
    Quit,
}

impl Action {
    const ALL: [Action; 6] = [Action::Add, Action::Toggle, Action::Delete, Action::Refresh, Action::SignOut, Action::Quit];

    fn message(self) -> Message {
        match self {
            Action::Add => Message::BoardActionAdd,
            Action::Toggle => Message::BoardActionToggle,
            Action::Delete => Message::BoardActionDelete,
            Action::Refresh => Message::BoardActionRefresh,
            Action::SignOut => Message::BoardActionSignOut,
            Action::Quit => Message::BoardActionQuit,
        }
    }
}

pub async fn cmd() -> Result<()> {
    let workspace = Workspace::open()?;
    msg_print!(Message::Loading);
    let mut guard = workspace.guard().await;

    let result = run(&workspace.store, &mut guard).await;
    guard.teardown();
    result
}

async fn run(store: &Store, guard: &mut SessionGuard<'_, GoTrueAuth, ConsoleNotifier>) -> Result<()> {
    let mut had_session = false;
    loop {
        for signal in guard.revalidate().await {
            match signal {
                GuardSignal::NavigateToSignIn => store.clear(),
                GuardSignal::Ready(_) => {
                    had_session = true;
                    let _ = store.load().await;
                }
            }
        }
        if guard.phase() == GuardPhase::Redirecting {
            if had_session {
                msg_warning!(Message::SessionExpired);
            }
            msg_warning!(Message::SignInRequired);
            return Ok(());
        }

        render(store);

        let items: Vec<String> = Action::ALL.iter().map(|action| action.message().to_string()).collect();
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectAction.to_string())
            .items(&items)
            .default(0)
            .interact_opt()?;

        match selection.and_then(|index| Action::ALL.get(index).copied()).unwrap_or(Action::Quit) {
            Action::Add => add(store).await?,
            Action::Toggle => {
                if let Some([ItemIntent::Toggle(id), _]) = pick(store)? {
                    let _ = store.toggle(&id).await;
                }
            }
            Action::Delete => {
                if let Some([_, ItemIntent::Delete(id)]) = pick(store)? {
                    delete(store, &id).await?;
                }
            }
            Action::Refresh => {
                let _ = store.load().await;
            }
            Action::SignOut => {
                if guard.sign_out().await.is_ok() {
                    msg_success!(Message::SignedOut);
                }
                store.clear();
                return Ok(());
            }
            Action::Quit => return Ok(()),
        }
    }
}

fn render(store: &Store) {
    if let Some(session) = store.context().current() {
        msg_info!(Message::SignedInAs(session.user.display_name().to_string()));
    }
    View::tasks(&store.tasks());
}

async fn add(store: &Store) -> Result<()> {
    let text: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptNewTask.to_string())
        .allow_empty(true)
        .interact_text()?;
    let _ = store.add(&text).await;
    Ok(())
}

/// Lets the user pick a task and returns the intents of that item.
fn pick(store: &Store) -> Result<Option<[ItemIntent; 2]>> {
    let tasks = store.tasks();
    if tasks.is_empty() {
        msg_info!(Message::NoTasksYet);
        return Ok(None);
    }

    let items: Vec<TaskItemView> = tasks.iter().enumerate().map(|(index, task)| TaskItemView::new(task, index + 1)).collect();
    let labels: Vec<String> = items.iter().map(|item| format!("{} {}", item.checkbox(), item.label())).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptSelectTask.to_string())
        .items(&labels)
        .interact_opt()?;

    Ok(selection.and_then(|index| items.get(index)).map(TaskItemView::intents))
}

async fn delete(store: &Store, id: &TaskId) -> Result<()> {
    let Some(task) = store.get(id) else {
        return Ok(());
    };
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::ConfirmDeleteTask(task.text).to_string())
        .default(false)
        .interact()?;

    if confirmed {
        let _ = store.delete(id).await;
    } else {
        msg_info!(Message::OperationCancelled);
    }
    Ok(())
}
