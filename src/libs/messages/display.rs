//! Display implementation for todoer application messages.
//!
//! All user-facing text lives here, so the notification layer, the views and
//! the prompts only ever deal in [`Message`] values.
//!
//! ## Message Categories
//!
//! - **Task Messages**: Outcome notices for load/add/toggle/delete and list labels
//! - **Session Messages**: Sign-in state, redirects and auth failures
//! - **Configuration Messages**: Setup wizard headings and missing settings
//! - **Board Actions**: Menu entries of the interactive board
//! - **Prompts**: Questions asked through dialoguer

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskAdded => "Task added!".to_string(),
            Message::TaskDeleted => "Task deleted".to_string(),
            Message::TasksLoadFailed => "Failed to load todos".to_string(),
            Message::TaskAddFailed => "Failed to add task".to_string(),
            Message::TaskUpdateFailed => "Failed to update task".to_string(),
            Message::TaskDeleteFailed => "Failed to delete task".to_string(),
            Message::TaskMarkedCompleted(text) => format!("Marked '{}' as completed", text),
            Message::TaskMarkedActive(text) => format!("Marked '{}' as active", text),
            Message::TaskNotFound(reference) => format!("No task matches '{}'", reference),
            Message::TaskTextEmpty => "Nothing to add: the task text is empty".to_string(),
            Message::NoTasksYet => "No tasks yet. Add one with `todoer add <text>`!".to_string(),
            Message::TasksSummaryEmpty => "Stay organized and productive".to_string(),
            Message::TasksSummary { completed, total } => format!("{} of {} tasks completed", completed, total),
            Message::ActiveSection(count) => format!("Active ({})", count),
            Message::CompletedSection(count) => format!("Completed ({})", count),

            // === SESSION MESSAGES ===
            Message::Loading => "Loading...".to_string(),
            Message::AuthUnavailable => "Authentication service is unavailable".to_string(),
            Message::SignInRequired => "You are not signed in. Run `todoer login` first.".to_string(),
            Message::SignedInAs(who) => format!("Signed in as {}", who),
            Message::SignedOut => "Signed out".to_string(),
            Message::SignInFailed(reason) => format!("Sign in failed: {}", reason),
            Message::SessionExpired => "Session expired".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleBackend => "Backend settings".to_string(),
            Message::BackendNotConfigured => {
                "Backend is not configured. Run `todoer init` or set TODOER_API_URL and TODOER_ANON_KEY.".to_string()
            }

            // === BOARD ACTIONS ===
            Message::BoardActionAdd => "Add a task".to_string(),
            Message::BoardActionToggle => "Toggle a task".to_string(),
            Message::BoardActionDelete => "Delete a task".to_string(),
            Message::BoardActionRefresh => "Refresh".to_string(),
            Message::BoardActionSignOut => "Sign out".to_string(),
            Message::BoardActionQuit => "Quit".to_string(),

            // === PROMPTS ===
            Message::PromptApiUrl => "Enter the project URL (e.g. https://xyz.supabase.co)".to_string(),
            Message::PromptAnonKey => "Enter the project anon key".to_string(),
            Message::PromptTable => "Enter the tasks table name".to_string(),
            Message::PromptEmail => "Email".to_string(),
            Message::PromptPassword => "Password".to_string(),
            Message::PromptNewTask => "What needs to be done?".to_string(),
            Message::PromptSelectAction => "What next?".to_string(),
            Message::PromptSelectTask => "Select a task".to_string(),
            Message::ConfirmDeleteTask(text) => format!("Delete '{}'?", text),

            // === GENERAL MESSAGES ===
            Message::OperationCancelled => "Operation cancelled".to_string(),
        };
        write!(f, "{}", text)
    }
}
