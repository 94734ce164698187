#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskAdded,
    TaskDeleted,
    TasksLoadFailed,
    TaskAddFailed,
    TaskUpdateFailed,
    TaskDeleteFailed,
    TaskMarkedCompleted(String), // task text
    TaskMarkedActive(String),    // task text
    TaskNotFound(String),        // reference given by the user
    TaskTextEmpty,
    NoTasksYet,
    TasksSummaryEmpty,
    TasksSummary {
        completed: usize,
        total: usize,
    },
    ActiveSection(usize),    // count
    CompletedSection(usize), // count

    // === SESSION MESSAGES ===
    Loading,
    AuthUnavailable,
    SignInRequired,
    SignedInAs(String), // email or user id
    SignedOut,
    SignInFailed(String), // service message
    SessionExpired,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleBackend,
    BackendNotConfigured,

    // === BOARD ACTIONS ===
    BoardActionAdd,
    BoardActionToggle,
    BoardActionDelete,
    BoardActionRefresh,
    BoardActionSignOut,
    BoardActionQuit,

    // === PROMPTS ===
    PromptApiUrl,
    PromptAnonKey,
    PromptTable,
    PromptEmail,
    PromptPassword,
    PromptNewTask,
    PromptSelectAction,
    PromptSelectTask,
    ConfirmDeleteTask(String), // task text

    // === GENERAL MESSAGES ===
    OperationCancelled,
}
