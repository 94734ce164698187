//! Core library modules for the todoer application.
//!
//! ## Features
//!
//! - **Core Infrastructure**: Configuration, data storage, messaging
//! - **Session Handling**: Session model, subscription handles, the session guard
//! - **Task Management**: Task records, the reconciling task store, error taxonomy
//! - **User Interface**: Notifications and list/item views
//! - **Secure Storage**: Encrypted session vault
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todoer::libs::session::SessionContext;
//! use todoer::libs::store::TaskStore;
//!
//! # async fn run(backend: todoer::api::rest::RestTaskBackend) -> anyhow::Result<()> {
//! let context = SessionContext::default();
//! let store = TaskStore::new(backend, todoer::libs::notifier::ConsoleNotifier, context);
//! store.load().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data_storage;
pub mod error;
pub mod guard;
pub mod messages;
pub mod notifier;
pub mod secret;
pub mod session;
pub mod store;
pub mod task;
pub mod view;
