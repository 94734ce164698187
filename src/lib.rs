//! # todoer - a personal to-do list on a hosted backend
//!
//! A command-line client that signs in against a GoTrue-style auth service and
//! manages the user's tasks stored in a PostgREST-style table.
//!
//! ## Features
//!
//! - **Session Guard**: Tracks the authenticated session and decides when the list may load
//! - **Task Store**: Local cache of the user's tasks, patched only after the server confirms
//! - **Views**: Active/completed partitions rendered as terminal tables
//! - **Remote Adapters**: REST clients for the auth service and the tasks table
//! - **Session Vault**: Encrypted session persistence between invocations
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todoer::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod libs;
