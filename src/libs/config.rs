//! Configuration management for the todoer application.
//!
//! The only thing todoer needs to know is where its backend lives: the
//! project URL, the project's public anon key and the name of the tasks
//! table. These come from a JSON file in the application data directory and
//! can be overridden by environment variables (a `.env` file is honoured).
//!
//! ## Sources, lowest to highest priority
//!
//! 1. `config.json` in the data directory
//! 2. `.env` in the working directory
//! 3. `TODOER_API_URL`, `TODOER_ANON_KEY`, `TODOER_TABLE`
//!
//! ## File Location
//!
//! - **Windows**: `%LOCALAPPDATA%\todoer\config.json`
//! - **macOS**: `~/Library/Application Support/todoer/config.json`
//! - **Linux**: `~/.local/share/todoer/config.json`
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use todoer::libs::config::Config;
//!
//! # fn main() -> anyhow::Result<()> {
//! let backend = Config::read()?.with_env().backend()?;
//! println!("tasks live in {}", backend.table);
//! # Ok(())
//! # }
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_print};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const ENV_API_URL: &str = "TODOER_API_URL";
pub const ENV_ANON_KEY: &str = "TODOER_ANON_KEY";
pub const ENV_TABLE: &str = "TODOER_TABLE";

/// Table used when none is configured.
pub const DEFAULT_TABLE: &str = "tasks";

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

/// Connection settings for the hosted backend.
///
/// One project provides both the auth service (`/auth/v1`) and the REST
/// endpoint for the tasks table (`/rest/v1`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub api_url: String,

    /// Public anon key sent as the `apikey` header on every request.
    ///
    /// The key is not a secret; row level security on the server is what
    /// keeps users apart.
    pub anon_key: String,

    /// Relation holding the task rows.
    #[serde(default = "default_table")]
    pub table: String,
}

impl BackendConfig {
    pub fn new(api_url: &str, anon_key: &str) -> Self {
        BackendConfig {
            api_url: api_url.to_string(),
            anon_key: anon_key.to_string(),
            table: default_table(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.api_url.trim().is_empty() && !self.anon_key.trim().is_empty() && !self.table.trim().is_empty()
    }
}

/// Main configuration container.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// Backend connection settings; absent until `todoer init` ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendConfig>,
}

impl Config {
    /// Reads configuration from the application data directory.
    ///
    /// A missing file yields the default configuration; a corrupted file is
    /// an error.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Saves the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Applies `.env` and process environment overrides.
    pub fn with_env(self) -> Self {
        let _ = dotenv::dotenv();
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup, one key per `TODOER_*` variable.
    ///
    /// Empty values are ignored. A backend section is created when the URL or
    /// the key is provided and none existed.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let api_url = lookup(ENV_API_URL);
        let anon_key = lookup(ENV_ANON_KEY);
        let table = lookup(ENV_TABLE);

        if self.backend.is_none() && (api_url.is_some() || anon_key.is_some()) {
            self.backend = Some(BackendConfig::new("", ""));
        }
        if let Some(backend) = self.backend.as_mut() {
            if let Some(api_url) = api_url {
                backend.api_url = api_url;
            }
            if let Some(anon_key) = anon_key {
                backend.anon_key = anon_key;
            }
            if let Some(table) = table {
                backend.table = table;
            }
        }
        self
    }

    /// The backend settings, or an error telling the user how to provide them.
    pub fn backend(&self) -> Result<BackendConfig> {
        match &self.backend {
            Some(backend) if backend.is_complete() => Ok(backend.clone()),
            _ => msg_bail_anyhow!(Message::BackendNotConfigured),
        }
    }

    /// Runs the interactive setup wizard, pre-filled with the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let default = config.backend.clone().unwrap_or_else(|| BackendConfig::new("", ""));

        msg_print!(Message::ConfigModuleBackend);
        config.backend = Some(BackendConfig {
            api_url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptApiUrl.to_string())
                .default(default.api_url)
                .interact_text()?,
            anon_key: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptAnonKey.to_string())
                .default(default.anon_key)
                .interact_text()?,
            table: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptTable.to_string())
                .default(default.table)
                .interact_text()?,
        });

        Ok(config)
    }
}
