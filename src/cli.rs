//! Command-line options.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use crate::api::{AccountApi, AccountId, HttpAccountApi, MemoryAccountApi};
use crate::app::config_file_default_path;
use crate::error::ApiError;

#[derive(Debug, Parser)]
#[command(
    name = "account-admin",
    about = "View, update and delete one user account through the admin API",
    version
)]
pub struct Cli {
    /// Id of the account to open
    pub account: String,

    /// Base URL of the admin API; accounts live under {url}/accounts/{id}
    #[arg(long, env = "ACCOUNT_ADMIN_API_URL", default_value = "http://localhost:8080/api")]
    pub api_url: String,

    /// Bearer token sent with every request
    #[arg(long, env = "ACCOUNT_ADMIN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Use a built-in in-memory backend with a sample account (id 1)
    #[arg(long)]
    pub demo: bool,

    /// Theme file, created with defaults when missing
    /// [default: $XDG_CONFIG_HOME/account-admin/theme.conf]
    #[arg(long)]
    pub theme: Option<String>,

    /// Keybindings file, created with defaults when missing
    /// [default: $XDG_CONFIG_HOME/account-admin/keybinds.conf]
    #[arg(long)]
    pub keymap: Option<String>,

    /// Where log output goes while the terminal is in raw mode
    #[arg(long, env = "ACCOUNT_ADMIN_LOG", default_value = "account-admin.log")]
    pub log_file: PathBuf,
}

impl Cli {
    pub fn account_id(&self) -> AccountId {
        AccountId::new(self.account.trim())
    }

    pub fn theme_path(&self) -> String {
        self.theme
            .clone()
            .unwrap_or_else(|| config_file_default_path("theme.conf"))
    }

    pub fn keymap_path(&self) -> String {
        self.keymap
            .clone()
            .unwrap_or_else(|| config_file_default_path("keybinds.conf"))
    }

    /// Backend selected by `--demo` / `--api-url`.
    pub fn build_api(&self) -> Result<Arc<dyn AccountApi>, ApiError> {
        if self.demo {
            return Ok(Arc::new(MemoryAccountApi::demo()));
        }
        let api = HttpAccountApi::new(
            &self.api_url,
            self.token.clone(),
            Duration::from_secs(self.timeout_secs),
        )?;
        Ok(Arc::new(api))
    }
}
