use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::form::form_model::LOGIN_FORM;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api/v1";
pub const BASE_URL_ENV: &str = "FORMS_API_URL";
pub const DEFAULT_CONFIG_FILE: &str = "forms-client.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "forms-client",
    version,
    about = "Terminal client for server-driven JSON forms"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Append a JSONL navigation trace to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,

    /// Path to config file (default: forms-client.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive session on the login form
    Run,

    /// Fetch one form definition and print it as JSON
    Fetch {
        /// Form name, e.g. users::LoginRequest
        #[arg(long)]
        form: String,

        /// Bearer credential to send
        #[arg(long)]
        token: Option<String>,
    },

    /// Print the remote method name a form is submitted under
    Method {
        /// Form name, e.g. users::LoginRequest
        name: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `forms-client.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub trace: TraceConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,

    #[serde(default = "default_login_form")]
    pub login_form: String,

    /// Request timeout; unset leaves it to the transport
    pub timeout_ms: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            login_form: LOGIN_FORM.to_string(),
            timeout_ms: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_login_form() -> String { LOGIN_FORM.to_string() }
fn default_filter() -> String { "info".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = config_path, error = %e, "malformed config, using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Resolution (CLI > config > env > defaults)
// ============================================================================

pub fn resolve_base_url(cli: Option<&str>, config: &AppConfig, env: Option<&str>) -> String {
    cli.or(config.api.base_url.as_deref())
        .or(env)
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string()
}

pub fn resolve_trace_path<'a>(cli: Option<&'a str>, config: &'a AppConfig) -> Option<&'a str> {
    cli.or(config.trace.path.as_deref())
}

/// Log filter directive: `-v` debug, `-vv` trace, otherwise the configured filter.
pub fn resolve_log_filter(verbose: u8, config: &AppConfig) -> String {
    match verbose {
        0 => config.log.filter.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}
