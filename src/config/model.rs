//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a sensible default so the application works out of the box.

use serde::{Deserialize, Serialize};

use super::nickname::generate_nickname;
use crate::alias::CommandAlias;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    /// User-defined slash commands; they replace built-ins of the same name.
    #[serde(default)]
    pub aliases: Vec<CommandAlias>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            ui: UiConfig::default(),
            chat: ChatConfig::default(),
            aliases: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_servers() -> Vec<ServerConfig> {
    let nick = generate_nickname();
    let mut libera = ServerConfig::new("libera", "irc.libera.chat", &nick);
    libera.channels = vec!["#chatdeck".into()];
    libera.auto_connect = true;
    vec![
        libera,
        ServerConfig::new("oftc", "irc.oftc.net", &nick),
        ServerConfig::new("efnet", "irc.efnet.org", &nick),
    ]
}

/// Configuration for a single IRC server connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// User-facing label (e.g. `"libera"`).
    pub name: String,
    /// Hostname or IP address of the IRC server.
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub tls: bool,
    #[serde(default = "default_nickname")]
    pub nickname: String,
    #[serde(default)]
    pub alt_nicks: Vec<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub realname: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub nick_password: Option<String>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub auto_connect: bool,
    #[serde(default)]
    pub quit_message: Option<String>,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl ServerConfig {
    pub fn new(name: &str, host: &str, nickname: &str) -> Self {
        Self {
            name: name.to_string(),
            host: host.to_string(),
            port: default_port(),
            tls: true,
            nickname: nickname.to_string(),
            alt_nicks: Vec::new(),
            username: None,
            realname: None,
            password: None,
            nick_password: None,
            channels: Vec::new(),
            auto_connect: false,
            quit_message: None,
            accept_invalid_certs: false,
        }
    }
}

/// UI appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default = "default_max_scrollback")]
    pub max_scrollback: usize,
    #[serde(default = "default_true")]
    pub parse_mirc_colors: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
            max_scrollback: default_max_scrollback(),
            parse_mirc_colors: true,
        }
    }
}

/// When the tab strip is merged into the toolbar row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompactMode {
    Always,
    #[default]
    Auto,
    Never,
}

impl CompactMode {
    pub fn next(self) -> Self {
        match self {
            CompactMode::Always => CompactMode::Auto,
            CompactMode::Auto => CompactMode::Never,
            CompactMode::Never => CompactMode::Always,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompactMode::Always => "always",
            CompactMode::Auto => "auto",
            CompactMode::Never => "never",
        }
    }
}

/// Chat screen preferences. Heights are terminal rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub appbar_compact_mode: CompactMode,
    #[serde(default)]
    pub nick_autocomplete_show_button: bool,
    #[serde(default)]
    pub nick_autocomplete_double_tap: bool,
    #[serde(default = "default_compact_toolbar_height")]
    pub compact_toolbar_height: u16,
    #[serde(default = "default_collapse_toolbar_height")]
    pub collapse_toolbar_height: u16,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            appbar_compact_mode: CompactMode::default(),
            nick_autocomplete_show_button: false,
            nick_autocomplete_double_tap: false,
            compact_toolbar_height: default_compact_toolbar_height(),
            collapse_toolbar_height: default_collapse_toolbar_height(),
        }
    }
}

/// Diagnostic log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Overrides the default log file location.
    #[serde(default)]
    pub file: Option<std::path::PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_nickname() -> String {
    generate_nickname()
}
fn default_port() -> u16 {
    6697
}
fn default_true() -> bool {
    true
}
fn default_timestamp_format() -> String {
    "%H:%M".to_string()
}
fn default_max_scrollback() -> usize {
    10000
}
fn default_compact_toolbar_height() -> u16 {
    30
}
fn default_collapse_toolbar_height() -> u16 {
    12
}
fn default_log_level() -> String {
    "info".to_string()
}
