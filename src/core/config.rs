//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.parley/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options, and
//! the bundled icons are installed into `~/.parley/theme/` where the default
//! theme directory looks for them.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::contacts::Contact;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub loopback: LoopbackConfig,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub conversations: Vec<ConversationEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub account: Option<String>,
    pub nickname: Option<String>,
    pub personal_message: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ThemeConfig {
    /// Directory holding the icon files, relative to `~/.parley/` unless absolute.
    pub dir: Option<String>,
    pub user: Option<String>,
    pub users: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoopbackConfig {
    pub reply_delay_ms: Option<u64>,
}

/// A conversation opened at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConversationEntry {
    pub members: Vec<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ACCOUNT: &str = "me@localhost";
pub const DEFAULT_NICKNAME: &str = "me";
pub const DEFAULT_REPLY_DELAY_MS: u64 = 600;
pub const DEFAULT_THEME_DIR: &str = "theme";
pub const DEFAULT_USER_ICON: &str = "user.txt";
pub const DEFAULT_USERS_ICON: &str = "users.txt";
pub const DEFAULT_LOGO: &str = "logo.txt";

/// Icons compiled into the binary, by file name.
const BUNDLED_ICONS: [(&str, &str); 3] = [
    (DEFAULT_USER_ICON, include_str!("../../theme/user.txt")),
    (DEFAULT_USERS_ICON, include_str!("../../theme/users.txt")),
    (DEFAULT_LOGO, include_str!("../../theme/logo.txt")),
];

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

/// Resource paths for the icons the conversation window shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Single contact icon (header in 1:1 chats).
    pub user: PathBuf,
    /// Group icon (header in group chats).
    pub users: PathBuf,
    /// Avatar placeholder.
    pub logo: PathBuf,
}

impl Theme {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            user: dir.join(DEFAULT_USER_ICON),
            users: dir.join(DEFAULT_USERS_ICON),
            logo: dir.join(DEFAULT_LOGO),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub me: Contact,
    pub theme: Theme,
    pub reply_delay: Duration,
    pub contacts: Vec<Contact>,
    pub conversations: Vec<ConversationEntry>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.parley/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".parley"))
}

/// Returns the path to `~/.parley/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `path`, or from `~/.parley/config.toml` when `None`.
///
/// If the default file doesn't exist, generates a commented-out default and
/// returns `ParleyConfig::default()`. An explicit path that doesn't exist is
/// an I/O error. A malformed file returns `ConfigError::Parse`.
pub fn load_config(path: Option<&Path>) -> Result<ParleyConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) => {
                if !p.exists() {
                    info!("No config file found, generating default at {}", p.display());
                    generate_default_config(&p);
                    return Ok(ParleyConfig::default());
                }
                p
            }
            None => {
                warn!("Could not determine home directory, using default config");
                return Ok(ParleyConfig::default());
            }
        },
    };

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<ParleyConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Parley Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# account = "me@localhost"           # Or set PARLEY_ACCOUNT env var
# nickname = "me"                    # Or set PARLEY_NICKNAME env var / --nickname
# personal_message = "around"

# [theme]
# dir = "theme"                      # Relative to ~/.parley/ (or PARLEY_THEME_DIR)
#                                    # The bundled icons were installed in ~/.parley/theme/
# user = "user.txt"                  # ASCII-art icons; missing files show a placeholder
# users = "users.txt"
# logo = "logo.txt"

# [loopback]
# reply_delay_ms = 600

# [[contacts]]
# account = "ana@example.com"
# display_name = "Ana"
# message = "out for lunch"

# [[conversations]]
# members = ["ana@example.com"]
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }

    let Some(parent) = path.parent() else {
        return;
    };
    let theme_dir = parent.join(DEFAULT_THEME_DIR);
    match install_default_theme(&theme_dir) {
        Ok(written) => info!("Installed {} icon(s) into {}", written, theme_dir.display()),
        Err(e) => warn!("Failed to install default theme: {}", e),
    }
}

/// Write the bundled icons into `dir`, keeping any file already there.
/// Returns how many were written.
pub fn install_default_theme(dir: &Path) -> std::io::Result<usize> {
    fs::create_dir_all(dir)?;
    let mut written = 0;
    for (name, art) in BUNDLED_ICONS {
        let path = dir.join(name);
        if !path.exists() {
            fs::write(&path, art)?;
            written += 1;
        }
    }
    Ok(written)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_nickname` is from the `--nickname` flag (None = not specified).
pub fn resolve(config: &ParleyConfig, cli_nickname: Option<&str>) -> ResolvedConfig {
    // Account: env → config → default
    let account = std::env::var("PARLEY_ACCOUNT")
        .ok()
        .or_else(|| config.general.account.clone())
        .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string());

    // Nickname: CLI → env → config → default
    let nickname = cli_nickname
        .map(|s| s.to_string())
        .or_else(|| std::env::var("PARLEY_NICKNAME").ok())
        .or_else(|| config.general.nickname.clone())
        .unwrap_or_else(|| DEFAULT_NICKNAME.to_string());

    let personal_message = config.general.personal_message.clone().unwrap_or_default();

    ResolvedConfig {
        me: Contact::new(account, nickname, personal_message),
        theme: resolve_theme(&config.theme),
        reply_delay: Duration::from_millis(
            config
                .loopback
                .reply_delay_ms
                .unwrap_or(DEFAULT_REPLY_DELAY_MS),
        ),
        contacts: config.contacts.clone(),
        conversations: config.conversations.clone(),
    }
}

/// Theme directory: env → config → default, relative paths anchored at `~/.parley/`.
fn resolve_theme(theme: &ThemeConfig) -> Theme {
    let dir = std::env::var("PARLEY_THEME_DIR")
        .ok()
        .or_else(|| theme.dir.clone())
        .unwrap_or_else(|| DEFAULT_THEME_DIR.to_string());
    let dir = PathBuf::from(dir);
    let dir = if dir.is_absolute() {
        dir
    } else {
        config_dir().map(|base| base.join(&dir)).unwrap_or(dir)
    };

    let icon = |name: &Option<String>, default: &str| {
        dir.join(name.as_deref().unwrap_or(default))
    };

    Theme {
        user: icon(&theme.user, DEFAULT_USER_ICON),
        users: icon(&theme.users, DEFAULT_USERS_ICON),
        logo: icon(&theme.logo, DEFAULT_LOGO),
    }
}
