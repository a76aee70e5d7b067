use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the current directory
pub const LOCAL_CONFIG: &str = "release.toml";

/// Configuration for git-release.
///
/// Every key is optional; an absent file yields the defaults.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Editor command, taking precedence over `$EDITOR`
    #[serde(default)]
    pub editor: Option<String>,

    /// Program used for version-control operations
    #[serde(default = "default_git")]
    pub git: String,

    /// Let git reopen the assembled tag message for a final edit
    #[serde(default = "default_amend")]
    pub amend_tag_message: bool,
}

fn default_git() -> String {
    "git".to_string()
}

fn default_amend() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            editor: None,
            git: default_git(),
            amend_tag_message: default_amend(),
        }
    }
}

impl Config {
    /// Pick the editor: config file first, then the `$EDITOR` value passed in
    ///
    /// Empty strings count as unset. `None` means no editor is configured.
    pub fn resolve_editor(&self, env_editor: Option<String>) -> Option<String> {
        self.editor
            .clone()
            .filter(|e| !e.trim().is_empty())
            .or_else(|| env_editor.filter(|e| !e.trim().is_empty()))
    }
}

/// Location of the per-user configuration file, if the platform has one
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("git-release").join("config.toml"))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in current directory
/// 3. `git-release/config.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = if let Some(path) = config_path {
        PathBuf::from(path)
    } else if Path::new(LOCAL_CONFIG).exists() {
        PathBuf::from(LOCAL_CONFIG)
    } else {
        match user_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                log::debug!("no configuration file found, using defaults");
                return Ok(Config::default());
            }
        }
    };

    log::debug!("loading configuration from {}", path.display());
    let config_str = fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
