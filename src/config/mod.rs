// ABOUTME: Configuration management for screen-manager
// Handles session naming defaults and the shell connection settings

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application version
    #[serde(default = "default_version")]
    pub version: String,

    /// Naming and expiry of created sessions
    #[serde(default)]
    pub session: SessionConfig,

    /// Shell connection settings
    #[serde(default)]
    pub shell: ShellConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long a created session lives, as understood by `at now + ...`
    /// (minutes/hours/days/weeks/months/years)
    #[serde(default = "default_expire_in")]
    pub expire_in: String,

    /// Owner prefix for every created session name
    #[serde(default = "default_initials")]
    pub initials: String,

    /// Session name used when none is supplied (a date suffix is added)
    #[serde(default = "default_name")]
    pub default_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expire_in: default_expire_in(),
            initials: default_initials(),
            default_name: default_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Program and arguments to connect with, e.g. ["ssh", "-t", "host"]
    /// Empty means a local `sh`.
    #[serde(default)]
    pub command: Vec<String>,

    /// Run screen through sudo
    #[serde(default = "default_true")]
    pub use_sudo: bool,

    /// Shell prompt endings that mark the end of command output
    #[serde(default = "default_prompts")]
    pub prompts: Vec<String>,

    /// Seconds to wait for expected output, 0 waits forever
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,

    /// Listing retries when the remote host asks for a password
    #[serde(default = "default_max_password_retries")]
    pub max_password_retries: u32,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            use_sudo: default_true(),
            prompts: default_prompts(),
            read_timeout_secs: default_read_timeout_secs(),
            max_password_retries: default_max_password_retries(),
        }
    }
}

impl ShellConfig {
    /// Read timeout as a duration, `None` when disabled
    pub const fn read_timeout(&self) -> Option<Duration> {
        if self.read_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.read_timeout_secs))
        }
    }

    /// Command line to spawn the shell with
    ///
    /// An ssh destination wins over the configured command, which wins over
    /// a local `sh`.
    pub fn resolve_command(&self, ssh_destination: Option<&str>) -> Result<Vec<String>> {
        if let Some(destination) = ssh_destination {
            let ssh = which::which("ssh").context("ssh not found in PATH")?;
            return Ok(vec![
                ssh.display().to_string(),
                "-t".to_string(),
                destination.to_string(),
            ]);
        }

        if !self.command.is_empty() {
            return Ok(self.command.clone());
        }

        // Plain sh keeps the prompt predictable ("$ " or "# ")
        let shell = which::which("sh").map_or_else(|_| "sh".to_string(), |p| p.display().to_string());
        Ok(vec![shell])
    }
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_expire_in() -> String {
    "7 days".to_string()
}

fn default_initials() -> String {
    "js".to_string()
}

fn default_name() -> String {
    "random".to_string()
}

fn default_prompts() -> Vec<String> {
    vec!["$ ".to_string(), "# ".to_string()]
}

const fn default_read_timeout_secs() -> u64 {
    30
}

const fn default_max_password_retries() -> u32 {
    3
}

const fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from_paths(&Self::get_config_paths())
    }

    /// Load and merge the given files, most important first
    pub fn load_from_paths(paths: &[PathBuf]) -> Result<Self> {
        let mut config = Self::default();

        // Apply least important first so more specific files win
        for path in paths.iter().rev() {
            if path.exists() {
                let (file_config, table) = Self::load_file(path)?;
                config.merge(file_config, &table);
            }
        }

        Ok(config)
    }

    /// Parse one file, keeping the raw table to tell which keys it sets
    fn load_file(path: &Path) -> Result<(Self, toml::Table)> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let table: toml::Table = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        let file_config: Self = toml::Value::Table(table.clone())
            .try_into()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok((file_config, table))
    }

    /// Save configuration to user config directory
    pub fn save(&self) -> Result<PathBuf> {
        let config_dir = Self::get_user_config_dir()?;
        self.save_to_dir(&config_dir)
    }

    /// Save configuration as `config.toml` inside `config_dir`
    pub fn save_to_dir(&self, config_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(config_dir)?;

        let config_path = config_dir.join("config.toml");
        let content = self.to_toml()?;
        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(config_path)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Get configuration file paths in order of precedence
    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        // 1. Local project config
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(".screen-manager").join("config.toml"));
        }

        // 2. User config (~/.screen-manager/config/config.toml)
        if let Ok(config_dir) = Self::get_user_config_dir() {
            paths.push(config_dir.join("config.toml"));
        }

        // 3. System config
        paths.push(PathBuf::from("/etc/screen-manager/config.toml"));

        paths
    }

    /// Get user configuration directory
    fn get_user_config_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to get home directory")?;
        let config_dir = home_dir.join(".screen-manager").join("config");
        Ok(config_dir)
    }

    /// Merge another config into this one
    ///
    /// `table` is the file `other` was parsed from; booleans only override
    /// when the file sets them, since their default is indistinguishable.
    fn merge(&mut self, other: Self, table: &toml::Table) {
        // Don't override version

        if other.session.expire_in != default_expire_in() {
            self.session.expire_in = other.session.expire_in;
        }
        if other.session.initials != default_initials() {
            self.session.initials = other.session.initials;
        }
        if other.session.default_name != default_name() {
            self.session.default_name = other.session.default_name;
        }

        if !other.shell.command.is_empty() {
            self.shell.command = other.shell.command;
        }
        if other.shell.prompts != default_prompts() {
            self.shell.prompts = other.shell.prompts;
        }
        if other.shell.read_timeout_secs != default_read_timeout_secs() {
            self.shell.read_timeout_secs = other.shell.read_timeout_secs;
        }
        if other.shell.max_password_retries != default_max_password_retries() {
            self.shell.max_password_retries = other.shell.max_password_retries;
        }
        if sets_key(table, "shell", "use_sudo") {
            self.shell.use_sudo = other.shell.use_sudo;
        }
    }
}

fn sets_key(table: &toml::Table, section: &str, key: &str) -> bool {
    table
        .get(section)
        .and_then(toml::Value::as_table)
        .is_some_and(|section| section.contains_key(key))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            session: SessionConfig::default(),
            shell: ShellConfig::default(),
        }
    }
}
