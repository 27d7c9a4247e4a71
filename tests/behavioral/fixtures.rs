// ABOUTME: Shared test fixtures and utilities for behavioral tests
//
// Provides:
// - ScriptedShell: Connection replaying canned output and recording input
// - ScriptedDialog: Dialog answering from a queue and recording what it showed
// - FakeHost: temp dir with stand-in `screen` and `at` scripts for a real sh
// - require_sh!(): Skip test if sh is unavailable

use anyhow::Result;
use chrono::NaiveDate;
use screen_manager::config::AppConfig;
use screen_manager::host::{Connection, Dialog};
use screen_manager::screen::ScreenError;
use std::collections::VecDeque;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Listing output with two sessions as `screen -ls | grep '^\s'` prints it
pub const TWO_SESSIONS: &str = "\t1111.js_alpha\t(Detached)\r\n\t2222.js_beta\t(Attached)\r\n";

/// The date default session names are built from in these tests
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

/// Connection that replays canned reads and records everything sent
#[derive(Debug, Default)]
pub struct ScriptedShell {
    pub connected: bool,
    pub reads: VecDeque<(String, usize)>,
    pub sent: Vec<String>,
    pub waited: Vec<String>,
}

impl ScriptedShell {
    /// Connected shell whose only read is `listing` ending at a prompt
    pub fn with_listing(listing: &str) -> Self {
        Self::with_reads(&[(listing, 0)])
    }

    pub fn with_reads(reads: &[(&str, usize)]) -> Self {
        Self {
            connected: true,
            reads: reads.iter().map(|(text, index)| ((*text).to_string(), *index)).collect(),
            ..Self::default()
        }
    }

    /// Everything sent, concatenated as the shell would receive it
    pub fn typed(&self) -> String {
        self.sent.concat()
    }
}

impl Connection for ScriptedShell {
    fn is_connected(&mut self) -> bool {
        self.connected
    }

    async fn send(&mut self, text: &str) -> Result<(), ScreenError> {
        self.sent.push(text.to_string());
        Ok(())
    }

    async fn wait_for(&mut self, needle: &str) -> Result<(), ScreenError> {
        self.waited.push(needle.to_string());
        Ok(())
    }

    async fn read_until(&mut self, _terminators: &[String]) -> Result<(String, usize), ScreenError> {
        self.reads.pop_front().ok_or(ScreenError::ConnectionClosed)
    }
}

/// Dialog that answers prompts from a queue, blank once it runs out
#[derive(Debug, Default)]
pub struct ScriptedDialog {
    pub answers: VecDeque<String>,
    /// (message, title) of every prompt shown
    pub prompts: Vec<(String, String)>,
    pub messages: Vec<String>,
}

impl ScriptedDialog {
    pub fn answering(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| (*a).to_string()).collect(),
            ..Self::default()
        }
    }
}

impl Dialog for ScriptedDialog {
    fn prompt(&mut self, message: &str, title: &str) -> Result<String, ScreenError> {
        self.prompts.push((message.to_string(), title.to_string()));
        Ok(self.answers.pop_front().unwrap_or_default())
    }

    fn message_box(&mut self, message: &str) -> Result<(), ScreenError> {
        self.messages.push(message.to_string());
        Ok(())
    }
}

/// A directory of stand-in `screen` and `at` programs for a local sh
///
/// `screen -ls` prints the given sessions, other invocations are logged and
/// acknowledged on stdout. `at` stores its job and arguments.
pub struct FakeHost {
    pub dir: TempDir,
}

impl FakeHost {
    /// Create the scripts; `sessions` are (label, state) pairs
    pub fn new(sessions: &[(&str, &str)]) -> Result<Self> {
        let dir = TempDir::new()?;
        let root = dir.path().display().to_string();

        let mut listing = String::from("printf '%s\\n' 'There are screens on:'\n");
        for (label, state) in sessions {
            listing.push_str(&format!("    printf '\\t%s\\t(%s)\\n' '{label}' '{state}'\n"));
        }
        listing.push_str(&format!(
            "    printf '%s\\n' '{} Sockets in /run/screen/S-test.'\n",
            sessions.len()
        ));

        let screen = format!(
            "#!/bin/sh\n\
             echo \"$*\" >> '{root}/screen.log'\n\
             case \"$1\" in\n\
             \x20 -ls)\n\
             \x20   {listing}\
             \x20   ;;\n\
             \x20 -rx) echo \"[attached to $2]\" ;;\n\
             \x20 -S) echo \"[started $2]\" ;;\n\
             esac\n"
        );
        let at = format!(
            "#!/bin/sh\n\
             cat > '{root}/at.job'\n\
             echo \"$*\" > '{root}/at.args'\n\
             echo \"job 1 at $*\"\n"
        );

        write_script(&dir.path().join("screen"), &screen)?;
        write_script(&dir.path().join("at"), &at)?;
        Ok(Self { dir })
    }

    /// Config running a local sh that finds the stand-ins first
    pub fn config(&self) -> AppConfig {
        let path = std::env::var("PATH").unwrap_or_else(|_| "/usr/bin:/bin".to_string());
        let mut config = AppConfig::default();
        config.shell.command = vec![
            "env".to_string(),
            "PS1=$ ".to_string(),
            format!("PATH={}:{path}", self.dir.path().display()),
            "sh".to_string(),
        ];
        config.shell.use_sudo = false;
        config.shell.read_timeout_secs = 10;
        config
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).unwrap_or_default()
    }
}

fn write_script(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

/// Check if a POSIX shell is available on the system
pub fn sh_available() -> bool {
    which::which("sh").is_ok() && which::which("env").is_ok()
}

/// Path of a config file inside `dir`
pub fn config_file(dir: &TempDir, content: &str) -> Result<PathBuf> {
    let path = dir.path().join("config.toml");
    fs::write(&path, content)?;
    Ok(path)
}

/// Macro to skip test if sh is not available
#[macro_export]
macro_rules! require_sh {
    () => {
        if !super::fixtures::sh_available() {
            eprintln!("Skipping test: sh not available");
            return Ok(());
        }
    };
}
