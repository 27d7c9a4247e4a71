// ABOUTME: Shell command construction for screen session operations
//
// Builds the exact command lines typed into the remote shell:
// - listing sessions
// - attaching to a session by pid
// - creating a named session plus its self-destruct `at` job

use crate::config::AppConfig;
use chrono::NaiveDate;

/// Input that cancels session creation
pub const QUIT_INPUT: &str = "q";

/// Commands are built from the per-run configuration values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenCommands {
    /// Prefix privileged commands with `sudo`
    pub use_sudo: bool,
    /// Owner prefix for every created session name
    pub initials: String,
    /// Duration handed verbatim to `at now + ...`
    pub expire_in: String,
    /// Base name used when the operator leaves the name blank
    pub default_name: String,
}

/// The two command lines that create a session and schedule its removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePlan {
    /// Final `<initials>_<name>` session name
    pub session_name: String,
    /// Starts the named session
    pub create: String,
    /// Schedules the session to quit after the expiry duration
    pub destroy: String,
}

impl ScreenCommands {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            use_sudo: config.shell.use_sudo,
            initials: config.session.initials.clone(),
            expire_in: config.session.expire_in.clone(),
            default_name: config.session.default_name.clone(),
        }
    }

    const fn sudo_prefix(&self) -> &'static str {
        if self.use_sudo {
            "sudo "
        } else {
            ""
        }
    }

    /// `screen -ls` filtered down to the indented session lines
    pub fn list_command(&self) -> String {
        format!("{}screen -ls | grep '^\\s'", self.sudo_prefix())
    }

    pub fn attach_command(&self, session_id: &str) -> String {
        format!("{}screen -rx {session_id}", self.sudo_prefix())
    }

    /// Turn the operator's name input into a session name
    ///
    /// Blank input becomes `<default_name>_MMDDYYYY`, `q` cancels.
    pub fn resolve_name(&self, input: &str, today: NaiveDate) -> Option<String> {
        match input {
            "" => Some(format!("{}{}", self.default_name, today.format("_%m%d%Y"))),
            QUIT_INPUT => None,
            name => Some(name.to_string()),
        }
    }

    /// Build the create and self-destruct commands for `name`
    ///
    /// Periods confuse both `screen -S` and `at`, so they are replaced in the
    /// whole command line, not only in the name.
    pub fn create_plan(&self, name: &str) -> CreatePlan {
        let session_name = format!("{}_{}", self.initials, name.replace(' ', "_"));

        let destroy = format!(
            "echo \"screen -S {session_name} -X quit\" | at now + {}",
            self.expire_in
        )
        .replace('.', "_");
        let create = format!("{}screen -S {session_name}", self.sudo_prefix()).replace('.', "_");

        CreatePlan {
            session_name: session_name.replace('.', "_"),
            create,
            destroy,
        }
    }
}

impl Default for ScreenCommands {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}
