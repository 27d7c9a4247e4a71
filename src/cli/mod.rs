// ABOUTME: CLI argument parsing and command routing for screen-manager
//
// Provides command-line interface for:
// - The interactive session menu (menu, default)
// - Listing, attaching to and creating sessions directly (list, attach, new)
// - Inspecting and writing the configuration (config)

pub mod attach;
pub mod config;
pub mod list;
pub mod menu;
pub mod new;
pub mod util;

use crate::config::AppConfig;
use clap::{Parser, Subcommand, ValueEnum};

/// Pick, attach to and create self-destructing GNU screen sessions
#[derive(Parser)]
#[command(name = "screen-manager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub overrides: Overrides,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the session menu (default if no command given)
    Menu,

    /// List screen sessions on the host
    List,

    /// Attach to a session by pid, name or unique name prefix
    Attach(AttachArgs),

    /// Create a new self-destructing session
    New(NewArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the attach command
#[derive(Debug, clap::Args)]
pub struct AttachArgs {
    /// Session pid, full name (pid.name) or name prefix
    pub session: String,
}

/// Arguments for the new command
#[derive(Debug, clap::Args)]
pub struct NewArgs {
    /// Session name, the dated default name when omitted
    pub name: Option<String>,
}

/// Arguments for the config command
#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// Write the effective configuration to the user config file
    #[arg(long)]
    pub init: bool,
}

/// Per-run settings that take precedence over config files
#[derive(Debug, Default, clap::Args)]
pub struct Overrides {
    /// Run on a remote host through `ssh -t <DEST>`
    #[arg(long, global = true, value_name = "DEST")]
    pub ssh: Option<String>,

    /// Prefix for created session names
    #[arg(long, global = true)]
    pub initials: Option<String>,

    /// Lifetime of created sessions, e.g. "2 hours"
    #[arg(long, global = true)]
    pub expire_in: Option<String>,

    /// Base name used when no session name is given
    #[arg(long, global = true)]
    pub default_name: Option<String>,

    /// Run screen without sudo
    #[arg(long, global = true)]
    pub no_sudo: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(initials) = &self.initials {
            config.session.initials.clone_from(initials);
        }
        if let Some(expire_in) = &self.expire_in {
            config.session.expire_in.clone_from(expire_in);
        }
        if let Some(default_name) = &self.default_name {
            config.session.default_name.clone_from(default_name);
        }
        if self.no_sudo {
            config.shell.use_sudo = false;
        }
    }
}
