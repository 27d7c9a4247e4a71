// ABOUTME: Orchestrates listing, menu selection and session actions
//
// Drives one run of the tool over a `Connection` and a `Dialog`:
// connection check → list → parse → menu → attach or create.

use crate::config::AppConfig;
use crate::host::{Connection, Dialog};
use crate::screen::commands::ScreenCommands;
use crate::screen::error::ScreenError;
use crate::screen::listing::clean_list;
use crate::screen::menu::{MenuSelection, SessionMenu, MENU_TITLE};
use chrono::NaiveDate;
use tracing::{info, warn};

pub const NOT_CONNECTED_MESSAGE: &str = "Error.\n\
    No live shell connection was found.\n\
    Connect to a remote machine (for example with --ssh) and try again.";

pub const CREATE_PROMPT: &str = "Create screen with name: \n(Leave blank for default or Q to quit.)";

pub const INVALID_CHOICE_MESSAGE: &str = "Invalid choice";

pub const PASSWORD_MESSAGE: &str = "The remote host keeps asking for a sudo password.\n\
    Allow passwordless sudo for screen, or run without sudo (--no-sudo).";

/// Any listing output mentioning this is treated as a password prompt
const PASSWORD_MARKER: &str = "password";

/// Interactive password prompts that would otherwise never reach a shell prompt
const PASSWORD_PROMPTS: [&str; 2] = ["password for ", "Password:"];

const CARRIAGE_RETURN: &str = "\r";

/// Ctrl-C, abandons a pending password prompt
const INTERRUPT: &str = "\x03";

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// There was no live connection, nothing was sent
    NotConnected,
    /// A new session was started with a self-destruct job
    Created { session_name: String },
    /// The attach command was sent for this session id
    Attached { session_id: String },
    /// The operator quit at the name prompt
    Cancelled,
    /// The menu answer was not one of the offered choices
    InvalidChoice { choice: String },
}

/// One run of the session manager over borrowed host capabilities
pub struct ScreenManager<'a, C, D> {
    connection: &'a mut C,
    dialog: &'a mut D,
    commands: ScreenCommands,
    prompts: Vec<String>,
    max_password_retries: u32,
    today: NaiveDate,
}

impl<'a, C: Connection, D: Dialog> ScreenManager<'a, C, D> {
    pub fn new(connection: &'a mut C, dialog: &'a mut D, config: &AppConfig) -> Self {
        Self {
            connection,
            dialog,
            commands: ScreenCommands::from_config(config),
            prompts: config.shell.prompts.clone(),
            max_password_retries: config.shell.max_password_retries,
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Use a fixed date for default session names
    #[must_use]
    pub fn with_date(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Full interactive flow: check the connection, list, then show the menu
    pub async fn run(&mut self) -> Result<Outcome, ScreenError> {
        if !self.connection.is_connected() {
            warn!("No active connection, nothing to manage");
            self.dialog.message_box(NOT_CONNECTED_MESSAGE)?;
            return Ok(Outcome::NotConnected);
        }

        let labels = self.list_sessions().await?;
        self.present_menu(&labels).await
    }

    /// Run the listing command and parse its output into session labels
    ///
    /// A password prompt is interrupted and the listing retried, up to
    /// `max_password_retries` times.
    pub async fn list_sessions(&mut self) -> Result<Vec<String>, ScreenError> {
        let command = self.commands.list_command();
        let mut terminators = self.prompts.clone();
        terminators.extend(PASSWORD_PROMPTS.iter().map(|p| (*p).to_string()));

        let attempts = self.max_password_retries.saturating_add(1);
        for attempt in 1..=attempts {
            self.connection.send(&format!("{command}{CARRIAGE_RETURN}")).await?;
            self.connection.wait_for(&command).await?;
            let (output, matched) = self.connection.read_until(&terminators).await?;

            if matched >= self.prompts.len() {
                warn!(attempt, "Remote host is prompting for a password, interrupting");
                self.connection.send(INTERRUPT).await?;
                self.connection.read_until(&self.prompts).await?;
                continue;
            }

            if output.contains(PASSWORD_MARKER) {
                warn!(attempt, "Listing was interrupted by a password prompt, retrying");
                continue;
            }

            let labels = clean_list(&output);
            info!(count = labels.len(), "Listed screen sessions");
            return Ok(labels);
        }

        self.dialog.message_box(PASSWORD_MESSAGE)?;
        Err(ScreenError::PasswordPrompt { attempts })
    }

    /// Show the numbered menu and dispatch the operator's choice
    ///
    /// Without sessions the menu is skipped and a new session is created.
    pub async fn present_menu<S: AsRef<str>>(&mut self, labels: &[S]) -> Result<Outcome, ScreenError> {
        let menu = SessionMenu::new(labels);
        if menu.is_empty() {
            info!("No screen sessions found, creating one");
            return self.create().await;
        }

        let choice = self.dialog.prompt(&menu.render(), MENU_TITLE)?;
        match menu.select(&choice) {
            MenuSelection::NewSession => self.create().await,
            MenuSelection::Existing(index) => {
                let session_id = menu.session_id(index);
                self.attach(&session_id).await
            }
            MenuSelection::Invalid => {
                warn!(choice = %choice, "Invalid menu choice");
                self.dialog.message_box(INVALID_CHOICE_MESSAGE)?;
                Ok(Outcome::InvalidChoice { choice })
            }
        }
    }

    /// Reattach the terminal to the session with this id
    pub async fn attach(&mut self, session_id: &str) -> Result<Outcome, ScreenError> {
        let command = self.commands.attach_command(session_id);
        self.connection.send(&format!("{command}{CARRIAGE_RETURN}")).await?;

        info!(session_id, "Attaching to screen session");
        Ok(Outcome::Attached {
            session_id: session_id.to_string(),
        })
    }

    /// Ask for a name, then create the session
    pub async fn create(&mut self) -> Result<Outcome, ScreenError> {
        let input = self.dialog.prompt(CREATE_PROMPT, "")?;
        self.create_named(&input).await
    }

    /// Create a session from name input: blank for the default name, `q` to cancel
    ///
    /// The session is started first and its self-destruct job is scheduled
    /// right after.
    pub async fn create_named(&mut self, input: &str) -> Result<Outcome, ScreenError> {
        let Some(name) = self.commands.resolve_name(input, self.today) else {
            info!("Session creation cancelled");
            return Ok(Outcome::Cancelled);
        };

        let plan = self.commands.create_plan(&name);
        self.connection.send(&plan.create).await?;
        self.connection.send(CARRIAGE_RETURN).await?;
        self.connection.send(&plan.destroy).await?;
        self.connection.send(CARRIAGE_RETURN).await?;

        info!(
            session = %plan.session_name,
            expire_in = %self.commands.expire_in,
            "Created self-destructing screen session"
        );
        Ok(Outcome::Created {
            session_name: plan.session_name,
        })
    }
}
