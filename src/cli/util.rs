// ABOUTME: Shared helpers for CLI commands
//
// Config loading with command-line overrides, shell start-up (including
// relaying ssh login prompts) and the final hand-off to the operator.

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, Write};
use tracing::{debug, info};

use super::Overrides;
use crate::config::AppConfig;
use crate::host::{Connection, PtyConnection};
use crate::screen::Outcome;

/// Login prompts printed before the first shell prompt (ssh password, key passphrase)
pub const LOGIN_PROMPTS: [&str; 2] = ["assword:", "passphrase for key"];

/// Load config files and apply command-line overrides
pub fn load_config(overrides: &Overrides) -> Result<AppConfig> {
    let mut config = AppConfig::load()?;
    overrides.apply(&mut config);
    Ok(config)
}

/// Start the configured shell and wait until it shows a prompt
pub async fn connect(config: &AppConfig, overrides: &Overrides) -> Result<PtyConnection> {
    let command = config.shell.resolve_command(overrides.ssh.as_deref())?;
    let mut connection = PtyConnection::spawn(&command, config.shell.read_timeout())
        .with_context(|| format!("Failed to start shell: {}", command.join(" ")))?;

    wait_for_shell(&mut connection, &config.shell.prompts).await?;
    Ok(connection)
}

/// Read until the first shell prompt, answering login prompts on the way
///
/// Secrets are read from the local terminal with echo off and typed into the
/// connection; nothing is stored or logged.
pub async fn wait_for_shell<C: Connection>(connection: &mut C, prompts: &[String]) -> Result<()> {
    let mut terminators = prompts.to_vec();
    terminators.extend(LOGIN_PROMPTS.iter().map(|p| (*p).to_string()));

    loop {
        let (text, index) = connection
            .read_until(&terminators)
            .await
            .context("Shell did not show a prompt")?;

        if index < prompts.len() {
            debug!("Shell is ready");
            return Ok(());
        }

        let label = format!("{}{}", last_line(&text), terminators[index]);
        info!("Shell is asking for a login secret");
        let secret = read_secret(&label)?;
        connection.send(&format!("{secret}\r")).await?;
    }
}

/// Give the shell to the operator unless the run ended before connecting
pub async fn hand_off(connection: PtyConnection, outcome: &Outcome) -> Result<()> {
    if *outcome == Outcome::NotConnected {
        connection.close();
        return Ok(());
    }

    connection.interact().await?;
    Ok(())
}

/// Hand off after a successful action; on failure stop the shell and report
pub async fn finish(connection: PtyConnection, result: Result<Outcome>) -> Result<()> {
    match result {
        Ok(outcome) => hand_off(connection, &outcome).await,
        Err(e) => {
            connection.close();
            Err(e)
        }
    }
}

fn last_line(text: &str) -> &str {
    text.rsplit(['\n', '\r']).next().unwrap_or("").trim_start()
}

/// Read a line from the terminal without echoing it
pub fn read_secret(label: &str) -> Result<String> {
    print!("{label} ");
    io::stdout().flush()?;

    enable_raw_mode()?;
    let secret = read_hidden_line();
    disable_raw_mode()?;
    println!();

    secret
}

fn read_hidden_line() -> Result<String> {
    let mut secret = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, kind, ..
        }) = event::read()?
        else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }

        match code {
            KeyCode::Enter => return Ok(secret),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                bail!("Login cancelled")
            }
            KeyCode::Esc => bail!("Login cancelled"),
            KeyCode::Backspace => {
                secret.pop();
            }
            KeyCode::Char(c) => secret.push(c),
            _ => {}
        }
    }
}
