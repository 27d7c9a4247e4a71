// ABOUTME: CLI list command - print the sessions on the host
//
// Text output mirrors the menu numbering; JSON output carries pid and name
// separately for scripts.

use anyhow::Result;

use super::util::connect;
use super::{OutputFormat, Overrides};
use crate::config::AppConfig;
use crate::host::TerminalDialog;
use crate::screen::{ListedSession, ScreenManager, SessionMenu};

/// Execute the list command
pub async fn execute(format: OutputFormat, config: &AppConfig, overrides: &Overrides) -> Result<()> {
    let mut connection = connect(config, overrides).await?;

    let labels = {
        let mut dialog = TerminalDialog::stdio();
        let mut manager = ScreenManager::new(&mut connection, &mut dialog, config);
        manager.list_sessions().await
    };
    connection.close();
    let labels = labels?;

    match format {
        OutputFormat::Json => println!("{}", render_json(&labels)?),
        OutputFormat::Text => println!("{}", render_text(&labels)),
    }

    Ok(())
}

fn render_json(labels: &[String]) -> Result<String> {
    let sessions: Vec<ListedSession> = labels.iter().map(|l| ListedSession::from_label(l)).collect();
    Ok(serde_json::to_string_pretty(&sessions)?)
}

fn render_text(labels: &[String]) -> String {
    if labels.is_empty() {
        return "No screen sessions found.".to_string();
    }
    SessionMenu::new(labels).entries().join("\n")
}
