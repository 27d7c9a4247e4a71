// ABOUTME: CLI attach command - reattach to a session without the menu
//
// Lists sessions on the host, resolves the argument against them and sends
// the attach command before handing the shell over.

use anyhow::Result;

use super::util::{connect, finish};
use super::{AttachArgs, Overrides};
use crate::config::AppConfig;
use crate::host::{Connection, Dialog, TerminalDialog};
use crate::screen::{resolve_session, ListedSession, Outcome, ScreenManager};

/// Execute the attach command
pub async fn execute(args: AttachArgs, config: &AppConfig, overrides: &Overrides) -> Result<()> {
    let mut connection = connect(config, overrides).await?;

    let result = {
        let mut dialog = TerminalDialog::stdio();
        let mut manager = ScreenManager::new(&mut connection, &mut dialog, config);
        attach_to(&mut manager, &args.session).await
    };

    finish(connection, result).await
}

/// List, resolve `query` and send the attach command
pub async fn attach_to<C: Connection, D: Dialog>(
    manager: &mut ScreenManager<'_, C, D>,
    query: &str,
) -> Result<Outcome> {
    let sessions: Vec<ListedSession> = manager
        .list_sessions()
        .await?
        .iter()
        .map(|label| ListedSession::from_label(label))
        .collect();

    let session = resolve_session(&sessions, query)?;
    println!("Attaching to session: {}", session.label);
    println!("Detach with: Ctrl+A, then D");
    println!();

    Ok(manager.attach(&session.id).await?)
}
