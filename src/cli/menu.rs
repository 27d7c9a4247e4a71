// ABOUTME: CLI menu command - the interactive session picker
//
// Lists sessions, shows the numbered menu, runs the chosen action and then
// hands the shell to the operator.

use anyhow::Result;
use tracing::info;

use super::util::{connect, finish};
use super::Overrides;
use crate::config::AppConfig;
use crate::host::TerminalDialog;
use crate::screen::ScreenManager;

/// Execute the menu command
pub async fn execute(config: &AppConfig, overrides: &Overrides) -> Result<()> {
    let mut connection = connect(config, overrides).await?;

    // The dialog holds stdin and must be gone before the hand-off
    let result = {
        let mut dialog = TerminalDialog::stdio();
        let mut manager = ScreenManager::new(&mut connection, &mut dialog, config);
        manager.run().await.map_err(anyhow::Error::from)
    };
    if let Ok(outcome) = &result {
        info!(?outcome, "Menu finished");
    }

    finish(connection, result).await
}
