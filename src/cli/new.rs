// ABOUTME: CLI new command - create a session without the menu
//
// An omitted name uses the dated default name; "q" cancels like at the prompt.

use anyhow::Result;

use super::util::{connect, finish};
use super::{NewArgs, Overrides};
use crate::config::AppConfig;
use crate::host::TerminalDialog;
use crate::screen::{Outcome, ScreenManager};

/// Execute the new command
pub async fn execute(args: NewArgs, config: &AppConfig, overrides: &Overrides) -> Result<()> {
    let mut connection = connect(config, overrides).await?;

    let result = {
        let mut dialog = TerminalDialog::stdio();
        let mut manager = ScreenManager::new(&mut connection, &mut dialog, config);
        manager
            .create_named(args.name.as_deref().unwrap_or(""))
            .await
            .map_err(anyhow::Error::from)
    };

    match &result {
        Ok(Outcome::Created { session_name }) => {
            println!("Created session: {session_name} (quits in {})", config.session.expire_in);
        }
        Ok(_) => println!("No session created."),
        Err(_) => {}
    }

    finish(connection, result).await
}
