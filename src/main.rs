// ABOUTME: Main entry point for screen-manager
//
// Binary: screen-manager
// Usage: screen-manager [COMMAND]
// - No command: session menu, then the shell is handed over
// - list: show sessions on the host
// - attach: reattach to a session by pid or name
// - new: create a self-destructing session
// - config: show or write the configuration

#![allow(missing_docs)]

use anyhow::Result;
use clap::Parser;
use crossterm::terminal::disable_raw_mode;

use screen_manager::cli::{self, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    setup_panic_handler();

    let args = cli::Cli::parse();
    let config = cli::util::load_config(&args.overrides)?;
    tracing::debug!(?config, "Loaded configuration");

    let result = match args.command {
        Some(Commands::List) => cli::list::execute(args.format, &config, &args.overrides).await,
        Some(Commands::Attach(attach_args)) => {
            cli::attach::execute(attach_args, &config, &args.overrides).await
        }
        Some(Commands::New(new_args)) => cli::new::execute(new_args, &config, &args.overrides).await,
        Some(Commands::Config(config_args)) => cli::config::execute(&config_args, args.format, &config),
        Some(Commands::Menu) | None => cli::menu::execute(&config, &args.overrides).await,
    };

    if let Err(e) = &result {
        let _ = disable_raw_mode();
        tracing::error!("Command failed: {:#}", e);
    }

    result
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use std::path::PathBuf;
    use tracing_subscriber::prelude::*;

    let log_dir = dirs::home_dir()
        .map(|home| home.join(".screen-manager").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".screen-manager/logs"));

    let _ = std::fs::create_dir_all(&log_dir);

    let log_file = log_dir.join(format!(
        "screen-manager-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    // Logging is best effort, the tool works without it
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) else {
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "screen_manager=info".into()),
        )
        .init();
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        // The hand-off may have left the terminal in raw mode
        let _ = disable_raw_mode();

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
