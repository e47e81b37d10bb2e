//! Terminal client binary.
//!
//! Connects to the LunaLink server, shows partner activity as terminal
//! notifications and alerts, and reads commands from stdin.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use lunalink_lib::app::SharedState;
use lunalink_lib::commands::{self, Command};
use lunalink_lib::shutdown;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting LunaLink client");

    let (config, api) = lunalink_lib::init_foundation()?;
    let state = SharedState::new(config, api);

    let permission = state.center().start().await;
    tracing::info!(?permission, "Notification system initialized");

    let s = state.clone();
    let realtime = tokio::spawn(async move { lunalink_lib::run_realtime_handler(s).await });

    println!("{}", commands::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            break;
        };
        match Command::parse(&line) {
            Ok(Some(command)) => {
                if !commands::execute(&state, command).await {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => println!("{e}"),
        }
    }

    tracing::info!("Shutting down...");
    shutdown::graceful_shutdown(&state).await;
    if let Err(e) = realtime.await {
        tracing::warn!("Realtime task ended abnormally: {e}");
    }
    Ok(())
}
