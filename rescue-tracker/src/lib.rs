pub mod backend;
pub mod config;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::backend::io::{MenuController, StdinInput};
use crate::config::Config;

/// Install the global subscriber. Logs go to stderr so they never interleave
/// with menu output; `RUST_LOG` overrides the default `warn` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Open the inventory and run the interactive menu until the operator quits
pub async fn run(config: Config) -> Result<()> {
    let app_state = backend::initialize_backend(&config).await?;

    info!("Starting console session");
    let mut controller = MenuController::new(app_state, StdinInput::new(), std::io::stdout());
    controller.run().await?;

    info!("Console session ended");
    Ok(())
}
