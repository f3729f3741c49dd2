use calpilot::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting calpilot");

    // Load configuration
    let config = startup::load_config().await?;

    // Run the interactive scheduling shell
    startup::run(config).await
}
