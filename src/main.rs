use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use turnkeeper::{
    event::LoggingEventHandler, CommandHandler, GameService, GameSubscription, ServiceConfig,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    // Logs go to stderr, stdout carries protocol responses
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "turnkeeper=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ServiceConfig::from_env();
    info!(config = ?config, "Starting turnkeeper session manager");

    let service = GameService::from_config(&config);
    let _subscription =
        GameSubscription::all(Arc::new(LoggingEventHandler), service.event_bus()).start();

    let handler = CommandHandler::new(service);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = handler.handle_line(&line).await;
        let mut encoded = match serde_json::to_string(&response) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(error = %e, "Failed to encode response");
                continue;
            }
        };
        encoded.push('\n');
        stdout.write_all(encoded.as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("Input closed, shutting down");
    Ok(())
}
