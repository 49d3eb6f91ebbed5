//! awning host entry point.
//!
//! Boots the worker on a stdio control transport: control messages arrive
//! as JSON lines on stdin, outbound notifications leave as JSON lines on
//! stdout. Logging goes to stderr to keep stdout clean for the protocol.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use awning_client::{ClientConfig, NetworkClient};
use awning_core::{AppConfig, StoreDb};
use awning_worker::{Command, Worker};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!("starting awning worker for {}", config.origin);

    let store = StoreDb::open(&config.db_path).await?;
    let transport = NetworkClient::new(ClientConfig {
        user_agent: config.user_agent.clone(),
        timeout: config.timeout(),
        ..Default::default()
    })?;

    let worker = Arc::new(Worker::new(config, store, Arc::new(transport))?);

    worker.install().await?;
    worker.activate().await?;
    tracing::info!("worker active");

    // one stdio client: its notifications become stdout JSON lines
    let (client_id, mut notifications) = worker.clients().connect().await;
    let printer = tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            match serde_json::to_string(&notification) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("failed to serialize notification: {e}"),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Command>(line) {
            Ok(command) => {
                if let Err(e) = worker.handle_command(command).await {
                    tracing::warn!("command failed: {e}");
                }
            }
            Err(e) => tracing::warn!("unrecognized control message: {e}"),
        }
    }

    // stdin closed: drain outstanding background work before exiting
    worker.clients().disconnect(client_id).await;
    worker.settle_background().await;
    printer.await?;

    Ok(())
}
