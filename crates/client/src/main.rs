//! Scripture demo binary.
//!
//! Main entry point for the behavior-scripting demo.
//!
//! # Architecture
//!
//! This binary is the composition root that assembles:
//! 1. Configuration from the environment (and an optional `.env` file)
//! 2. Logging to stderr and a per-session log file
//! 3. The lifecycle event logger
//! 4. The host frame loop, on a blocking thread
//!
//! # Examples
//!
//! ```bash
//! # Run for ten seconds with verbose runner logs
//! SCRIPTURE_RUN_SECS=10 RUST_LOG=runtime=debug cargo run -p scripture-client
//! ```

use anyhow::Result;
use runtime::{EventBus, LifecycleEvent, RuntimeConfig};
use scripture_client::{ClientConfig, Host, logging};
use std::time::Duration;
use tokio::sync::{broadcast, watch};

/// How long to wait for the event logger to drain after the host returns.
const EVENT_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Load configuration from environment
    let runtime_config = RuntimeConfig::from_env();
    let client_config = ClientConfig::from_env();

    // 2. Setup logging
    let _log_guard = logging::setup_logging(&client_config)?;

    tracing::info!("Starting Scripture demo");
    tracing::info!("Frame interval: {:?}", client_config.frame_interval);
    tracing::info!("Runner tick interval: {:?}", runtime_config.runner.tick_interval);
    tracing::info!("Runner stop timeout: {:?}", runtime_config.runner.stop_timeout);

    // 3. Lifecycle events as JSON lines
    let events = EventBus::with_capacity(runtime_config.event_buffer_size);
    let event_task = tokio::spawn(log_events(events.subscribe()));

    // 4. Ctrl-C requests a shutdown at the next frame boundary
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    // 5. Run the host; its frame loop and joins block
    let host = Host::new(client_config, runtime_config, events);
    let summary = tokio::task::spawn_blocking(move || host.run(shutdown_rx)).await??;

    tracing::info!(
        frames = summary.frames,
        scenes = summary.scenes_visited,
        score = summary.final_score,
        "Host finished"
    );

    // Detached workers may keep a bus handle alive; don't wait on them forever.
    if tokio::time::timeout(EVENT_DRAIN_TIMEOUT, event_task)
        .await
        .is_err()
    {
        tracing::debug!("Event logger still attached, exiting anyway");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Logs every lifecycle event as one JSON object until the bus closes.
async fn log_events(mut events: broadcast::Receiver<LifecycleEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(line) if event.is_failure() => tracing::warn!(target: "scripture::events", "{line}"),
                Ok(line) => tracing::info!(target: "scripture::events", "{line}"),
                Err(e) => tracing::warn!("Failed to serialize lifecycle event: {}", e),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Event logger lagged, {} events skipped", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
