//! Emotebot - chat command bot for virtual rooms
//!
//! Plays emotes on request, runs per-user emote loops and a room-wide
//! repeating broadcast, and handles moderator teleport and roster commands.

mod bot;
mod catalogue;
mod command;
mod common;
mod config;
mod room;
mod tasks;
mod transport;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::signal;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use bot::Bot;
use common::error::AppError;
use common::RoomEvent;
use config::{env::get_config_path, load_and_validate};
use transport::ConsoleRoom;

/// Inbound events buffered between the room and the dispatcher.
const EVENT_QUEUE: usize = 64;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Emotebot v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = get_config_path();
    info!("Loading configuration from {}...", config_path);

    let config = load_and_validate(&config_path).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        error!("Set HIGHRISE_BOT_TOKEN and HIGHRISE_ROOM_ID, or provide {}.", config_path);
        AppError::from(e)
    })?;

    info!("Configuration loaded successfully");
    info!("  Room: {}", config.bot.room_id);
    info!("  Command prefix: {}", config.chat.prefix());
    info!("  Loop interval: {:?}", config.loops.interval());
    info!("  Super admins: {}", config.roles.super_admins.join(", "));

    let (emotes, lines) = catalogue::load(&config.catalogue).map_err(|e| {
        error!("Failed to load emote catalogue: {}", e);
        AppError::from(e)
    })?;
    info!("Loaded {} emotes", emotes.len());

    // ============================================================
    // Wire room, dispatcher and shutdown
    // ============================================================
    let room = Arc::new(ConsoleRoom::new(
        Some(config.bot.room_id.clone()),
        config.chat.max_message_length,
    ));
    let bot = Bot::new(&config, room.clone(), Arc::new(emotes), lines);

    let (event_tx, event_rx) = mpsc::channel::<RoomEvent>(EVENT_QUEUE);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let input = {
        let room = room.clone();
        let shutdown_rx = shutdown_rx.clone();
        tokio::spawn(async move {
            room.run(event_tx, shutdown_rx).await;
        })
    };

    let dispatcher = bot.run(event_rx, shutdown_rx);
    tokio::pin!(dispatcher);

    let interrupted = tokio::select! {
        biased;
        _ = shutdown_signal() => {
            info!("Shutdown signal received - stopping loops and broadcast...");
            true
        }
        _ = &mut dispatcher => false,
    };

    if interrupted {
        if let Err(e) = shutdown_tx.send(true) {
            debug!("Shutdown channel closed: {}", e);
        }
        match tokio::time::timeout(Duration::from_secs(5), &mut dispatcher).await {
            Ok(()) => info!("Background tasks stopped"),
            Err(_) => warn!("Timed out stopping background tasks"),
        }
    }

    input.abort();
    info!("Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
