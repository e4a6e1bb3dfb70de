//! The single room-wide repeating message.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::transport::RoomTransport;

/// Broadcast settings. `active == false` means no broadcast task exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastConfig {
    pub message: String,
    pub interval: Duration,
    pub active: bool,
}

/// Config plus the task bound to it.
#[derive(Debug)]
pub(crate) struct BroadcastSlot {
    pub config: BroadcastConfig,
    pub task: Option<(CancellationToken, JoinHandle<()>)>,
}

impl BroadcastSlot {
    pub fn new(interval: Duration) -> Self {
        Self {
            config: BroadcastConfig {
                message: String::new(),
                interval,
                active: false,
            },
            task: None,
        }
    }
}

/// Body of the broadcast task. Message and interval are re-read every
/// cycle, so updates apply from the next send. Send failures are logged
/// and the cycle continues.
pub(crate) async fn run_broadcast(
    transport: Arc<dyn RoomTransport>,
    slot: Arc<Mutex<BroadcastSlot>>,
    cancel: CancellationToken,
) {
    loop {
        let (message, interval) = {
            let slot = slot.lock().await;
            if cancel.is_cancelled() || !slot.config.active {
                break;
            }
            (slot.config.message.clone(), slot.config.interval)
        };

        if let Err(e) = transport.send_message(&message).await {
            warn!("Broadcast send failed, retrying next cycle: {}", e);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    debug!("Broadcast task finished");
}
