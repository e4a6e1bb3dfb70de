//! Per-user emote loops.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::catalogue::Emote;
use crate::common::{User, UserId};
use crate::transport::RoomTransport;

/// A running loop, as seen from outside the task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopState {
    pub user: User,
    pub number: usize,
    pub emote: Emote,
    pub started_at: DateTime<Local>,
}

/// Map entry binding a `LoopState` to its task.
#[derive(Debug)]
pub(crate) struct LoopEntry {
    pub state: LoopState,
    pub cancel: CancellationToken,
    /// Distinguishes this task from a later loop for the same user.
    pub generation: u64,
    pub handle: JoinHandle<()>,
}

pub(crate) type LoopMap = Arc<Mutex<HashMap<UserId, LoopEntry>>>;

/// Body of a loop task: play, wait, repeat until cancelled or a play fails.
pub(crate) async fn run_loop(
    transport: Arc<dyn RoomTransport>,
    loops: LoopMap,
    user: User,
    emote: Emote,
    interval: Duration,
    cancel: CancellationToken,
    generation: u64,
) {
    loop {
        if cancel.is_cancelled() {
            break;
        }

        if let Err(e) = transport.play_animation(&user, &emote.id).await {
            warn!(user = %user.username, emote = %emote.name, "Emote loop ended by transport failure: {}", e);
            let mut loops = loops.lock().await;
            // Only clear our own entry; the user may have restarted since.
            if loops.get(&user.id).is_some_and(|entry| entry.generation == generation) {
                loops.remove(&user.id);
            }
            break;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    debug!(user = %user.username, emote = %emote.name, "Emote loop task finished");
}
