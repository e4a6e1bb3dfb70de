//! Background task lifecycle.
//!
//! `TaskManager` owns every per-user emote loop and the single broadcast.
//! At most one loop exists per user and at most one broadcast task exists
//! at all. Each check-and-mutate happens under one lock acquisition so
//! concurrent commands cannot both pass a precondition.

pub mod broadcast;
pub mod loops;

pub use broadcast::BroadcastConfig;
pub use loops::LoopState;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use futures::future::join_all;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::catalogue::Emote;
use crate::common::{LifecycleError, User};
use crate::config::Config;
use crate::transport::RoomTransport;
use broadcast::{run_broadcast, BroadcastSlot};
use loops::{run_loop, LoopEntry, LoopMap};

pub struct TaskManager {
    transport: Arc<dyn RoomTransport>,
    loop_interval: Duration,
    loops: LoopMap,
    broadcast: Arc<Mutex<BroadcastSlot>>,
    next_generation: AtomicU64,
}

impl TaskManager {
    pub fn new(
        transport: Arc<dyn RoomTransport>,
        loop_interval: Duration,
        broadcast_interval: Duration,
    ) -> Self {
        Self {
            transport,
            loop_interval,
            loops: Arc::new(Mutex::new(HashMap::new())),
            broadcast: Arc::new(Mutex::new(BroadcastSlot::new(broadcast_interval))),
            next_generation: AtomicU64::new(1),
        }
    }

    pub fn from_config(config: &Config, transport: Arc<dyn RoomTransport>) -> Self {
        Self::new(transport, config.loops.interval(), config.broadcast.interval())
    }

    /// Start repeating `emote` on `user`. Fails if the user already has a loop.
    pub async fn start_loop(
        &self,
        user: &User,
        number: usize,
        emote: &Emote,
    ) -> Result<LoopState, LifecycleError> {
        let mut loops = self.loops.lock().await;
        if loops.contains_key(&user.id) {
            return Err(LifecycleError::AlreadyRunning);
        }

        let state = LoopState {
            user: user.clone(),
            number,
            emote: emote.clone(),
            started_at: Local::now(),
        };
        let cancel = CancellationToken::new();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        let handle = tokio::spawn(run_loop(
            self.transport.clone(),
            self.loops.clone(),
            user.clone(),
            emote.clone(),
            self.loop_interval,
            cancel.clone(),
            generation,
        ));

        loops.insert(
            user.id.clone(),
            LoopEntry {
                state: state.clone(),
                cancel,
                generation,
                handle,
            },
        );

        info!(user = %user.username, emote = %emote.name, "Started emote loop");
        Ok(state)
    }

    /// Stop the user's loop. The task makes no further plays once this returns,
    /// apart from one already in flight.
    pub async fn stop_loop(&self, user: &User) -> Result<LoopState, LifecycleError> {
        let entry = self
            .loops
            .lock()
            .await
            .remove(&user.id)
            .ok_or(LifecycleError::NotRunning)?;
        entry.cancel.cancel();

        info!(user = %user.username, emote = %entry.state.emote.name, "Stopped emote loop");
        Ok(entry.state)
    }

    pub async fn loop_state(&self, user: &User) -> Option<LoopState> {
        self.loops.lock().await.get(&user.id).map(|e| e.state.clone())
    }

    /// Snapshot of all running loops, oldest first.
    pub async fn active_loops(&self) -> Vec<LoopState> {
        let mut states: Vec<LoopState> = self
            .loops
            .lock()
            .await
            .values()
            .map(|e| e.state.clone())
            .collect();
        states.sort_by_key(|s| s.started_at);
        states
    }

    /// Replace the broadcast message and, if given, its interval.
    /// A running broadcast picks the change up on its next cycle.
    pub async fn set_broadcast(&self, message: &str, interval: Option<Duration>) -> BroadcastConfig {
        let mut slot = self.broadcast.lock().await;
        slot.config.message = message.to_string();
        if let Some(interval) = interval {
            slot.config.interval = interval;
        }
        debug!(interval_secs = slot.config.interval.as_secs(), "Broadcast updated");
        slot.config.clone()
    }

    pub async fn start_broadcast(&self) -> Result<BroadcastConfig, LifecycleError> {
        let mut slot = self.broadcast.lock().await;
        if slot.config.active {
            return Err(LifecycleError::AlreadyRunning);
        }
        if slot.config.message.trim().is_empty() {
            return Err(LifecycleError::NotConfigured);
        }

        slot.config.active = true;
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_broadcast(
            self.transport.clone(),
            self.broadcast.clone(),
            cancel.clone(),
        ));
        slot.task = Some((cancel, handle));

        info!(interval_secs = slot.config.interval.as_secs(), "Started broadcast");
        Ok(slot.config.clone())
    }

    pub async fn stop_broadcast(&self) -> Result<(), LifecycleError> {
        let mut slot = self.broadcast.lock().await;
        if !slot.config.active {
            return Err(LifecycleError::NotRunning);
        }
        slot.config.active = false;
        if let Some((cancel, _handle)) = slot.task.take() {
            cancel.cancel();
        }
        info!("Stopped broadcast");
        Ok(())
    }

    pub async fn broadcast_config(&self) -> BroadcastConfig {
        self.broadcast.lock().await.config.clone()
    }

    /// Cancel every loop and the broadcast, then wait for the tasks to exit.
    pub async fn shutdown(&self) {
        let mut handles = Vec::new();

        for (_, entry) in self.loops.lock().await.drain() {
            entry.cancel.cancel();
            handles.push(entry.handle);
        }

        {
            let mut slot = self.broadcast.lock().await;
            slot.config.active = false;
            if let Some((cancel, handle)) = slot.task.take() {
                cancel.cancel();
                handles.push(handle);
            }
        }

        let count = handles.len();
        join_all(handles).await;
        info!("Stopped {} background task(s)", count);
    }
}
