//! Test double that records every transport call.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::RoomTransport;
use crate::common::{Position, TransportError, TransportResult, User};

/// A recorded outbound call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Message(String),
    Whisper { user: String, text: String },
    RoomUsers,
    Animation { user: String, emote_id: String },
    Move { user: String, position: Position },
    Kick { user: String },
}

/// Operation kinds that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Message,
    Whisper,
    RoomUsers,
    Animation,
    Move,
    Kick,
}

#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    roster: Mutex<Vec<(User, Position)>>,
    failing: Mutex<HashSet<Op>>,
    failing_emotes: Mutex<HashSet<String>>,
    latency: Mutex<Option<Duration>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: &User, position: Position) -> Self {
        self.roster.lock().unwrap().push((user.clone(), position));
        self
    }

    /// Make every later call of `op` fail with `Disconnected`.
    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.failing.lock().unwrap().remove(&op);
    }

    /// Make plays of one emote fail while other emotes still succeed.
    pub fn fail_emote(&self, emote_id: &str) {
        self.failing_emotes.lock().unwrap().insert(emote_id.to_string());
    }

    /// Every call waits this long before it takes effect or fails.
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().unwrap() = Some(latency);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn animations(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Animation { user, emote_id } => Some((user, emote_id)),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Message(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn whispers_to(&self, username: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Whisper { user, text } if user == username => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn moves(&self) -> Vec<(String, Position)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Move { user, position } => Some((user, position)),
                _ => None,
            })
            .collect()
    }

    async fn record(&self, op: Op, call: Call) -> TransportResult<()> {
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let refused = match &call {
            Call::Animation { emote_id, .. } => self.failing_emotes.lock().unwrap().contains(emote_id),
            _ => false,
        };
        if refused || self.failing.lock().unwrap().contains(&op) {
            return Err(TransportError::Disconnected);
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl RoomTransport for RecordingTransport {
    async fn send_message(&self, text: &str) -> TransportResult<()> {
        self.record(Op::Message, Call::Message(text.to_string())).await
    }

    async fn send_whisper(&self, user: &User, text: &str) -> TransportResult<()> {
        self.record(
            Op::Whisper,
            Call::Whisper {
                user: user.username.clone(),
                text: text.to_string(),
            },
        )
        .await
    }

    async fn get_room_users(&self) -> TransportResult<Vec<(User, Position)>> {
        self.record(Op::RoomUsers, Call::RoomUsers).await?;
        Ok(self.roster.lock().unwrap().clone())
    }

    async fn play_animation(&self, user: &User, emote_id: &str) -> TransportResult<()> {
        self.record(
            Op::Animation,
            Call::Animation {
                user: user.username.clone(),
                emote_id: emote_id.to_string(),
            },
        )
        .await
    }

    async fn move_user(&self, user: &User, position: Position) -> TransportResult<()> {
        self.record(
            Op::Move,
            Call::Move {
                user: user.username.clone(),
                position,
            },
        )
        .await?;
        let mut roster = self.roster.lock().unwrap();
        if let Some(entry) = roster.iter_mut().find(|(u, _)| u.id == user.id) {
            entry.1 = position;
        }
        Ok(())
    }

    async fn kick_user(&self, user: &User) -> TransportResult<()> {
        self.record(
            Op::Kick,
            Call::Kick {
                user: user.username.clone(),
            },
        )
        .await?;
        self.roster.lock().unwrap().retain(|(u, _)| u.id != user.id);
        Ok(())
    }
}
