//! Local console room.
//!
//! Stands in for the network connection during local runs. Lines read
//! from stdin become room events:
//!
//! ```text
//! join alice 1.5 0 3 backleft
//! alice: !loop 4
//! leave alice
//! ```
//!
//! Outbound calls are logged and applied to an in-memory roster. Text
//! longer than the room's message ceiling is rejected, and every call
//! fails with `Disconnected` once shutdown has closed the room.

use std::collections::HashMap;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, info, warn};

use super::RoomTransport;
use crate::common::{
    Facing, Position, RoomEvent, SessionInfo, TransportError, TransportResult, User,
};

/// One parsed stdin line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleLine {
    Join(String, Position),
    Leave(String),
    Chat(String, String),
}

/// Parse a console line. Returns `None` for blank or unrecognised input.
pub fn parse_line(line: &str) -> Option<ConsoleLine> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut words = line.split_whitespace();
    match words.next()? {
        "join" => {
            let name = words.next()?.to_string();
            let rest: Vec<&str> = words.collect();
            let position = match rest.as_slice() {
                [] => Position::default(),
                [x, y, z, facing @ ..] => {
                    let mut pos = Position::new(x.parse().ok()?, y.parse().ok()?, z.parse().ok()?);
                    if let Some(facing) = facing.first() {
                        pos.facing = Facing::parse(facing)?;
                    }
                    pos
                }
                _ => return None,
            };
            Some(ConsoleLine::Join(name, position))
        }
        "leave" => words.next().map(|name| ConsoleLine::Leave(name.to_string())),
        _ => {
            let (name, message) = line.split_once(':')?;
            let name = name.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return None;
            }
            Some(ConsoleLine::Chat(name.to_string(), message.trim().to_string()))
        }
    }
}

fn user_for(name: &str) -> User {
    User::new(format!("console-{}", name), name)
}

/// Stdin lines, read on a detached thread so a blocked read never holds
/// up runtime shutdown.
fn stdin_lines() -> mpsc::Receiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let failed = line.is_err();
            if tx.blocking_send(line).is_err() || failed {
                break;
            }
        }
    });
    rx
}

/// Console-backed room with an in-memory roster.
#[derive(Debug)]
pub struct ConsoleRoom {
    room_name: Option<String>,
    max_message_length: usize,
    roster: Mutex<HashMap<String, (User, Position)>>,
    closed: AtomicBool,
}

impl ConsoleRoom {
    pub fn new(room_name: Option<String>, max_message_length: usize) -> Self {
        Self {
            room_name,
            max_message_length,
            roster: Mutex::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    fn session(&self) -> SessionInfo {
        SessionInfo {
            user_id: "console-bot".to_string(),
            room_name: self.room_name.clone(),
        }
    }

    /// Refuse all further outbound calls.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            info!("Console room closed");
        }
    }

    /// Read stdin until EOF or shutdown, forwarding room events in order.
    pub async fn run(&self, events: mpsc::Sender<RoomEvent>, mut shutdown_rx: watch::Receiver<bool>) {
        if events.send(RoomEvent::Start(self.session())).await.is_err() {
            return;
        }

        let mut lines = stdin_lines();
        loop {
            let line = tokio::select! {
                biased;
                _ = shutdown_rx.changed() => {
                    debug!("Console input stopped by shutdown");
                    self.close();
                    break;
                }
                line = lines.recv() => line,
            };

            let line = match line {
                Some(Ok(line)) => line,
                None => {
                    info!("Console input closed");
                    break;
                }
                Some(Err(e)) => {
                    warn!("Failed to read console input: {}", e);
                    break;
                }
            };

            let Some(parsed) = parse_line(&line) else {
                if !line.trim().is_empty() {
                    warn!("Unrecognised console line: {}", line.trim());
                }
                continue;
            };

            if let Some(event) = self.apply(parsed).await {
                if events.send(event).await.is_err() {
                    debug!("Event channel closed, stopping console input");
                    break;
                }
            }
        }
    }

    /// Update the roster and produce the matching room event, if any.
    async fn apply(&self, line: ConsoleLine) -> Option<RoomEvent> {
        let mut roster = self.roster.lock().await;
        match line {
            ConsoleLine::Join(name, position) => {
                let user = user_for(&name);
                roster.insert(name, (user.clone(), position));
                Some(RoomEvent::UserJoin(user, position))
            }
            ConsoleLine::Leave(name) => {
                if roster.remove(&name).is_some() {
                    info!(user = %name, "Left the room");
                }
                None
            }
            ConsoleLine::Chat(name, message) => {
                let user = match roster.get(&name) {
                    Some((user, _)) => user.clone(),
                    None => {
                        // Chatting implies presence.
                        let user = user_for(&name);
                        roster.insert(name, (user.clone(), Position::default()));
                        user
                    }
                };
                Some(RoomEvent::Chat(user, message))
            }
        }
    }

    fn ensure_open(&self) -> TransportResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            Err(TransportError::Disconnected)
        } else {
            Ok(())
        }
    }

    fn check_length(&self, text: &str) -> TransportResult<()> {
        if text.len() > self.max_message_length {
            return Err(TransportError::Rejected {
                message: format!(
                    "text is {} bytes, the room allows {}",
                    text.len(),
                    self.max_message_length
                ),
            });
        }
        Ok(())
    }

    async fn require_present(&self, user: &User) -> TransportResult<()> {
        self.ensure_open()?;
        if self.roster.lock().await.contains_key(&user.username) {
            Ok(())
        } else {
            Err(TransportError::UserNotInRoom {
                username: user.username.clone(),
            })
        }
    }
}

#[async_trait]
impl RoomTransport for ConsoleRoom {
    async fn send_message(&self, text: &str) -> TransportResult<()> {
        self.ensure_open()?;
        self.check_length(text)?;
        info!("[room] {}", text);
        Ok(())
    }

    async fn send_whisper(&self, user: &User, text: &str) -> TransportResult<()> {
        self.require_present(user).await?;
        self.check_length(text)?;
        info!("[whisper -> {}] {}", user.username, text);
        Ok(())
    }

    async fn get_room_users(&self) -> TransportResult<Vec<(User, Position)>> {
        self.ensure_open()?;
        Ok(self.roster.lock().await.values().cloned().collect())
    }

    async fn play_animation(&self, user: &User, emote_id: &str) -> TransportResult<()> {
        self.require_present(user).await?;
        info!(user = %user.username, emote = %emote_id, "[animation]");
        Ok(())
    }

    async fn move_user(&self, user: &User, position: Position) -> TransportResult<()> {
        self.ensure_open()?;
        let mut roster = self.roster.lock().await;
        let Some(entry) = roster.get_mut(&user.username) else {
            return Err(TransportError::UserNotInRoom {
                username: user.username.clone(),
            });
        };
        entry.1 = position;
        info!(user = %user.username, "[move] to {}", position);
        Ok(())
    }

    async fn kick_user(&self, user: &User) -> TransportResult<()> {
        self.ensure_open()?;
        if self.roster.lock().await.remove(&user.username).is_none() {
            return Err(TransportError::UserNotInRoom {
                username: user.username.clone(),
            });
        }
        info!(user = %user.username, "[kick]");
        Ok(())
    }
}
