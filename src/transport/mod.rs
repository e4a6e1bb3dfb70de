//! Room transport abstraction.
//!
//! Every outbound effect the bot has on the room goes through
//! `RoomTransport`. Each call is a suspension point and may fail with a
//! `TransportError`; callers decide whether a failure is fatal to the
//! task at hand.

pub mod console;
#[cfg(test)]
pub mod recording;

pub use console::ConsoleRoom;

use async_trait::async_trait;

use crate::common::{Position, TransportResult, User};

/// Remote operations available on a connected room.
#[async_trait]
pub trait RoomTransport: Send + Sync {
    /// Public room chat.
    async fn send_message(&self, text: &str) -> TransportResult<()>;

    /// Private message to one user.
    async fn send_whisper(&self, user: &User, text: &str) -> TransportResult<()>;

    /// Everyone currently in the room, with their positions.
    async fn get_room_users(&self) -> TransportResult<Vec<(User, Position)>>;

    async fn play_animation(&self, user: &User, emote_id: &str) -> TransportResult<()>;

    async fn move_user(&self, user: &User, position: Position) -> TransportResult<()>;

    async fn kick_user(&self, user: &User) -> TransportResult<()>;
}

/// Find a user in the room by username (exact match).
pub async fn find_user(
    transport: &dyn RoomTransport,
    username: &str,
) -> TransportResult<Option<(User, Position)>> {
    let users = transport.get_room_users().await?;
    Ok(users.into_iter().find(|(u, _)| u.username == username))
}

/// Current position of a user, by id.
pub async fn position_of(
    transport: &dyn RoomTransport,
    user: &User,
) -> TransportResult<Option<Position>> {
    let users = transport.get_room_users().await?;
    Ok(users
        .into_iter()
        .find(|(u, _)| u.id == user.id)
        .map(|(_, pos)| pos))
}
