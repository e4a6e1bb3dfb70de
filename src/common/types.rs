//! Shared types used across the application.

use std::fmt;

/// Unique identifier for a room user.
pub type UserId = String;

/// A user present in (or referenced by) the room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

impl User {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

/// Direction an avatar faces after being placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    #[default]
    FrontRight,
    FrontLeft,
    BackRight,
    BackLeft,
}

impl Facing {
    /// Parse a facing name, case-insensitively (`FrontRight`, `back_left`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['_', '-'], "").as_str() {
            "frontright" => Some(Facing::FrontRight),
            "frontleft" => Some(Facing::FrontLeft),
            "backright" => Some(Facing::BackRight),
            "backleft" => Some(Facing::BackLeft),
            _ => None,
        }
    }
}

/// A point in the room.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub facing: Facing,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            facing: Facing::default(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

/// Metadata delivered when the bot's session starts.
#[derive(Debug, Clone, Default)]
pub struct SessionInfo {
    pub user_id: UserId,
    pub room_name: Option<String>,
}

/// Inbound room events, processed in arrival order.
#[derive(Debug, Clone)]
pub enum RoomEvent {
    Start(SessionInfo),
    UserJoin(User, Position),
    Chat(User, String),
}
