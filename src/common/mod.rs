//! Common utilities and types shared across the application.

pub mod error;
pub mod types;

pub use error::{CommandError, CommandResult, LifecycleError, TransportError, TransportResult};
pub use types::{Facing, Position, RoomEvent, SessionInfo, User, UserId};
