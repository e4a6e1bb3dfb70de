//! Mutable room-level registries.
//!
//! `RoomState` is constructed once at startup and shared by reference
//! with the dispatcher. Nothing here is persisted across restarts.

pub mod roles;
pub mod teleport;

pub use roles::{Role, RoleChange, RoleRegistry};
pub use teleport::{TeleportRegistry, TeleportSlot};

use tokio::sync::RwLock;

use crate::config::RolesConfig;

/// Fallback when the session metadata carries no room name.
pub const DEFAULT_ROOM_NAME: &str = "this amazing room";

/// Injectable state container for roles, teleport slots and room metadata.
#[derive(Debug)]
pub struct RoomState {
    pub roles: RwLock<RoleRegistry>,
    pub teleports: RwLock<TeleportRegistry>,
    room_name: RwLock<String>,
}

impl RoomState {
    pub fn new(roles: RoleRegistry) -> Self {
        Self {
            roles: RwLock::new(roles),
            teleports: RwLock::new(TeleportRegistry::new()),
            room_name: RwLock::new(DEFAULT_ROOM_NAME.to_string()),
        }
    }

    pub fn from_config(config: &RolesConfig) -> Self {
        Self::new(RoleRegistry::new(
            config.super_admins.iter().cloned(),
            config.moderators.iter().cloned(),
        ))
    }

    pub async fn role_of(&self, username: &str) -> Role {
        self.roles.read().await.role_of(username)
    }

    pub async fn room_name(&self) -> String {
        self.room_name.read().await.clone()
    }

    pub async fn set_room_name(&self, name: Option<String>) {
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ROOM_NAME.to_string());
        *self.room_name.write().await = name;
    }
}
