//! Room event dispatcher.
//!
//! Events are handled one at a time in arrival order. Each chat line is
//! routed to an `Action` and executed here; background loops and the
//! broadcast are handed to the `TaskManager`. No handler error escapes:
//! every failure is logged and turned into a best-effort reply.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, RwLock};
use tracing::{debug, error, info, warn};

use super::{fun, help};
use crate::catalogue::{EmoteIndex, Lines};
use crate::command::{split, Action, CommandRouter, Route};
use crate::common::{
    CommandError, CommandResult, Position, RoomEvent, SessionInfo, TransportResult, User, UserId,
};
use crate::config::{ChatConfig, Config};
use crate::room::{RoleChange, RoomState, TeleportSlot};
use crate::tasks::TaskManager;
use crate::transport::{self, RoomTransport};

const GENERIC_FAILURE: &str = "Sorry, something went wrong processing your command.";

fn emotes_header(part: usize) -> String {
    format!("📋 **Emotes (Part {})** 📋\n", part)
}

pub struct Bot {
    transport: Arc<dyn RoomTransport>,
    router: CommandRouter,
    emotes: Arc<EmoteIndex>,
    lines: Lines,
    room: RoomState,
    tasks: TaskManager,
    chat: ChatConfig,
    bot_id: RwLock<Option<UserId>>,
}

impl Bot {
    pub fn new(
        config: &Config,
        transport: Arc<dyn RoomTransport>,
        emotes: Arc<EmoteIndex>,
        lines: Lines,
    ) -> Self {
        Self {
            router: CommandRouter::new(config, emotes.clone()),
            tasks: TaskManager::from_config(config, transport.clone()),
            room: RoomState::from_config(&config.roles),
            chat: config.chat.clone(),
            transport,
            emotes,
            lines,
            bot_id: RwLock::new(None),
        }
    }

    /// Process events until the stream ends or shutdown is signalled,
    /// then stop every background task.
    pub async fn run(&self, mut events: mpsc::Receiver<RoomEvent>, mut shutdown_rx: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => {
                        info!("Event stream closed");
                        break;
                    }
                },
                _ = shutdown_rx.changed() => {
                    info!("Dispatcher received shutdown signal");
                    break;
                }
            }
        }

        let loops = self.tasks.active_loops().await;
        if !loops.is_empty() {
            let users: Vec<&str> = loops.iter().map(|s| s.user.username.as_str()).collect();
            info!("Stopping {} emote loop(s): {}", loops.len(), users.join(", "));
        }
        if self.tasks.broadcast_config().await.active {
            info!("Stopping broadcast");
        }
        self.tasks.shutdown().await;
    }

    pub async fn handle_event(&self, event: RoomEvent) {
        match event {
            RoomEvent::Start(session) => self.on_start(session).await,
            RoomEvent::UserJoin(user, position) => {
                debug!(user = %user.username, "Joined at {}", position);
                self.on_user_join(&user).await
            }
            RoomEvent::Chat(user, text) => self.on_chat(&user, &text).await,
        }
    }

    async fn on_start(&self, session: SessionInfo) {
        *self.bot_id.write().await = Some(session.user_id);
        self.room.set_room_name(session.room_name).await;
        info!("Connected to room: {}", self.room.room_name().await);
    }

    async fn on_user_join(&self, user: &User) {
        let welcome = format!("Welcome to the {} @{}", self.room.room_name().await, user.username);
        match self.transport.send_message(&welcome).await {
            Ok(()) => info!(user = %user.username, "Welcomed user"),
            Err(e) => error!(user = %user.username, "Failed to send welcome message: {}", e),
        }
    }

    async fn on_chat(&self, user: &User, text: &str) {
        if self.bot_id.read().await.as_deref() == Some(user.id.as_str()) {
            return;
        }

        let role = self.room.role_of(&user.username).await;
        let result = match self.router.route(text, role) {
            Route::Action(action) => self.execute(user, action).await,
            Route::NoAction => Ok(()),
            Route::Unauthorized(reason) => Err(CommandError::unauthorized(reason)),
            Route::UnknownCommand(command) => Err(CommandError::lookup_miss(format!(
                "Command {}{}",
                self.router.prefix(),
                command
            ))),
        };

        if let Err(e) = result {
            self.report(user, e).await;
        }
    }

    /// Deliver an error reply. Failures here are only logged.
    async fn report(&self, user: &User, err: CommandError) {
        let text = match &err {
            CommandError::Transport(e) => {
                error!(user = %user.username, "Command failed: {}", e);
                GENERIC_FAILURE.to_string()
            }
            CommandError::Unauthorized { reason } => {
                info!(user = %user.username, "Denied: {}", reason);
                reason.clone()
            }
            other => {
                debug!(user = %user.username, "Command rejected: {}", other);
                format!("❌ {}", other)
            }
        };

        let delivered = if err.is_public() {
            self.transport.send_message(&text).await
        } else {
            self.transport.send_whisper(user, &text).await
        };
        if let Err(e) = delivered {
            warn!(user = %user.username, "Failed to deliver error reply: {}", e);
        }
    }

    async fn execute(&self, user: &User, action: Action) -> CommandResult<()> {
        match action {
            Action::Teleport(slot) => {
                let position = self.slot_position(slot).await?;
                self.transport.move_user(user, position).await?;
                info!(user = %user.username, slot = %slot, "Teleported");
            }
            Action::PlayEmote { number, emote } => {
                self.transport.play_animation(user, &emote.id).await?;
                debug!(user = %user.username, emote = %emote.name, number, "Played emote");
            }
            Action::ModEmoteOnTarget { emote, target, .. } => {
                let (target, _) = self.locate(&target).await?;
                self.transport.play_animation(&target, &emote.id).await?;
                self.whisper(user, &format!("✅ Played {} on @{}", emote.name, target.username))
                    .await?;
            }
            Action::Help => self.send_help(user).await?,
            Action::ListEmotes => self.send_catalogue(user).await?,
            Action::StartLoop { number, emote } => {
                if let Err(e) = self.tasks.start_loop(user, number, &emote).await {
                    if let Some(current) = self.tasks.loop_state(user).await {
                        debug!(user = %user.username, emote = %current.emote.name, "Loop already running");
                    }
                    return Err(CommandError::lifecycle(
                        e,
                        "You already have a loop running. Use !stop first.",
                    ));
                }
                self.whisper(user, &format!("✅ Started looping: {} 🔄", emote.name)).await?;
            }
            Action::StopLoop => {
                let state = self
                    .tasks
                    .stop_loop(user)
                    .await
                    .map_err(|e| CommandError::lifecycle(e, "You don't have any emote loops running."))?;
                self.whisper(user, &format!("✅ Stopped looping: {} ⏹️", state.emote.name))
                    .await?;
            }
            Action::SetTeleport(slot) => {
                let position = transport::position_of(self.transport.as_ref(), user)
                    .await?
                    .ok_or_else(|| CommandError::lookup_miss("Your position"))?;
                let configured = {
                    let mut teleports = self.room.teleports.write().await;
                    teleports.set(slot, position);
                    teleports.configured()
                };
                info!(
                    user = %user.username,
                    slot = %slot,
                    "Teleport slot set to {} ({}/{} configured)",
                    position,
                    configured,
                    TeleportSlot::all().count()
                );
                self.whisper(user, &format!("✅ Teleport {} set to {}", slot, position)).await?;
            }
            Action::Summon { target } => {
                let here = transport::position_of(self.transport.as_ref(), user)
                    .await?
                    .ok_or_else(|| CommandError::lookup_miss("Your position"))?;
                let (target, _) = self.locate(&target).await?;
                self.transport.move_user(&target, here).await?;
                self.say(&format!("✅ Summoned @{}", target.username)).await?;
            }
            Action::Goto { target } => {
                let (_, there) = self.locate(&target).await?;
                self.transport.move_user(user, there).await?;
            }
            Action::Tele { target, slot } => {
                let position = self.slot_position(slot).await?;
                let (target, _) = self.locate(&target).await?;
                self.transport.move_user(&target, position).await?;
                self.whisper(user, &format!("✅ Sent @{} to {}", target.username, slot)).await?;
            }
            Action::Kick { target } => {
                if self.room.roles.read().await.is_super_admin(&target) {
                    return Err(CommandError::unauthorized("Super admins cannot be kicked!"));
                }
                let (target, _) = self.locate(&target).await?;
                self.transport.kick_user(&target).await?;
                if self.tasks.stop_loop(&target).await.is_ok() {
                    debug!(user = %target.username, "Stopped loop of kicked user");
                }
                info!(user = %target.username, by = %user.username, "Kicked user");
                self.say(&format!("👢 Kicked @{}", target.username)).await?;
            }
            Action::AddModerator { target } => {
                let change = self.room.roles.write().await.add_moderator(&target);
                match change {
                    RoleChange::Changed => {
                        info!(user = %target, by = %user.username, "Moderator added");
                        self.say(&format!("✅ @{} is now a moderator!", target)).await?;
                    }
                    RoleChange::Unchanged => {
                        self.whisper(user, &format!("ℹ️ @{} is already a moderator", target)).await?;
                    }
                    RoleChange::Protected => {
                        self.whisper(user, &format!("ℹ️ @{} is a super admin", target)).await?;
                    }
                }
            }
            Action::RemoveModerator { target } => {
                let change = self.room.roles.write().await.remove_moderator(&target);
                match change {
                    RoleChange::Changed => {
                        info!(user = %target, by = %user.username, "Moderator removed");
                        self.say(&format!("✅ @{} is no longer a moderator", target)).await?;
                    }
                    RoleChange::Unchanged => {
                        return Err(CommandError::lookup_miss(format!("Moderator @{}", target)));
                    }
                    RoleChange::Protected => {
                        return Err(CommandError::unauthorized("Super admins cannot be removed!"));
                    }
                }
            }
            Action::ModList => {
                let listing = {
                    let roles = self.room.roles.read().await;
                    let admins: Vec<&str> = roles.super_admins().collect();
                    let mods: Vec<&str> = roles.moderators().collect();
                    format!(
                        "👑 Super admins: {}\n🛡️ Moderators: {}",
                        join_or_none(&admins),
                        join_or_none(&mods)
                    )
                };
                self.whisper(user, &listing).await?;
            }
            Action::Repeat { message, interval } => {
                let config = self.tasks.set_broadcast(&message, interval).await;
                if config.active {
                    self.whisper(user, "✅ Broadcast updated, applies from the next cycle").await?;
                } else {
                    let config = self
                        .tasks
                        .start_broadcast()
                        .await
                        .map_err(|e| CommandError::lifecycle(e, "Broadcast message is empty"))?;
                    self.whisper(
                        user,
                        &format!("✅ Broadcasting every {}s", config.interval.as_secs()),
                    )
                    .await?;
                }
            }
            Action::BroadcastOff => {
                self.tasks
                    .stop_broadcast()
                    .await
                    .map_err(|e| CommandError::lifecycle(e, "No broadcast is running."))?;
                self.whisper(user, "⏹️ Broadcast stopped").await?;
            }
            Action::Fun(command) => {
                let reply = {
                    let mut rng = rand::thread_rng();
                    fun::render(&command, &user.username, &self.lines, &mut rng)
                };
                self.say(&reply).await?;
            }
            Action::Spam { message, count } => {
                for i in 0..count {
                    if i > 0 {
                        tokio::time::sleep(self.chat.chunk_delay()).await;
                    }
                    self.say(&message).await?;
                }
            }
            Action::Malformed { hint } => return Err(CommandError::parse(hint)),
            Action::NotFound { what } => return Err(CommandError::lookup_miss(what)),
        }
        Ok(())
    }

    async fn slot_position(&self, slot: TeleportSlot) -> CommandResult<Position> {
        self.room
            .teleports
            .read()
            .await
            .get(slot)
            .ok_or_else(|| CommandError::not_configured(format!("Teleport {}", slot)))
    }

    /// Find a user in the room by name.
    async fn locate(&self, username: &str) -> CommandResult<(User, Position)> {
        transport::find_user(self.transport.as_ref(), username)
            .await?
            .ok_or_else(|| CommandError::lookup_miss(format!("User @{}", username)))
    }

    async fn send_help(&self, user: &User) -> CommandResult<()> {
        let role = self.room.role_of(&user.username).await;
        let pages = help::pages(role, self.emotes.len(), self.router.prefix());
        for (i, page) in pages.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.chat.help_delay()).await;
            }
            self.whisper(user, page).await?;
        }
        self.say(&format!("📩 Help sent to {}!", user.username)).await?;
        Ok(())
    }

    async fn send_catalogue(&self, user: &User) -> CommandResult<()> {
        let catalogue = self.emotes.format_catalogue();
        let budget = self
            .chat
            .max_message_length
            .saturating_sub(emotes_header(999).len())
            .max(1);

        let parts = split(&catalogue, budget).filter(|c| !c.is_blank());
        for (i, chunk) in parts.enumerate() {
            if i > 0 {
                tokio::time::sleep(self.chat.chunk_delay()).await;
            }
            let text = format!("{}{}", emotes_header(i + 1), chunk.text.trim());
            self.transport.send_whisper(user, &text).await?;
        }
        self.say(&format!("📩 Emote list sent to {} via whisper!", user.username))
            .await?;
        Ok(())
    }

    /// Public chat, chunked to the transport ceiling and paced.
    async fn say(&self, text: &str) -> TransportResult<()> {
        for (i, chunk) in split(text, self.chat.max_message_length)
            .filter(|c| !c.is_blank())
            .enumerate()
        {
            if i > 0 {
                tokio::time::sleep(self.chat.chunk_delay()).await;
            }
            self.transport.send_message(chunk.text).await?;
        }
        Ok(())
    }

    /// Whisper, chunked to the transport ceiling and paced.
    async fn whisper(&self, user: &User, text: &str) -> TransportResult<()> {
        for (i, chunk) in split(text, self.chat.max_message_length)
            .filter(|c| !c.is_blank())
            .enumerate()
        {
            if i > 0 {
                tokio::time::sleep(self.chat.chunk_delay()).await;
            }
            self.transport.send_whisper(user, chunk.text).await?;
        }
        Ok(())
    }
}

fn join_or_none(names: &[&str]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
