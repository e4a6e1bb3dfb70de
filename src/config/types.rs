//! Configuration type definitions.

use std::time::Duration;

use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub loops: LoopConfig,
    #[serde(default)]
    pub broadcast: BroadcastDefaults,
    #[serde(default)]
    pub roles: RolesConfig,
    #[serde(default)]
    pub catalogue: CatalogueConfig,
}

/// Room credentials.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub room_id: String,
}

/// Chat behaviour and outbound pacing.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Single character that introduces a command.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    /// Transport ceiling for one outbound message, in bytes.
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    /// Pause between chunks of a long whisper.
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,
    /// Pause between help pages.
    #[serde(default = "default_help_delay_ms")]
    pub help_delay_ms: u64,
    /// Upper bound for `!spam` repetitions.
    #[serde(default = "default_spam_limit")]
    pub spam_limit: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_command_prefix(),
            max_message_length: default_max_message_length(),
            chunk_delay_ms: default_chunk_delay_ms(),
            help_delay_ms: default_help_delay_ms(),
            spam_limit: default_spam_limit(),
        }
    }
}

impl ChatConfig {
    /// The prefix as a char. Validation guarantees exactly one.
    pub fn prefix(&self) -> char {
        self.command_prefix.chars().next().unwrap_or('!')
    }

    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }

    pub fn help_delay(&self) -> Duration {
        Duration::from_millis(self.help_delay_ms)
    }
}

/// Per-user emote loop settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoopConfig {
    #[serde(default = "default_loop_interval_ms")]
    pub interval_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_loop_interval_ms(),
        }
    }
}

impl LoopConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Defaults for the global repeating broadcast.
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastDefaults {
    #[serde(default = "default_broadcast_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_broadcast_min_interval_secs")]
    pub min_interval_secs: u64,
}

impl Default for BroadcastDefaults {
    fn default() -> Self {
        Self {
            interval_secs: default_broadcast_interval_secs(),
            min_interval_secs: default_broadcast_min_interval_secs(),
        }
    }
}

impl BroadcastDefaults {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Initial privilege sets.
#[derive(Debug, Clone, Deserialize)]
pub struct RolesConfig {
    #[serde(default = "default_super_admins")]
    pub super_admins: Vec<String>,
    #[serde(default)]
    pub moderators: Vec<String>,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            super_admins: default_super_admins(),
            moderators: Vec::new(),
        }
    }
}

/// Optional replacements for the embedded catalogue assets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogueConfig {
    pub emotes_path: Option<String>,
    pub lines_path: Option<String>,
}

fn default_command_prefix() -> String {
    "!".to_string()
}

fn default_max_message_length() -> usize {
    256
}

fn default_chunk_delay_ms() -> u64 {
    600
}

fn default_help_delay_ms() -> u64 {
    1000
}

fn default_spam_limit() -> u32 {
    10
}

fn default_loop_interval_ms() -> u64 {
    6000
}

fn default_broadcast_interval_secs() -> u64 {
    120
}

fn default_broadcast_min_interval_secs() -> u64 {
    10
}

fn default_super_admins() -> Vec<String> {
    vec!["SHIVAM_00".to_string(), "intothesky".to_string()]
}
