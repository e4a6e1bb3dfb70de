//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `HIGHRISE_BOT_TOKEN` - Bot credential
//! - `HIGHRISE_ROOM_ID` - Room to join
//! - `HIGHRISE_COMMAND_PREFIX` - Command prefix character
//! - `HIGHRISE_MAX_MESSAGE_LENGTH` - Outbound message ceiling
//! - `HIGHRISE_LOOP_INTERVAL_MS` - Delay between loop repetitions

use std::env;

use tracing::warn;

use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "HIGHRISE";

/// Apply environment variable overrides to a config.
///
/// Credentials are normally provided this way rather than in the file.
pub fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(token) = env::var(format!("{}_BOT_TOKEN", ENV_PREFIX)) {
        config.bot.token = token;
    }
    if let Ok(room_id) = env::var(format!("{}_ROOM_ID", ENV_PREFIX)) {
        config.bot.room_id = room_id;
    }
    if let Ok(prefix) = env::var(format!("{}_COMMAND_PREFIX", ENV_PREFIX)) {
        config.chat.command_prefix = prefix;
    }

    if let Ok(value) = env::var(format!("{}_MAX_MESSAGE_LENGTH", ENV_PREFIX)) {
        match value.parse() {
            Ok(len) => config.chat.max_message_length = len,
            Err(_) => warn!("Ignoring non-numeric {}_MAX_MESSAGE_LENGTH: {}", ENV_PREFIX, value),
        }
    }
    if let Ok(value) = env::var(format!("{}_LOOP_INTERVAL_MS", ENV_PREFIX)) {
        match value.parse() {
            Ok(ms) => config.loops.interval_ms = ms,
            Err(_) => warn!("Ignoring non-numeric {}_LOOP_INTERVAL_MS: {}", ENV_PREFIX, value),
        }
    }

    config
}

/// Check if any required environment variables are set but empty.
///
/// Returns a list of variable names that are set but empty.
pub fn check_empty_env_vars() -> Vec<String> {
    let vars = [
        format!("{}_BOT_TOKEN", ENV_PREFIX),
        format!("{}_ROOM_ID", ENV_PREFIX),
    ];

    vars.into_iter()
        .filter(|var| env::var(var).map(|v| v.is_empty()).unwrap_or(false))
        .collect()
}

/// Get the config file path from environment or use default.
///
/// Checks `HIGHRISE_CONFIG` environment variable, otherwise returns "emotebot.conf".
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| "emotebot.conf".to_string())
}
