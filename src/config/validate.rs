//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.

use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Smallest outbound ceiling that still fits a chunk header plus content.
const MIN_MESSAGE_LENGTH: usize = 16;

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    // Credentials
    if config.bot.token.is_empty() {
        errors.push("bot.token is required (or set HIGHRISE_BOT_TOKEN)".to_string());
    }
    if config.bot.token == "YOUR_BOT_TOKEN_HERE" {
        errors.push("bot.token has not been configured (still using placeholder)".to_string());
    }
    if config.bot.room_id.is_empty() {
        errors.push("bot.room_id is required (or set HIGHRISE_ROOM_ID)".to_string());
    }

    // Chat
    let mut prefix = config.chat.command_prefix.chars();
    match (prefix.next(), prefix.next()) {
        (Some(c), None) if !c.is_whitespace() && !c.is_alphanumeric() => {}
        _ => errors.push(format!(
            "chat.command_prefix must be a single symbol character (got '{}')",
            config.chat.command_prefix
        )),
    }
    if config.chat.max_message_length < MIN_MESSAGE_LENGTH {
        errors.push(format!(
            "chat.max_message_length must be at least {} (got {})",
            MIN_MESSAGE_LENGTH, config.chat.max_message_length
        ));
    }
    if config.chat.spam_limit == 0 {
        errors.push("chat.spam_limit must be positive".to_string());
    }

    // Loops & broadcast
    if config.loops.interval_ms == 0 {
        errors.push("loops.interval_ms must be positive".to_string());
    }
    if config.broadcast.min_interval_secs == 0 {
        errors.push("broadcast.min_interval_secs must be positive".to_string());
    }
    if config.broadcast.interval_secs < config.broadcast.min_interval_secs {
        errors.push(format!(
            "broadcast.interval_secs ({}) is below broadcast.min_interval_secs ({})",
            config.broadcast.interval_secs, config.broadcast.min_interval_secs
        ));
    }

    // Roles
    for (i, name) in config.roles.super_admins.iter().enumerate() {
        if name.trim().is_empty() {
            errors.push(format!("roles.super_admins[{}] is empty", i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}
