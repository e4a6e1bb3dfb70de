//! Error types for the application.

use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Errors loading the emote catalogue or canned lines.
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("Failed to read catalogue file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalogue: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalogue is empty")]
    Empty,

    #[error("Duplicate emote {field} '{value}'")]
    Duplicate { field: &'static str, value: String },
}

/// Failure of a remote room call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Not connected to the room")]
    Disconnected,

    #[error("Request rejected: {message}")]
    Rejected { message: String },

    #[error("User '{username}' is not in the room")]
    UserNotInRoom { username: String },
}

/// Precondition failures of the task lifecycle manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("already running")]
    AlreadyRunning,

    #[error("not running")]
    NotRunning,

    #[error("nothing configured")]
    NotConfigured,
}

/// Errors surfaced to the user who issued a command.
///
/// None of these are fatal: the dispatcher reports them and moves on
/// to the next event.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{hint}")]
    Parse { hint: String },

    #[error("{reason}")]
    Unauthorized { reason: String },

    #[error("{message}")]
    AlreadyRunning { message: String },

    #[error("{message}")]
    NotRunning { message: String },

    #[error("{what} not found")]
    LookupMiss { what: String },

    #[error("{what} is not configured")]
    NotConfigured { what: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl CommandError {
    pub fn parse(hint: impl Into<String>) -> Self {
        Self::Parse { hint: hint.into() }
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    pub fn lookup_miss(what: impl Into<String>) -> Self {
        Self::LookupMiss { what: what.into() }
    }

    pub fn not_configured(what: impl Into<String>) -> Self {
        Self::NotConfigured { what: what.into() }
    }

    /// Map a lifecycle failure onto the user-facing taxonomy with a reply text.
    pub fn lifecycle(error: LifecycleError, message: impl Into<String>) -> Self {
        let message = message.into();
        match error {
            LifecycleError::AlreadyRunning => Self::AlreadyRunning { message },
            LifecycleError::NotRunning => Self::NotRunning { message },
            LifecycleError::NotConfigured => Self::Parse { hint: message },
        }
    }

    /// Whether the reply belongs in public chat rather than a whisper.
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::Transport(_))
    }
}

/// Result type alias for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Result type alias for command handlers.
pub type CommandResult<T> = std::result::Result<T, CommandError>;
