//! Error taxonomy for every engine operation.
//!
//! `EngineError` is what the engine returns internally. `ErrorKind` is the
//! flat, serializable tag that goes out on the wire, so callers can branch
//! on a stable name without parsing messages.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the grid, players, games, sessions and the service.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Request payload could not be decoded.
    #[error("invalid params: {reason}")]
    InvalidParams { reason: String },

    /// Session id missing or empty.
    #[error("invalid session id")]
    InvalidSessionId,

    /// No session registered under the id.
    #[error("session {id} not found")]
    SessionNotFound { id: String },

    /// A session with this id already exists.
    #[error("session {id} already exists")]
    DuplicateSessionId { id: String },

    /// Session secret does not match.
    #[error("invalid secret")]
    InvalidSecret,

    /// Operation refused in the current context.
    #[error("not allowed: {reason}")]
    NotAllowed { reason: String },

    /// The store is full and nothing could be evicted.
    #[error("maximum number of sessions reached ({max})")]
    MaxSessionsReached { max: usize },

    /// The roster already holds `max` players.
    #[error("maximum number of players reached ({max})")]
    RosterFull { max: usize },

    /// Human players must provide a name.
    #[error("player name is required")]
    NameRequired,

    /// Name does not satisfy the length rules.
    #[error("invalid player name {name:?}")]
    InvalidPlayerName { name: String },

    /// A player with this name is already seated.
    #[error("player {name} already exists")]
    DuplicateName { name: String },

    /// No player with this name.
    #[error("player {name} not found")]
    PlayerNotFound { name: String },

    /// The roster is empty.
    #[error("no players")]
    NoPlayers,

    /// The game reached its terminal state.
    #[error("game ended")]
    GameEnded,

    /// The player submitted an invalid set too recently.
    #[error("player {name} is still under penalty")]
    StillUnderPenalty { name: String },

    /// At least one submitted card is not on display.
    #[error("set not found on display")]
    SetNotFound,

    /// The submitted cards do not form a set.
    #[error("invalid set")]
    InvalidSet,

    /// The display holds no valid set.
    #[error("no valid set left")]
    NoSetsLeft,

    /// Invalid geometry or configuration document.
    #[error("configuration error: {reason}")]
    ConfigurationError { reason: String },
}

/// Wire-level error tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidParams,
    InvalidSessionId,
    SessionNotFound,
    DuplicateSessionId,
    InvalidSecret,
    NotAllowed,
    MaxSessionsReached,
    RosterFull,
    NameRequired,
    InvalidPlayerName,
    DuplicateName,
    PlayerNotFound,
    NoPlayers,
    GameEnded,
    StillUnderPenalty,
    SetNotFound,
    InvalidSet,
    NoSetsLeft,
    ConfigurationError,
}

impl EngineError {
    /// Shorthand for `InvalidParams`.
    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::InvalidParams { reason: reason.into() }
    }

    /// Shorthand for `NotAllowed`.
    pub fn not_allowed(reason: impl Into<String>) -> Self {
        Self::NotAllowed { reason: reason.into() }
    }

    /// Shorthand for `ConfigurationError`.
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::ConfigurationError { reason: reason.into() }
    }

    /// The wire tag for this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParams { .. } => ErrorKind::InvalidParams,
            Self::InvalidSessionId => ErrorKind::InvalidSessionId,
            Self::SessionNotFound { .. } => ErrorKind::SessionNotFound,
            Self::DuplicateSessionId { .. } => ErrorKind::DuplicateSessionId,
            Self::InvalidSecret => ErrorKind::InvalidSecret,
            Self::NotAllowed { .. } => ErrorKind::NotAllowed,
            Self::MaxSessionsReached { .. } => ErrorKind::MaxSessionsReached,
            Self::RosterFull { .. } => ErrorKind::RosterFull,
            Self::NameRequired => ErrorKind::NameRequired,
            Self::InvalidPlayerName { .. } => ErrorKind::InvalidPlayerName,
            Self::DuplicateName { .. } => ErrorKind::DuplicateName,
            Self::PlayerNotFound { .. } => ErrorKind::PlayerNotFound,
            Self::NoPlayers => ErrorKind::NoPlayers,
            Self::GameEnded => ErrorKind::GameEnded,
            Self::StillUnderPenalty { .. } => ErrorKind::StillUnderPenalty,
            Self::SetNotFound => ErrorKind::SetNotFound,
            Self::InvalidSet => ErrorKind::InvalidSet,
            Self::NoSetsLeft => ErrorKind::NoSetsLeft,
            Self::ConfigurationError { .. } => ErrorKind::ConfigurationError,
        }
    }
}

/// Engine result alias.
pub type Result<T> = std::result::Result<T, EngineError>;
