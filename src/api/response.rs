//! Typed responses, camelCase on the wire.
//!
//! Every response carries `status`, `gameState` and `error`, plus every
//! field of the operation's body. Failures fill the body with empty values
//! so callers branch on `status`, never on a missing field. `gameState` and
//! `error` are null when they do not apply.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardSet};
use crate::core::{EngineConfig, EngineError, ErrorKind, Result};
use crate::game::GameState;
use crate::players::PlayerStats;

/// Outcome flag of a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    Error,
}

/// Envelope shared by every operation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    pub status: Status,
    pub game_state: Option<GameState>,
    pub error: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Response<T> {
    pub fn success(body: T) -> Self {
        Self {
            status: Status::Success,
            game_state: None,
            error: None,
            message: None,
            body,
        }
    }

    /// Failure carrying an explicit body.
    pub fn failure_with(error: &EngineError, body: T) -> Self {
        Self {
            status: Status::Error,
            game_state: None,
            error: Some(error.kind()),
            message: Some(error.to_string()),
            body,
        }
    }

    /// Attach the game state observed when the operation finished.
    #[must_use]
    pub fn with_game_state(mut self, state: GameState) -> Self {
        self.game_state = Some(state);
        self
    }

    /// Report `error` next to an otherwise successful body.
    #[must_use]
    pub fn with_error(mut self, error: &EngineError) -> Self {
        self.error = Some(error.kind());
        self.message = Some(error.to_string());
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

impl<T: Default> Response<T> {
    /// Failure with an empty body.
    pub fn failure(error: &EngineError) -> Self {
        Self::failure_with(error, T::default())
    }

    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(body) => Self::success(body),
            Err(err) => Self::failure(&err),
        }
    }
}

/// Body of `addPlayer`, `removePlayer` and `getPlayersInfo`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayersBody {
    pub players_stats: Vec<PlayerStats>,
}

/// Body of `submitSet`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
    pub is_valid: bool,
    pub set: CardSet,
    pub player_name: String,
}

/// Body of `changeGameState` and `getGame`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridBody {
    pub grid: Vec<Vec<Card>>,
    /// Cards left in the pile; -1 when no grid could be read.
    pub draw_pile_count: i64,
}

impl Default for GridBody {
    fn default() -> Self {
        Self {
            grid: Vec::new(),
            draw_pile_count: -1,
        }
    }
}

/// Body of `getHints`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HintsBody {
    pub sets: Vec<CardSet>,
}

/// Body of `getConfig`: the public part of the engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigBody {
    pub version: &'static str,
    pub rows: usize,
    pub cols: usize,
    pub max_players: usize,
    pub penalty_time_secs: u64,
    pub player_name_max_chars: usize,
    pub player_name_min_chars: usize,
    pub max_sessions: usize,
    pub session_ttl_secs: u64,
}

impl ConfigBody {
    /// Copy everything but the admin secret out of `config`.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            rows: config.geometry.rows(),
            cols: config.geometry.cols(),
            max_players: config.max_players,
            penalty_time_secs: config.penalty_time_secs,
            player_name_max_chars: config.player_name_max_chars,
            player_name_min_chars: config.player_name_min_chars,
            max_sessions: config.session.max_sessions,
            session_ttl_secs: config.session.ttl_secs,
        }
    }
}

/// Response of any operation, for the string dispatcher.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Ack(Response<()>),
    Players(Response<PlayersBody>),
    Submit(Response<SubmitBody>),
    Grid(Response<GridBody>),
    Hints(Response<HintsBody>),
    Config(Response<ConfigBody>),
}

impl Reply {
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::Ack(r) => r.status,
            Self::Players(r) => r.status,
            Self::Submit(r) => r.status,
            Self::Grid(r) => r.status,
            Self::Hints(r) => r.status,
            Self::Config(r) => r.status,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            Self::Ack(r) => r.error,
            Self::Players(r) => r.error,
            Self::Submit(r) => r.error,
            Self::Grid(r) => r.error,
            Self::Hints(r) => r.error,
            Self::Config(r) => r.error,
        }
    }

    /// Encode as a JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
