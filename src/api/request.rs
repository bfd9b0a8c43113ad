//! Typed request payloads, camelCase on the wire.
//!
//! Missing session ids decode as empty strings so they are reported as
//! `INVALID_SESSION_ID` rather than as a decode failure.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::{EngineError, Result};

/// Session coordinates carried by every per-session request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRef {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub secret: String,
}

impl SessionRef {
    pub fn new(session_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            secret: secret.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitSessionRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub session_secret: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAllSessionsRequest {
    pub admin_secret: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPlayerRequest {
    #[serde(flatten)]
    pub session: SessionRef,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_ai: bool,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovePlayerRequest {
    #[serde(flatten)]
    pub session: SessionRef,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSetRequest {
    #[serde(flatten)]
    pub session: SessionRef,
    pub player_name: String,
    #[serde(default)]
    pub card_set: Vec<Card>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPenaltyRequest {
    #[serde(flatten)]
    pub session: SessionRef,
    pub player_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeGameStateRequest {
    #[serde(flatten)]
    pub session: SessionRef,
    #[serde(default)]
    pub enable_pause: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetGameRequest {
    #[serde(flatten)]
    pub session: SessionRef,
    #[serde(default = "hard_by_default")]
    pub hard: bool,
}

fn hard_by_default() -> bool {
    true
}

/// One decoded operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    InitSession(InitSessionRequest),
    DeleteAllSessions(DeleteAllSessionsRequest),
    AddPlayer(AddPlayerRequest),
    RemovePlayer(RemovePlayerRequest),
    GetPlayersInfo(SessionRef),
    SubmitSet(SubmitSetRequest),
    ApplyPenalty(ApplyPenaltyRequest),
    ChangeGameState(ChangeGameStateRequest),
    GetGame(SessionRef),
    GetGameState(SessionRef),
    GetHints(SessionRef),
    ResetGame(ResetGameRequest),
    GetConfig,
}

impl Request {
    /// Every operation name accepted by `decode`.
    pub const OPERATIONS: [&'static str; 13] = [
        "initSession",
        "deleteAllSessions",
        "addPlayer",
        "removePlayer",
        "getPlayersInfo",
        "submitSet",
        "applyPenalty",
        "changeGameState",
        "getGame",
        "getGameState",
        "getHints",
        "resetGame",
        "getConfig",
    ];

    /// Decode `payload` as the request of `operation`.
    ///
    /// Unknown operations and malformed payloads are `InvalidParams`.
    /// `getConfig` takes no parameters and ignores its payload.
    pub fn decode(operation: &str, payload: &str) -> Result<Self> {
        let request = match operation {
            "initSession" => Self::InitSession(parse(payload)?),
            "deleteAllSessions" => Self::DeleteAllSessions(parse(payload)?),
            "addPlayer" => Self::AddPlayer(parse(payload)?),
            "removePlayer" => Self::RemovePlayer(parse(payload)?),
            "getPlayersInfo" => Self::GetPlayersInfo(parse(payload)?),
            "submitSet" => Self::SubmitSet(parse(payload)?),
            "applyPenalty" => Self::ApplyPenalty(parse(payload)?),
            "changeGameState" => Self::ChangeGameState(parse(payload)?),
            "getGame" => Self::GetGame(parse(payload)?),
            "getGameState" => Self::GetGameState(parse(payload)?),
            "getHints" => Self::GetHints(parse(payload)?),
            "resetGame" => Self::ResetGame(parse(payload)?),
            "getConfig" => Self::GetConfig,
            other => return Err(EngineError::invalid_params(format!("unknown operation {other:?}"))),
        };
        Ok(request)
    }

    /// Wire name of the operation.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::InitSession(_) => "initSession",
            Self::DeleteAllSessions(_) => "deleteAllSessions",
            Self::AddPlayer(_) => "addPlayer",
            Self::RemovePlayer(_) => "removePlayer",
            Self::GetPlayersInfo(_) => "getPlayersInfo",
            Self::SubmitSet(_) => "submitSet",
            Self::ApplyPenalty(_) => "applyPenalty",
            Self::ChangeGameState(_) => "changeGameState",
            Self::GetGame(_) => "getGame",
            Self::GetGameState(_) => "getGameState",
            Self::GetHints(_) => "getHints",
            Self::ResetGame(_) => "resetGame",
            Self::GetConfig => "getConfig",
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(payload: &str) -> Result<T> {
    serde_json::from_str(payload).map_err(|e| EngineError::invalid_params(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_add_player_defaults() {
        let request = Request::decode("addPlayer", r#"{"sessionId":"s","secret":"k","name":"Alice"}"#).unwrap();
        match request {
            Request::AddPlayer(add) => {
                assert_eq!(add.session, SessionRef::new("s", "k"));
                assert_eq!(add.name, "Alice");
                assert!(!add.is_ai);
                assert_eq!(add.color, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_decode_submit_set() {
        let request = Request::decode(
            "submitSet",
            r#"{"sessionId":"s","secret":"k","playerName":"Alice","cardSet":[1111,2222,3333]}"#,
        )
        .unwrap();
        let Request::SubmitSet(submit) = request else {
            panic!("expected submitSet");
        };
        assert_eq!(submit.card_set, vec![Card(1111), Card(2222), Card(3333)]);
    }

    #[test]
    fn test_reset_defaults_to_hard() {
        let Request::ResetGame(reset) = Request::decode("resetGame", r#"{"sessionId":"s","secret":"k"}"#).unwrap()
        else {
            panic!("expected resetGame");
        };
        assert!(reset.hard);
    }

    #[test]
    fn test_missing_session_id_decodes_empty() {
        let Request::GetGame(session) = Request::decode("getGame", "{}").unwrap() else {
            panic!("expected getGame");
        };
        assert!(session.session_id.is_empty());
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(
            Request::decode("getGame", "not json"),
            Err(EngineError::InvalidParams { .. })
        ));
        assert!(matches!(
            Request::decode("submitSet", r#"{"sessionId":"s","secret":"k"}"#),
            Err(EngineError::InvalidParams { .. })
        ));
        assert!(matches!(
            Request::decode("launchRockets", "{}"),
            Err(EngineError::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_get_config_ignores_payload() {
        assert_eq!(Request::decode("getConfig", "").unwrap(), Request::GetConfig);
        assert_eq!(Request::decode("getConfig", "{oops").unwrap(), Request::GetConfig);
    }

    #[test]
    fn test_operation_names_round_trip() {
        for name in Request::OPERATIONS {
            let payload = r#"{"sessionId":"s","secret":"k","sessionSecret":"k","adminSecret":"a","name":"n","playerName":"n"}"#;
            let request = Request::decode(name, payload).unwrap();
            assert_eq!(request.operation(), name);
        }
    }
}
