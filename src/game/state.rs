//! Game lifecycle.
//!
//! ```text
//!   New ──(resume)──→ Running ⇄ Paused
//!                        │        │
//!                        └────────┴──(deck exhausted)──→ Ended
//! ```
//!
//! `Ended` is terminal.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    /// Created, timer not started.
    #[default]
    New,
    /// Timer running.
    Running,
    /// Timer paused.
    Paused,
    /// Draw pile empty and no set on display.
    Ended,
}

impl GameState {
    /// True for the terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == GameState::Ended
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameState::New => "NEW",
            GameState::Running => "RUNNING",
            GameState::Paused => "PAUSED",
            GameState::Ended => "ENDED",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_display() {
        for state in [GameState::New, GameState::Running, GameState::Paused, GameState::Ended] {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state));
        }
    }

    #[test]
    fn test_terminal() {
        assert!(GameState::Ended.is_terminal());
        assert!(!GameState::Paused.is_terminal());
        assert_eq!(GameState::default(), GameState::New);
    }
}
