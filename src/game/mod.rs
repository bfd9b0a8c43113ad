//! Game lifecycle, match timer and set submission.

pub mod game;
pub mod state;
pub mod timer;

pub use game::{Game, GameSnapshot, SubmitOutcome, DEFAULT_MAX_PLAYERS, DEFAULT_PENALTY_TIME};
pub use state::GameState;
pub use timer::MatchTimer;
