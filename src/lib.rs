//! # set-engine
//!
//! A multi-session engine for the card game Set.
//!
//! ## Design Principles
//!
//! 1. **Geometry-Agnostic**: Cards take `rows` values on `cols = rows + 1`
//!    features. The classic 81-card deck is `3x4`; nothing assumes it.
//!
//! 2. **Server-Side Truth**: Every submission is checked against the display
//!    before it scores. Invalid submissions cost a timed penalty.
//!
//! 3. **Configuration Over Convention**: Roster size, penalty time, session
//!    capacity and TTL come from `EngineConfig`.
//!
//! ## Architecture
//!
//! - **Injected Capabilities**: Players reach the grid only through the
//!   `FoldCapability` passed into each submission.
//!
//! - **Persistent Data Structures**: The deck and display use `im-rs` so
//!   snapshots are cheap.
//!
//! - **Deterministic Time and Randomness**: Games read time from a `Clock`
//!   and draw from a seeded `GameRng` forked once per session.
//!
//! ## Modules
//!
//! - `core`: Configuration, errors, clock, RNG
//! - `cards`: Card encoding and the deck
//! - `grid`: Set validity, set search, the playground
//! - `players`: Player statistics and penalties
//! - `game`: Lifecycle state machine and match timer
//! - `session`: Registry of concurrent games with eviction
//! - `api`: Typed operations and the JSON dispatcher

pub mod core;
pub mod cards;
pub mod grid;
pub mod players;
pub mod game;
pub mod session;
pub mod api;

// Re-export commonly used types
pub use crate::core::{
    Clock, ManualClock, SharedClock, SystemClock,
    EngineConfig, Geometry, SessionConfig,
    EngineError, ErrorKind, Result,
    GameRng,
};

pub use crate::cards::{Card, CardCodec, CardSet};

pub use crate::grid::{Grid, GridSnapshot, expected_set_count, find_all_valid_sets, is_valid_set};

pub use crate::players::{FoldCapability, Player, PlayerProfile, PlayerStats};

pub use crate::game::{Game, GameSnapshot, GameState, MatchTimer, SubmitOutcome};

pub use crate::session::{GameHandle, SessionInfo, SessionStore};

pub use crate::api::{Reply, Request, Response, Service, Status};
