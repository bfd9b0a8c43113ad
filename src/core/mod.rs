//! Core engine types: configuration, errors, time and RNG.
//!
//! These are the ambient building blocks shared by the grid, the games and
//! the session store.

pub mod clock;
pub mod config;
pub mod error;
pub mod rng;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use config::{EngineConfig, Geometry, SessionConfig, MAX_ROWS, MIN_ROWS};
pub use error::{EngineError, ErrorKind, Result};
pub use rng::GameRng;
