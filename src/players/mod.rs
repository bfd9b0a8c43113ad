//! Players, their statistics, and the capability they act through.
//!
//! A player never holds a reference to the grid. Each submission receives a
//! `FoldCapability` from the game for the duration of the call.

pub mod capability;
pub mod player;

pub use capability::FoldCapability;
pub use player::{Player, PlayerProfile, PlayerStats};
