//! The one thing a player may do to the board.

use crate::cards::Card;
use crate::core::Result;

/// Attempt to remove a proposed set from the display.
///
/// Implementations must be all-or-nothing: on `Err` the display is left
/// untouched. `Grid` is the production implementation; tests can supply
/// their own.
pub trait FoldCapability {
    /// Remove `cards` from the display if they form a valid set that is
    /// entirely on display.
    fn try_fold(&mut self, cards: &[Card]) -> Result<()>;
}
