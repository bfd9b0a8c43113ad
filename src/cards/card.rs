//! Card identifiers.
//!
//! A `Card` is the decimal integer produced by `CardCodec`: one decimal
//! digit per feature dimension, each digit in `1..=rows`. Reading the
//! decimal digits back out recovers the features directly.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One point of the feature space.
///
/// The classic geometry produces cards `1111..=3333`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card(pub u64);

impl Card {
    /// Wrap a raw card value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw card value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Encoded digit (`1..=rows`) for dimension `dim`, counting from the most
    /// significant digit of a card with `cols` dimensions.
    #[must_use]
    pub fn digit(self, dim: usize, cols: usize) -> u8 {
        let shift = cols.saturating_sub(dim + 1) as u32;
        ((self.0 / 10u64.pow(shift)) % 10) as u8
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Card {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// A group of cards proposed or confirmed as a set.
///
/// Inline storage covers the classic three-card set without allocating.
pub type CardSet = SmallVec<[Card; 4]>;
