//! Feature tuple <-> card encoding.
//!
//! Feature values are written as a fixed-width string of `cols` digits in
//! base `rows`, read back as a decimal number, and offset by `11..1`
//! (`cols` ones). The offset lifts every digit into `1..=rows`, so a
//! leading feature of value 0 never disappears and each feature sits at a
//! fixed decimal position.

use super::card::Card;
use crate::core::Geometry;

/// Bijective codec for one geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardCodec {
    geometry: Geometry,
    offset: u64,
}

impl CardCodec {
    /// Create a codec for `geometry`.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        let offset = (0..geometry.cols()).fold(0u64, |acc, _| acc * 10 + 1);
        Self { geometry, offset }
    }

    /// Geometry this codec encodes.
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Encode feature values (each in `0..rows`, one per dimension).
    ///
    /// Returns `None` if the tuple has the wrong width or a value is out of range.
    ///
    /// ```
    /// use set_engine::cards::{Card, CardCodec};
    /// use set_engine::core::Geometry;
    ///
    /// let codec = CardCodec::new(Geometry::CLASSIC);
    /// assert_eq!(codec.encode(&[0, 0, 0, 0]), Some(Card::new(1111)));
    /// assert_eq!(codec.encode(&[2, 0, 1, 2]), Some(Card::new(3123)));
    /// assert_eq!(codec.decode(Card::new(3123)), Some(vec![2, 0, 1, 2]));
    /// ```
    #[must_use]
    pub fn encode(&self, features: &[u8]) -> Option<Card> {
        if features.len() != self.geometry.cols() {
            return None;
        }
        let rows = self.geometry.rows() as u8;
        let mut raw = 0u64;
        for &value in features {
            if value >= rows {
                return None;
            }
            raw = raw * 10 + u64::from(value);
        }
        Some(Card::new(raw + self.offset))
    }

    /// Decode a card back into its feature values.
    ///
    /// Returns `None` for values that no tuple of this geometry encodes to.
    #[must_use]
    pub fn decode(&self, card: Card) -> Option<Vec<u8>> {
        let cols = self.geometry.cols();
        let rows = self.geometry.rows() as u8;
        if card.raw() < self.offset || card.raw() >= 10u64.pow(cols as u32) {
            return None;
        }
        (0..cols)
            .map(|dim| {
                let digit = card.digit(dim, cols);
                (1..=rows).contains(&digit).then(|| digit - 1)
            })
            .collect()
    }

    /// Encode the deck position `index` (`0..rows^cols`).
    ///
    /// The base-`rows` digits of `index` are the feature values.
    #[must_use]
    pub fn card_at(&self, index: usize) -> Card {
        let rows = self.geometry.rows();
        let cols = self.geometry.cols();
        let mut features = vec![0u8; cols];
        let mut rest = index;
        for slot in features.iter_mut().rev() {
            *slot = (rest % rows) as u8;
            rest /= rows;
        }
        let raw = features.iter().fold(0u64, |acc, &v| acc * 10 + u64::from(v));
        Card::new(raw + self.offset)
    }

    /// Every card of the geometry, sorted ascending.
    #[must_use]
    pub fn deck(&self) -> Vec<Card> {
        let mut deck: Vec<Card> = (0..self.geometry.deck_size())
            .map(|index| self.card_at(index))
            .collect();
        deck.sort_unstable();
        deck
    }
}
