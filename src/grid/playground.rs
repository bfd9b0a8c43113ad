//! The playground: deck, draw pile, display and cached valid sets.
//!
//! The display is an `im::Vector` so snapshots handed to callers are O(1)
//! copies that can never alias engine state.
//!
//! The valid-set cache is recomputed on demand rather than maintained
//! incrementally. Any draw or fold clears it and marks it stale until the
//! next `recompute_valid_sets`.

use std::borrow::Cow;
use std::collections::VecDeque;

use im::Vector;
use log::debug;
use serde::{Deserialize, Serialize};

use super::validity::{expected_set_count, find_all_valid_sets, is_valid_set};
use crate::cards::{Card, CardCodec, CardSet};
use crate::core::{EngineError, GameRng, Geometry, Result};
use crate::players::FoldCapability;

/// One game's cards.
#[derive(Clone, Debug)]
pub struct Grid {
    geometry: Geometry,
    codec: CardCodec,

    /// Full deck, sorted ascending.
    deck: Vector<Card>,

    /// Cards not yet dealt, in shuffled order.
    draw_pile: VecDeque<Card>,

    /// Cards currently visible, in deal order.
    display: Vector<Card>,

    /// Valid sets on display as of the last recompute.
    valid_sets: Vec<CardSet>,
    stale: bool,

    /// Every set of the full deck, only when requested at creation.
    all_deck_sets: Option<Vec<CardSet>>,

    rng: GameRng,
}

impl Grid {
    /// Build, shuffle and deal a new grid.
    ///
    /// `exhaustive` additionally enumerates every set of the full deck, which
    /// is slow and only useful for diagnostics.
    ///
    /// ```
    /// use set_engine::core::{GameRng, Geometry};
    /// use set_engine::grid::Grid;
    ///
    /// let grid = Grid::new(Geometry::CLASSIC, false, GameRng::new(1)).unwrap();
    /// assert!(grid.display().len() >= 12);
    /// assert!(!grid.valid_sets().is_empty() || grid.draw_pile_len() == 0);
    /// ```
    pub fn new(geometry: Geometry, exhaustive: bool, rng: GameRng) -> Result<Self> {
        geometry.validate()?;

        let codec = CardCodec::new(geometry);
        let deck: Vector<Card> = codec.deck().into_iter().collect();

        let mut grid = Self {
            geometry,
            codec,
            deck,
            draw_pile: VecDeque::new(),
            display: Vector::new(),
            valid_sets: Vec::new(),
            stale: true,
            all_deck_sets: None,
            rng,
        };
        grid.deal(exhaustive);
        Ok(grid)
    }

    /// Build a grid from raw geometry parameters.
    pub fn initialize(rows: u8, cols: u8, exhaustive: bool, rng: GameRng) -> Result<Self> {
        Self::new(Geometry::new(rows, cols)?, exhaustive, rng)
    }

    fn deal(&mut self, exhaustive: bool) {
        let mut order: Vec<Card> = self.deck.iter().copied().collect();
        self.rng.shuffle(&mut order);
        self.draw_pile = order.into();

        let initial = self.geometry.display_size().min(self.draw_pile.len());
        self.display = self.draw_pile.drain(..initial).collect();

        if exhaustive {
            let deck: Vec<Card> = self.deck.iter().copied().collect();
            self.all_deck_sets = Some(find_all_valid_sets(&deck, self.geometry));
        }

        self.recompute_valid_sets();
        while self.valid_sets.is_empty() {
            if !self.draw_if_possible() {
                break;
            }
            self.recompute_valid_sets();
        }

        debug!(
            "dealt {} grid: {} on display, {} in pile, {} sets",
            self.geometry,
            self.display.len(),
            self.draw_pile.len(),
            self.valid_sets.len()
        );
    }

    // === Accessors ===

    /// Geometry of this grid.
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Codec matching this grid's geometry.
    #[must_use]
    pub fn codec(&self) -> &CardCodec {
        &self.codec
    }

    /// Full sorted deck.
    #[must_use]
    pub fn deck(&self) -> &Vector<Card> {
        &self.deck
    }

    /// Cards on display.
    #[must_use]
    pub fn display(&self) -> &Vector<Card> {
        &self.display
    }

    /// Cards left in the draw pile.
    #[must_use]
    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    /// Cached valid sets. Empty while stale.
    #[must_use]
    pub fn valid_sets(&self) -> &[CardSet] {
        &self.valid_sets
    }

    /// True after a draw or fold until the next recompute.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Valid sets on display, computed fresh if the cache is stale.
    #[must_use]
    pub fn current_valid_sets(&self) -> Cow<'_, [CardSet]> {
        if self.stale {
            let display: Vec<Card> = self.display.iter().copied().collect();
            Cow::Owned(find_all_valid_sets(&display, self.geometry))
        } else {
            Cow::Borrowed(&self.valid_sets)
        }
    }

    /// Every set of the full deck, if computed at creation.
    #[must_use]
    pub fn all_deck_sets(&self) -> Option<&[CardSet]> {
        self.all_deck_sets.as_deref()
    }

    /// Closed-form number of sets in the full deck.
    #[must_use]
    pub fn theoretical_set_count(&self) -> Option<u128> {
        expected_set_count(self.geometry)
    }

    /// True when fewer cards than a full display are visible.
    #[must_use]
    pub fn is_missing_cards(&self) -> bool {
        self.display.len() < self.geometry.display_size()
    }

    /// True when every card of `cards` is on display.
    #[must_use]
    pub fn contains_all(&self, cards: &[Card]) -> bool {
        cards.iter().all(|card| self.display.contains(card))
    }

    /// Display chunked into rows of `rows` cards.
    #[must_use]
    pub fn rows_layout(&self) -> Vec<Vec<Card>> {
        layout(&self.display, self.geometry.rows())
    }

    /// Immutable copy of the visible state.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            geometry: self.geometry,
            display: self.display.clone(),
            draw_pile: self.draw_pile.len(),
            valid_sets: self.current_valid_sets().into_owned(),
        }
    }

    // === Mutation ===

    /// Refresh the valid-set cache from the display.
    pub fn recompute_valid_sets(&mut self) {
        let display: Vec<Card> = self.display.iter().copied().collect();
        self.valid_sets = find_all_valid_sets(&display, self.geometry);
        self.stale = false;
    }

    /// Move the next `rows` cards from the pile to the display.
    ///
    /// Returns false, changing nothing, when the pile is empty.
    pub fn draw_if_possible(&mut self) -> bool {
        if self.draw_pile.is_empty() {
            return false;
        }
        let count = self.geometry.rows().min(self.draw_pile.len());
        self.display.extend(self.draw_pile.drain(..count));
        self.invalidate();
        debug!("drew {} cards, {} left in pile", count, self.draw_pile.len());
        true
    }

    /// Remove `cards` from the display if they form a valid set on display.
    ///
    /// All-or-nothing: on error the display is unchanged.
    pub fn fold_if_possible(&mut self, cards: &[Card]) -> Result<()> {
        if cards.is_empty() || self.display.is_empty() {
            return Err(EngineError::InvalidSet);
        }
        if !self.contains_all(cards) {
            return Err(EngineError::SetNotFound);
        }
        if !is_valid_set(cards, self.geometry) {
            return Err(EngineError::InvalidSet);
        }

        for card in cards {
            if let Some(index) = self.display.index_of(card) {
                self.display.remove(index);
            }
        }
        self.invalidate();
        debug!("folded {:?}, {} left on display", cards, self.display.len());
        Ok(())
    }

    fn invalidate(&mut self) {
        self.valid_sets.clear();
        self.stale = true;
    }
}

impl FoldCapability for Grid {
    fn try_fold(&mut self, cards: &[Card]) -> Result<()> {
        self.fold_if_possible(cards)
    }
}

/// Value copy of a grid's visible state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub geometry: Geometry,
    pub display: Vector<Card>,
    pub draw_pile: usize,
    pub valid_sets: Vec<CardSet>,
}

impl GridSnapshot {
    /// Display chunked into rows of `rows` cards.
    #[must_use]
    pub fn rows_layout(&self) -> Vec<Vec<Card>> {
        layout(&self.display, self.geometry.rows())
    }
}

fn layout(display: &Vector<Card>, width: usize) -> Vec<Vec<Card>> {
    let cards: Vec<Card> = display.iter().copied().collect();
    cards.chunks(width.max(1)).map(<[Card]>::to_vec).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic(seed: u64) -> Grid {
        Grid::new(Geometry::CLASSIC, false, GameRng::new(seed)).unwrap()
    }

    #[test]
    fn test_initial_deal() {
        let grid = classic(42);
        let dealt = grid.display().len();

        assert_eq!(grid.deck().len(), 81);
        assert!(dealt >= 12);
        assert_eq!((dealt - 12) % 3, 0);
        assert_eq!(dealt + grid.draw_pile_len(), 81);
        assert!(!grid.is_stale());
        assert!(!grid.valid_sets().is_empty());
    }

    #[test]
    fn test_cards_dealt_once() {
        let mut grid = classic(7);
        while grid.draw_if_possible() {}

        let mut seen: Vec<Card> = grid.display().iter().copied().collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 81);
        assert_eq!(grid.draw_pile_len(), 0);
    }

    #[test]
    fn test_same_seed_same_deal() {
        assert_eq!(classic(3).display(), classic(3).display());
        assert_ne!(classic(3).display(), classic(4).display());
    }

    #[test]
    fn test_initialize_rejects_geometry() {
        let err = Grid::initialize(3, 5, false, GameRng::new(1)).unwrap_err();
        assert_eq!(err.kind(), crate::core::ErrorKind::ConfigurationError);
        assert!(Grid::initialize(1, 2, false, GameRng::new(1)).is_err());
    }

    #[test]
    fn test_draw_invalidates_cache() {
        let mut grid = classic(42);
        let before = grid.display().len();

        assert!(grid.draw_if_possible());
        assert_eq!(grid.display().len(), before + 3);
        assert!(grid.is_stale());
        assert!(grid.valid_sets().is_empty());

        grid.recompute_valid_sets();
        assert!(!grid.is_stale());
    }

    #[test]
    fn test_draw_on_empty_pile() {
        let mut grid = classic(42);
        while grid.draw_if_possible() {}
        let display = grid.display().clone();

        assert!(!grid.draw_if_possible());
        assert_eq!(grid.display(), &display);
    }

    #[test]
    fn test_fold_valid_set() {
        let mut grid = classic(42);
        let set = grid.valid_sets()[0].clone();
        let before = grid.display().len();

        grid.fold_if_possible(&set).unwrap();

        assert_eq!(grid.display().len(), before - 3);
        assert!(set.iter().all(|c| !grid.display().contains(c)));
        assert!(grid.is_stale());
    }

    #[test]
    fn test_fold_is_atomic() {
        let mut grid = classic(42);
        let display = grid.display().clone();
        let first = display[0];
        let absent = grid
            .deck()
            .iter()
            .copied()
            .find(|c| !display.contains(c))
            .unwrap();

        assert_eq!(grid.fold_if_possible(&[first, absent]), Err(EngineError::SetNotFound));
        assert_eq!(grid.fold_if_possible(&[]), Err(EngineError::InvalidSet));
        assert_eq!(grid.display(), &display);
    }

    #[test]
    fn test_fold_rejects_invalid_displayed_cards() {
        let mut grid = classic(42);
        let display: Vec<Card> = grid.display().iter().copied().collect();

        let invalid = find_triple(&display, |t| !is_valid_set(t, Geometry::CLASSIC)).unwrap();
        assert_eq!(grid.fold_if_possible(&invalid), Err(EngineError::InvalidSet));
        assert_eq!(grid.display().len(), display.len());
    }

    #[test]
    fn test_current_sets_when_stale() {
        let mut grid = classic(11);
        grid.draw_if_possible();

        let fresh = grid.current_valid_sets().into_owned();
        grid.recompute_valid_sets();
        assert_eq!(fresh, grid.valid_sets());
    }

    #[test]
    fn test_exhaustive_search() {
        let grid = Grid::new(Geometry::CLASSIC, true, GameRng::new(5)).unwrap();
        assert_eq!(grid.all_deck_sets().map(<[CardSet]>::len), Some(1080));
        assert_eq!(grid.theoretical_set_count(), Some(1080));
    }

    #[test]
    fn test_rows_layout() {
        let grid = classic(42);
        let rows = grid.rows_layout();
        assert!(rows.iter().all(|r| r.len() == 3));
        assert_eq!(rows.concat().len(), grid.display().len());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut grid = classic(42);
        let snapshot = grid.snapshot();
        let set = grid.valid_sets()[0].clone();

        grid.fold_if_possible(&set).unwrap();

        assert_eq!(snapshot.display.len(), grid.display().len() + 3);
        assert_eq!(snapshot.draw_pile, grid.draw_pile_len());
    }

    fn find_triple(cards: &[Card], pred: impl Fn(&[Card]) -> bool) -> Option<Vec<Card>> {
        for i in 0..cards.len() {
            for j in i + 1..cards.len() {
                for k in j + 1..cards.len() {
                    let triple = [cards[i], cards[j], cards[k]];
                    if pred(&triple) {
                        return Some(triple.to_vec());
                    }
                }
            }
        }
        None
    }
}
