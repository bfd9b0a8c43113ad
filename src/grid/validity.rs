//! The set predicate and exhaustive set search.
//!
//! A group of `rows` cards is a set when, in every feature dimension, the
//! values are either all identical or all pairwise distinct. Equivalently,
//! the most frequent value of each dimension occurs exactly once or exactly
//! `rows` times.

use crate::cards::{Card, CardSet};
use crate::core::Geometry;

/// Check whether `cards` form a valid set for `geometry`.
///
/// Order-independent. Rejects groups of the wrong size and groups that repeat
/// a card.
///
/// ```
/// use set_engine::cards::Card;
/// use set_engine::core::Geometry;
/// use set_engine::grid::is_valid_set;
///
/// let g = Geometry::CLASSIC;
/// let set = [Card::new(1111), Card::new(2222), Card::new(3333)];
/// assert!(is_valid_set(&set, g));
///
/// let not_set = [Card::new(1111), Card::new(1112), Card::new(1123)];
/// assert!(!is_valid_set(&not_set, g));
/// ```
#[must_use]
pub fn is_valid_set(cards: &[Card], geometry: Geometry) -> bool {
    let rows = geometry.rows();
    let cols = geometry.cols();

    if cards.len() != rows {
        return false;
    }
    if cards.iter().enumerate().any(|(i, c)| cards[..i].contains(c)) {
        return false;
    }

    (0..cols).all(|dim| {
        let mut counts = [0usize; 10];
        for card in cards {
            counts[card.digit(dim, cols) as usize] += 1;
        }
        let most_frequent = counts.iter().copied().max().unwrap_or(0);
        most_frequent == 1 || most_frequent == rows
    })
}

/// Every `rows`-combination of `cards` that forms a valid set.
///
/// Each match is sorted ascending; matches come out in combination order of
/// the input. Cost is `C(n, rows)`, fine for a display-sized input.
#[must_use]
pub fn find_all_valid_sets(cards: &[Card], geometry: Geometry) -> Vec<CardSet> {
    let mut found = Vec::new();
    let mut current = CardSet::new();
    collect_sets(cards, geometry, 0, &mut current, &mut found);
    found
}

fn collect_sets(
    cards: &[Card],
    geometry: Geometry,
    start: usize,
    current: &mut CardSet,
    found: &mut Vec<CardSet>,
) {
    let size = geometry.rows();
    if current.len() == size {
        if is_valid_set(current, geometry) {
            let mut set = current.clone();
            set.sort_unstable();
            found.push(set);
        }
        return;
    }

    let needed = size - current.len();
    if cards.len() < needed {
        return;
    }
    for i in start..=cards.len() - needed {
        current.push(cards[i]);
        collect_sets(cards, geometry, i + 1, current, found);
        current.pop();
    }
}

/// Closed-form number of distinct sets in the full deck.
///
/// Counts ordered sequences where each dimension is either constant
/// (`rows` ways) or a permutation of all values (`rows!` ways), drops the
/// degenerate all-constant sequences, then divides out the orderings.
/// `None` when the count overflows `u128`.
#[must_use]
pub fn expected_set_count(geometry: Geometry) -> Option<u128> {
    let rows = geometry.rows() as u128;
    let cols = geometry.cols() as u32;
    let factorial = (1..=rows).product::<u128>();

    let ordered = (rows + factorial).checked_pow(cols)?;
    let degenerate = rows.checked_pow(cols)?;
    Some((ordered - degenerate) / factorial)
}
