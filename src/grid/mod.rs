//! The Set playground and its combinatorics.
//!
//! - `is_valid_set` / `find_all_valid_sets`: the set predicate and search
//! - `Grid`: deck, draw pile, display and valid-set cache for one game
//! - `GridSnapshot`: detached copy of what players can see

pub mod playground;
pub mod validity;

pub use playground::{Grid, GridSnapshot};
pub use validity::{expected_set_count, find_all_valid_sets, is_valid_set};
