//! Card system: identifiers and the feature codec.
//!
//! ## Key Types
//!
//! - `Card`: Integer identifying one point of the feature space
//! - `CardSet`: A group of cards proposed or confirmed as a set
//! - `CardCodec`: Feature tuple <-> card bijection and deck generation

pub mod card;
pub mod codec;

pub use card::{Card, CardSet};
pub use codec::CardCodec;
