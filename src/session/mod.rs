//! Multi-session hosting: many independent games keyed by session id.
//!
//! Sessions carry a secret, a creation time and a last-access time. The TTL
//! is an absolute lifetime from creation; expired sessions are evicted when
//! the store is full.

pub mod store;

pub use store::{GameHandle, SessionInfo, SessionStore};
