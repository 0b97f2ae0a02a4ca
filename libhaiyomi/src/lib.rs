//! Riichi mahjong hand analysis: shanten, ukeire, winning structures, waits,
//! fu and points.
//!
//! Every tile count is a `[u8; 34]` indexed by [`tile::Tile`]. Entry points
//! take a [`hand::Hand`] and check its effective tile count before doing any
//! work, returning [`error::HandError`] on a mismatch.

pub mod algo;
pub mod error;
pub mod hand;
pub mod tile;

pub use error::HandError;
pub use hand::Hand;
pub use tile::Tile;
