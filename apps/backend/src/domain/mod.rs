//! Card-table engine: value types, the generic card stack, and the
//! session with its mutation operations. Pure in-memory; no web or
//! transport concerns leak in here.

pub mod cards;
pub mod collection;
pub mod game;
pub mod tarot;

#[cfg(test)]
mod tests_props;

pub use cards::{Card, Rank, Suit};
pub use collection::{CardStack, ShufflePolicy, DEFAULT_SHUFFLE_PASSES};
pub use game::{GameConfig, GameSession, HOST_NAME};
pub use tarot::{Orientation, TarotCard, TarotRank};
