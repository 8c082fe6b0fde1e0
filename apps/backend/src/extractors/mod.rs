pub mod access_claims;
pub mod game_id;

pub use game_id::GameId;
