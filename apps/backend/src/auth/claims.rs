//! Claims carried by access tokens.

use serde::{Deserialize, Serialize};

/// A token binds one seat in one game to its holder: `gid` is the game id,
/// `pid` the player index. Inserted into request extensions by the
/// `JwtExtract` middleware after verification.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    pub gid: u64,
    pub pid: u64,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}
