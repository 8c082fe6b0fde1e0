pub mod claims;
pub mod jwt;

use crate::AppError;

pub use claims::AccessClaims;
pub use jwt::{mint_access_token, verify_access_token, ACCESS_TOKEN_TTL_SECS};

/// The one scope check every session-scoped operation runs: the claims must
/// name the game in the path and, when the path names a seat, that seat.
/// Distinct from token verification: a valid token for the wrong table is a
/// 403, not a 401.
pub fn authorize(claims: &AccessClaims, gid: u64, pid: Option<u64>) -> Result<(), AppError> {
    if claims.gid != gid {
        return Err(AppError::forbidden(format!(
            "token is scoped to game {}, not game {gid}",
            claims.gid
        )));
    }
    if let Some(pid) = pid {
        if claims.pid != pid {
            return Err(AppError::forbidden(format!(
                "token is scoped to player {}, not player {pid}",
                claims.pid
            )));
        }
    }
    Ok(())
}
