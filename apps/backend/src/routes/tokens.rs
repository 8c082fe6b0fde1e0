//! Access-token issuance.
//!
//! Issuance itself is unauthenticated: anyone who knows a live
//! (game, player) pair can obtain a token for it, and that token is what
//! every session-scoped route and websocket registration checks afterwards.

use std::time::SystemTime;

use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::jwt::{mint_access_token, ACCESS_TOKEN_TTL_SECS};
use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub game_id: u64,
    pub player_id: u64,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    token: String,
    expires_in: i64,
}

/// POST /api/tokens
async fn issue_token(
    req: web::Json<TokenRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    // Tokens are only minted for pairs that exist right now; a token for a
    // deleted game can still be minted to nothing because ids never return.
    {
        let store = app_state.store.read();
        let game = store.get(req.game_id).ok_or_else(|| {
            AppError::not_found("GAME_NOT_FOUND", format!("Game {} not found", req.game_id))
        })?;
        if req.player_id as usize >= game.players().len() {
            return Err(AppError::not_found(
                "PLAYER_NOT_FOUND",
                format!("No player {} in game {}", req.player_id, req.game_id),
            ));
        }
    }

    let token = mint_access_token(
        req.game_id,
        req.player_id,
        SystemTime::now(),
        &app_state.security,
    )?;

    info!(game_id = req.game_id, player_id = req.player_id, "issued token");
    Ok(HttpResponse::Ok().json(TokenResponse {
        token,
        expires_in: ACCESS_TOKEN_TTL_SECS,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(issue_token)));
}
