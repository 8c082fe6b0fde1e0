use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Game id extracted from the route path parameter.
/// Validates the format and that the game is live in the session store, so
/// handlers downstream can assume the id addresses a real game.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct GameId(pub u64);

impl FromRequest for GameId {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let game_id_str = req.match_info().get("game_id").ok_or_else(|| {
                AppError::bad_request("INVALID_GAME_ID", "Missing game_id parameter")
            })?;

            // u64 parsing rejects signs and junk, so this is the whole
            // "non-negative integer" check.
            let game_id = game_id_str.parse::<u64>().map_err(|_| {
                AppError::bad_request("INVALID_GAME_ID", format!("Invalid game id: {game_id_str}"))
            })?;

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;

            if !app_state.store.read().contains(game_id) {
                return Err(AppError::not_found(
                    "GAME_NOT_FOUND",
                    format!("Game {game_id} not found"),
                ));
            }

            Ok(GameId(game_id))
        })
    }
}
