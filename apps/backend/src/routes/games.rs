//! Game-table HTTP routes.
//!
//! Handlers stay thin: extract and authorize, take the store lock for one
//! synchronous engine operation, answer the caller, then publish the
//! events other tables members need. The lock is released before anything
//! is published.

use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{self, AccessClaims};
use crate::domain::{Card, GameConfig, GameSession, TarotCard, TarotRank};
use crate::error::AppError;
use crate::events::{DeckEvent, GameEvent, HandEvent, PileEvent, TarotEvent};
use crate::extractors::GameId;
use crate::middleware::jwt_extract::JwtExtract;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub players: Vec<String>,
    #[serde(default)]
    pub trumps: Vec<TarotRank>,
    pub decks: Option<usize>,
    pub jokers: Option<usize>,
    pub hand_size: Option<usize>,
}

#[derive(Debug, Serialize)]
struct CreateGameResponse {
    id: u64,
}

#[derive(Debug, Serialize)]
struct GamesListResponse {
    games: Vec<u64>,
}

#[derive(Debug, Serialize)]
struct GameResponse {
    id: u64,
    players: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DeletedResponse {
    id: u64,
}

#[derive(Debug, Serialize)]
struct LengthInfo {
    length: usize,
}

#[derive(Debug, Serialize)]
struct DeckResponse {
    id: u64,
    deck: LengthInfo,
}

#[derive(Debug, Serialize)]
struct PileResponse {
    id: u64,
    pile: LengthInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    card: Option<Card>,
}

#[derive(Debug, Serialize)]
struct HandResponse {
    id: u64,
    pid: u64,
    player: String,
    hand: Vec<Card>,
}

#[derive(Debug, Serialize)]
struct CardResponse {
    id: u64,
    pid: u64,
    player: String,
    cid: u64,
    card: Card,
}

#[derive(Debug, Serialize)]
struct TarotLengths {
    deck: LengthInfo,
    pile: LengthInfo,
}

#[derive(Debug, Serialize)]
struct TarotResponse {
    id: u64,
    tarot: TarotLengths,
    #[serde(skip_serializing_if = "Option::is_none")]
    card: Option<TarotCard>,
}

#[derive(Debug, Serialize)]
struct TarotHandResponse {
    id: u64,
    pid: u64,
    player: String,
    hand: Vec<TarotCard>,
}

/// Run one closure against a live game under the store's write lock.
/// Mirrors the shape of a transaction helper: the lock spans exactly one
/// synchronous engine operation and is gone before the response is built.
fn with_game<T>(
    app_state: &AppState,
    id: u64,
    f: impl FnOnce(&mut GameSession) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let mut store = app_state.store.write();
    let game = store
        .get_mut(id)
        .ok_or_else(|| AppError::not_found("GAME_NOT_FOUND", format!("Game {id} not found")))?;
    f(game)
}

/// GET /api/games
///
/// Ids of all live games. An empty table set is a 404, matching what the
/// select-a-game clients expect.
async fn list_games(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let games = app_state.store.read().ids();
    if games.is_empty() {
        return Err(AppError::not_found("NO_GAMES", "No games exist"));
    }
    Ok(HttpResponse::Ok().json(GamesListResponse { games }))
}

/// POST /api/games
///
/// Create a fully-dealt session. No token required here: the returned id
/// plus a per-player token from /api/tokens is what gates everything else.
async fn create_game(
    body: web::Json<CreateGameRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let mut config = GameConfig {
        trumps: body.trumps,
        ..GameConfig::default()
    };
    if let Some(decks) = body.decks {
        if decks == 0 {
            return Err(AppError::bad_request(
                "INVALID_DECKS",
                "A game needs at least one deck",
            ));
        }
        config.decks = decks;
    }
    if let Some(jokers) = body.jokers {
        config.jokers = jokers;
    }
    if let Some(hand_size) = body.hand_size {
        config.hand_size = hand_size;
    }

    let game = GameSession::new(&body.players, &config, &mut rand::rng())?;
    let id = app_state.store.write().insert(game);

    info!(game_id = id, players = ?body.players, "created game");
    Ok(HttpResponse::Ok().json(CreateGameResponse { id }))
}

/// GET /api/games/{game_id}
async fn get_game(
    claims: AccessClaims,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth::authorize(&claims, game_id.0, None)?;

    let players = with_game(&app_state, game_id.0, |game| {
        Ok(game.players().to_vec())
    })?;

    Ok(HttpResponse::Ok().json(GameResponse {
        id: game_id.0,
        players,
    }))
}

/// DELETE /api/games/{game_id}
///
/// Tear the table down. The id is retired, never reissued, so stale
/// clients holding it get 404s from here on.
async fn delete_game(
    claims: AccessClaims,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth::authorize(&claims, game_id.0, None)?;

    app_state.store.write().remove(game_id.0)?;

    info!(game_id = game_id.0, "deleted game");
    Ok(HttpResponse::Ok().json(DeletedResponse { id: game_id.0 }))
}

/// GET /api/games/{game_id}/deck
async fn get_deck(
    claims: AccessClaims,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth::authorize(&claims, game_id.0, None)?;

    let length = with_game(&app_state, game_id.0, |game| Ok(game.deck_len()))?;

    Ok(HttpResponse::Ok().json(DeckResponse {
        id: game_id.0,
        deck: LengthInfo { length },
    }))
}

/// PUT /api/games/{game_id}/deck/discard
///
/// Turn the deck's top card face-up onto the pile, no player involved.
async fn discard_deck_top(
    claims: AccessClaims,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth::authorize(&claims, game_id.0, None)?;

    let (deck_len, face) = with_game(&app_state, game_id.0, |game| {
        game.discard_deck_top();
        Ok((game.deck_len(), game.pile_face().copied()))
    })?;

    info!(game_id = game_id.0, "discarded deck top");
    app_state.events.publish(GameEvent::Deck(DeckEvent {
        id: game_id.0,
        pid: None,
        player: None,
    }));
    app_state.events.publish(GameEvent::Pile(PileEvent {
        id: game_id.0,
        pid: None,
        player: None,
        card: face,
    }));

    Ok(HttpResponse::Ok().json(DeckResponse {
        id: game_id.0,
        deck: LengthInfo { length: deck_len },
    }))
}

/// PUT /api/games/{game_id}/deck/recycle
///
/// Undo of deck/discard: pile face back onto the deck.
async fn recycle_to_deck(
    claims: AccessClaims,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth::authorize(&claims, game_id.0, None)?;

    let (deck_len, face) = with_game(&app_state, game_id.0, |game| {
        game.recycle_to_deck();
        Ok((game.deck_len(), game.pile_face().copied()))
    })?;

    info!(game_id = game_id.0, "recycled pile face to deck");
    app_state.events.publish(GameEvent::Deck(DeckEvent {
        id: game_id.0,
        pid: None,
        player: None,
    }));
    app_state.events.publish(GameEvent::Pile(PileEvent {
        id: game_id.0,
        pid: None,
        player: None,
        card: face,
    }));

    Ok(HttpResponse::Ok().json(DeckResponse {
        id: game_id.0,
        deck: LengthInfo { length: deck_len },
    }))
}

/// GET /api/games/{game_id}/pile
async fn get_pile(
    claims: AccessClaims,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth::authorize(&claims, game_id.0, None)?;

    let (length, face) = with_game(&app_state, game_id.0, |game| {
        Ok((game.pile_len(), game.pile_face().copied()))
    })?;

    Ok(HttpResponse::Ok().json(PileResponse {
        id: game_id.0,
        pile: LengthInfo { length },
        card: face,
    }))
}

/// PUT /api/games/{game_id}/pile/shuffle
///
/// Fold the discard pile back into the deck and shuffle.
async fn shuffle_pile(
    claims: AccessClaims,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth::authorize(&claims, game_id.0, None)?;

    let pile_len = with_game(&app_state, game_id.0, |game| {
        game.reshuffle_discard_into_deck(&mut rand::rng());
        Ok(game.pile_len())
    })?;

    info!(game_id = game_id.0, "reshuffled pile into deck");
    app_state.events.publish(GameEvent::Deck(DeckEvent {
        id: game_id.0,
        pid: None,
        player: None,
    }));
    app_state.events.publish(GameEvent::Pile(PileEvent {
        id: game_id.0,
        pid: None,
        player: None,
        card: None,
    }));

    Ok(HttpResponse::Ok().json(PileResponse {
        id: game_id.0,
        pile: LengthInfo { length: pile_len },
        card: None,
    }))
}

fn hand_response(game: &GameSession, id: u64, pid: u64) -> Result<HandResponse, AppError> {
    Ok(HandResponse {
        id,
        pid,
        player: game.player_name(pid as usize)?.to_string(),
        hand: game.hand(pid as usize)?.to_vec(),
    })
}

/// GET /api/games/{game_id}/players/{player_id}
///
/// A hand is private: the token must name this exact seat.
async fn get_hand(
    claims: AccessClaims,
    game_id: GameId,
    path: web::Path<(u64, u64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (_, player_id) = path.into_inner();
    auth::authorize(&claims, game_id.0, Some(player_id))?;

    let response = with_game(&app_state, game_id.0, |game| {
        hand_response(game, game_id.0, player_id)
    })?;

    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/games/{game_id}/players/{player_id}/draw
async fn draw_card(
    claims: AccessClaims,
    game_id: GameId,
    path: web::Path<(u64, u64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (_, player_id) = path.into_inner();
    auth::authorize(&claims, game_id.0, Some(player_id))?;

    let response = with_game(&app_state, game_id.0, |game| {
        game.draw_card(player_id as usize)?;
        hand_response(game, game_id.0, player_id)
    })?;

    info!(game_id = game_id.0, player_id, "drew a card");
    app_state.events.publish(GameEvent::Deck(DeckEvent {
        id: game_id.0,
        pid: Some(player_id),
        player: Some(response.player.clone()),
    }));

    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/games/{game_id}/players/{player_id}/recycle
///
/// Take the pile's face card back into the hand.
async fn recycle_from_pile(
    claims: AccessClaims,
    game_id: GameId,
    path: web::Path<(u64, u64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (_, player_id) = path.into_inner();
    auth::authorize(&claims, game_id.0, Some(player_id))?;

    let (response, face) = with_game(&app_state, game_id.0, |game| {
        game.recycle_from_pile(player_id as usize)?;
        Ok((
            hand_response(game, game_id.0, player_id)?,
            game.pile_face().copied(),
        ))
    })?;

    info!(game_id = game_id.0, player_id, "recycled from pile");
    app_state.events.publish(GameEvent::Pile(PileEvent {
        id: game_id.0,
        pid: Some(player_id),
        player: Some(response.player.clone()),
        card: face,
    }));

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/games/{game_id}/players/{player_id}/cards/{card_id}
async fn get_card(
    claims: AccessClaims,
    game_id: GameId,
    path: web::Path<(u64, u64, u64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (_, player_id, card_id) = path.into_inner();
    auth::authorize(&claims, game_id.0, Some(player_id))?;

    let response = with_game(&app_state, game_id.0, |game| {
        Ok(CardResponse {
            id: game_id.0,
            pid: player_id,
            player: game.player_name(player_id as usize)?.to_string(),
            cid: card_id,
            card: *game.card(player_id as usize, card_id as usize)?,
        })
    })?;

    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/games/{game_id}/players/{player_id}/cards/{card_id}/discard
async fn discard_card(
    claims: AccessClaims,
    game_id: GameId,
    path: web::Path<(u64, u64, u64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (_, player_id, card_id) = path.into_inner();
    auth::authorize(&claims, game_id.0, Some(player_id))?;

    let (response, discarded) = with_game(&app_state, game_id.0, |game| {
        let discarded = game.discard_card(player_id as usize, card_id as usize)?;
        Ok((hand_response(game, game_id.0, player_id)?, discarded))
    })?;

    info!(game_id = game_id.0, player_id, card = %discarded, "discarded");
    app_state.events.publish(GameEvent::Pile(PileEvent {
        id: game_id.0,
        pid: Some(player_id),
        player: Some(response.player.clone()),
        card: Some(discarded),
    }));

    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/games/{game_id}/players/{player_id}/cards/{card_id}/pass/{target_id}
///
/// Hand a specific card to another player. Only the receiving seat is
/// notified; everyone else learns nothing.
async fn pass_card(
    claims: AccessClaims,
    game_id: GameId,
    path: web::Path<(u64, u64, u64, u64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (_, player_id, card_id, target_id) = path.into_inner();
    auth::authorize(&claims, game_id.0, Some(player_id))?;

    let response = with_game(&app_state, game_id.0, |game| {
        game.pass_card(player_id as usize, card_id as usize, target_id as usize)?;
        hand_response(game, game_id.0, player_id)
    })?;

    info!(game_id = game_id.0, player_id, target_id, "passed a card");
    app_state.events.publish(GameEvent::Hand(HandEvent {
        id: game_id.0,
        pid: player_id,
        player: response.player.clone(),
        tid: target_id,
    }));

    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/games/{game_id}/players/{player_id}/pick/{target_id}
///
/// Take a random card out of another player's hand. The victim seat is
/// notified; the drawn card is visible only through this response.
async fn pick_card(
    claims: AccessClaims,
    game_id: GameId,
    path: web::Path<(u64, u64, u64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (_, player_id, target_id) = path.into_inner();
    auth::authorize(&claims, game_id.0, Some(player_id))?;

    let response = with_game(&app_state, game_id.0, |game| {
        game.pick_random_from(player_id as usize, target_id as usize, &mut rand::rng())?;
        hand_response(game, game_id.0, player_id)
    })?;

    info!(game_id = game_id.0, player_id, target_id, "picked a card");
    app_state.events.publish(GameEvent::Hand(HandEvent {
        id: game_id.0,
        pid: player_id,
        player: response.player.clone(),
        tid: target_id,
    }));

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/games/{game_id}/tarot
async fn get_tarot(
    claims: AccessClaims,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth::authorize(&claims, game_id.0, None)?;

    let (deck_len, pile_len, face) = with_game(&app_state, game_id.0, |game| {
        Ok((
            game.tarot_deck_len(),
            game.tarot_pile_len(),
            game.tarot_pile_face().copied(),
        ))
    })?;

    Ok(HttpResponse::Ok().json(TarotResponse {
        id: game_id.0,
        tarot: TarotLengths {
            deck: LengthInfo { length: deck_len },
            pile: LengthInfo { length: pile_len },
        },
        card: face,
    }))
}

/// PUT /api/games/{game_id}/tarot/flip
///
/// Flip the facing of the tarot pile's top card.
async fn flip_tarot_pile_top(
    claims: AccessClaims,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth::authorize(&claims, game_id.0, None)?;

    let (deck_len, pile_len, face) = with_game(&app_state, game_id.0, |game| {
        game.tarot_flip_pile_top();
        Ok((
            game.tarot_deck_len(),
            game.tarot_pile_len(),
            game.tarot_pile_face().copied(),
        ))
    })?;

    info!(game_id = game_id.0, "flipped tarot pile top");
    app_state.events.publish(GameEvent::Tarot(TarotEvent {
        id: game_id.0,
        pid: None,
        player: None,
        card: face,
    }));

    Ok(HttpResponse::Ok().json(TarotResponse {
        id: game_id.0,
        tarot: TarotLengths {
            deck: LengthInfo { length: deck_len },
            pile: LengthInfo { length: pile_len },
        },
        card: face,
    }))
}

fn tarot_hand_response(
    game: &GameSession,
    id: u64,
    pid: u64,
) -> Result<TarotHandResponse, AppError> {
    Ok(TarotHandResponse {
        id,
        pid,
        player: game.player_name(pid as usize)?.to_string(),
        hand: game.tarot_hand(pid as usize)?.to_vec(),
    })
}

/// GET /api/games/{game_id}/players/{player_id}/tarot
async fn get_tarot_hand(
    claims: AccessClaims,
    game_id: GameId,
    path: web::Path<(u64, u64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (_, player_id) = path.into_inner();
    auth::authorize(&claims, game_id.0, Some(player_id))?;

    let response = with_game(&app_state, game_id.0, |game| {
        tarot_hand_response(game, game_id.0, player_id)
    })?;

    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/games/{game_id}/players/{player_id}/tarot/draw
async fn draw_tarot(
    claims: AccessClaims,
    game_id: GameId,
    path: web::Path<(u64, u64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (_, player_id) = path.into_inner();
    auth::authorize(&claims, game_id.0, Some(player_id))?;

    let (response, face) = with_game(&app_state, game_id.0, |game| {
        game.tarot_draw(player_id as usize)?;
        Ok((
            tarot_hand_response(game, game_id.0, player_id)?,
            game.tarot_pile_face().copied(),
        ))
    })?;

    info!(game_id = game_id.0, player_id, "drew a tarot card");
    app_state.events.publish(GameEvent::Tarot(TarotEvent {
        id: game_id.0,
        pid: Some(player_id),
        player: Some(response.player.clone()),
        card: face,
    }));

    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/games/{game_id}/players/{player_id}/tarot/cards/{card_id}/discard
async fn discard_tarot(
    claims: AccessClaims,
    game_id: GameId,
    path: web::Path<(u64, u64, u64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (_, player_id, card_id) = path.into_inner();
    auth::authorize(&claims, game_id.0, Some(player_id))?;

    let (response, discarded) = with_game(&app_state, game_id.0, |game| {
        let discarded = game.tarot_discard(player_id as usize, card_id as usize)?;
        Ok((tarot_hand_response(game, game_id.0, player_id)?, discarded))
    })?;

    info!(game_id = game_id.0, player_id, card = %discarded, "discarded a tarot card");
    app_state.events.publish(GameEvent::Tarot(TarotEvent {
        id: game_id.0,
        pid: Some(player_id),
        player: Some(response.player.clone()),
        card: Some(discarded),
    }));

    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_games))
            .route(web::post().to(create_game)),
    );
    cfg.service(
        web::scope("/{game_id}")
            .wrap(JwtExtract)
            .service(
                web::resource("")
                    .route(web::get().to(get_game))
                    .route(web::delete().to(delete_game)),
            )
            .route("/deck", web::get().to(get_deck))
            .route("/deck/discard", web::put().to(discard_deck_top))
            .route("/deck/recycle", web::put().to(recycle_to_deck))
            .route("/pile", web::get().to(get_pile))
            .route("/pile/shuffle", web::put().to(shuffle_pile))
            .route("/tarot", web::get().to(get_tarot))
            .route("/tarot/flip", web::put().to(flip_tarot_pile_top))
            .route("/players/{player_id}", web::get().to(get_hand))
            .route("/players/{player_id}/draw", web::put().to(draw_card))
            .route("/players/{player_id}/recycle", web::put().to(recycle_from_pile))
            .route("/players/{player_id}/tarot", web::get().to(get_tarot_hand))
            .route("/players/{player_id}/tarot/draw", web::put().to(draw_tarot))
            .route(
                "/players/{player_id}/tarot/cards/{card_id}/discard",
                web::put().to(discard_tarot),
            )
            .route("/players/{player_id}/pick/{target_id}", web::put().to(pick_card))
            .route("/players/{player_id}/cards/{card_id}", web::get().to(get_card))
            .route(
                "/players/{player_id}/cards/{card_id}/discard",
                web::put().to(discard_card),
            )
            .route(
                "/players/{player_id}/cards/{card_id}/pass/{target_id}",
                web::put().to(pass_card),
            ),
    );
}
