//! HTTP-level tests of the table operations, end to end through the real
//! route tree: create, read, draw, discard, pass, pick, the deck/pile
//! maintenance moves, and the tarot mirror.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use serde_json::json;

use decks_backend::routes;
use decks_backend::RequestTrace;

use common::{create_game, delete, get, issue_token, post_json, put, send};

#[actix_web::test]
async fn listing_games_before_any_exist_is_not_found() {
    let state = common::test_state();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let (status, json) = send(&app, get("/api/games", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NO_GAMES");
}

#[actix_web::test]
async fn create_then_list_and_read() {
    let state = common::test_state();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let id = create_game(&app, json!({"players": ["Amy", "Bo"]})).await;
    let token = issue_token(&app, id, 1).await;

    let (status, json) = send(&app, get("/api/games", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["games"], json!([id]));

    let (status, json) = send(&app, get(&format!("/api/games/{id}"), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["players"], json!(["Host", "Amy", "Bo"]));
}

#[actix_web::test]
async fn full_table_walkthrough() {
    let state = common::test_state();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    // 52 + 2 jokers, host + Amy + Bo dealt 4 each.
    let id = create_game(&app, json!({"players": ["Amy", "Bo"]})).await;
    let amy = issue_token(&app, id, 1).await;
    let bo = issue_token(&app, id, 2).await;

    let (status, json) = send(&app, get(&format!("/api/games/{id}/deck"), Some(&amy))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["deck"]["length"], 42);

    // Amy draws: deck 41, hand 5.
    let (status, json) = send(
        &app,
        put(&format!("/api/games/{id}/players/1/draw"), Some(&amy)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hand"].as_array().unwrap().len(), 5);
    assert_eq!(json["player"], "Amy");

    let (_, json) = send(&app, get(&format!("/api/games/{id}/deck"), Some(&amy))).await;
    assert_eq!(json["deck"]["length"], 41);

    // Amy discards her first card: hand 4, pile 1, face = that card.
    let (_, card_json) = send(
        &app,
        get(&format!("/api/games/{id}/players/1/cards/0"), Some(&amy)),
    )
    .await;
    let discarded = card_json["card"].clone();

    let (status, json) = send(
        &app,
        put(&format!("/api/games/{id}/players/1/cards/0/discard"), Some(&amy)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hand"].as_array().unwrap().len(), 4);

    let (_, json) = send(&app, get(&format!("/api/games/{id}/pile"), Some(&amy))).await;
    assert_eq!(json["pile"]["length"], 1);
    assert_eq!(json["card"], discarded);

    // Amy passes a card to Bo: Amy 3, Bo 5.
    let (status, json) = send(
        &app,
        put(&format!("/api/games/{id}/players/1/cards/0/pass/2"), Some(&amy)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hand"].as_array().unwrap().len(), 3);

    let (_, json) = send(&app, get(&format!("/api/games/{id}/players/2"), Some(&bo))).await;
    assert_eq!(json["hand"].as_array().unwrap().len(), 5);

    // Bo picks a random card back from Amy: 4 and 4 again.
    let (status, json) = send(
        &app,
        put(&format!("/api/games/{id}/players/2/pick/1"), Some(&bo)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hand"].as_array().unwrap().len(), 6);

    let (_, json) = send(&app, get(&format!("/api/games/{id}/players/1"), Some(&amy))).await;
    assert_eq!(json["hand"].as_array().unwrap().len(), 2);

    // Amy recycles the pile face into her hand: pile empty again.
    let (status, json) = send(
        &app,
        put(&format!("/api/games/{id}/players/1/recycle"), Some(&amy)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hand"].as_array().unwrap().len(), 3);

    let (_, json) = send(&app, get(&format!("/api/games/{id}/pile"), Some(&amy))).await;
    assert_eq!(json["pile"]["length"], 0);
}

#[actix_web::test]
async fn deck_maintenance_moves() {
    let state = common::test_state();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let id = create_game(&app, json!({"players": ["Amy"]})).await;
    let token = issue_token(&app, id, 0).await;

    // Seed the pile from the deck: 46 -> 45.
    let (status, json) = send(
        &app,
        put(&format!("/api/games/{id}/deck/discard"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["deck"]["length"], 45);

    let (_, json) = send(&app, get(&format!("/api/games/{id}/pile"), Some(&token))).await;
    assert_eq!(json["pile"]["length"], 1);

    // And take it back.
    let (status, json) = send(
        &app,
        put(&format!("/api/games/{id}/deck/recycle"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["deck"]["length"], 46);

    // Shuffle the (now empty) pile into the deck: counts unchanged.
    let (status, json) = send(
        &app,
        put(&format!("/api/games/{id}/pile/shuffle"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pile"]["length"], 0);

    let (_, json) = send(&app, get(&format!("/api/games/{id}/deck"), Some(&token))).await;
    assert_eq!(json["deck"]["length"], 46);
}

#[actix_web::test]
async fn tarot_walkthrough() {
    let state = common::test_state();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let id = create_game(
        &app,
        json!({"players": ["Amy", "Bo"], "trumps": ["tower", "sun"]}),
    )
    .await;
    let amy = issue_token(&app, id, 1).await;

    // 22 arcana minus 2 reserved trumps.
    let (status, json) = send(&app, get(&format!("/api/games/{id}/tarot"), Some(&amy))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tarot"]["deck"]["length"], 20);
    assert_eq!(json["tarot"]["pile"]["length"], 0);

    // Amy starts holding her trump.
    let (_, json) = send(
        &app,
        get(&format!("/api/games/{id}/players/1/tarot"), Some(&amy)),
    )
    .await;
    assert_eq!(json["hand"][0]["rank"], "tower");

    // Draw, then discard the drawn card onto the tarot pile.
    let (status, json) = send(
        &app,
        put(&format!("/api/games/{id}/players/1/tarot/draw"), Some(&amy)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hand"].as_array().unwrap().len(), 2);

    let (status, json) = send(
        &app,
        put(
            &format!("/api/games/{id}/players/1/tarot/cards/1/discard"),
            Some(&amy),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hand"].as_array().unwrap().len(), 1);

    let (_, json) = send(&app, get(&format!("/api/games/{id}/tarot"), Some(&amy))).await;
    assert_eq!(json["tarot"]["pile"]["length"], 1);
    let face_before = json["card"].clone();

    // Flip the pile top: same rank, other orientation.
    let (status, json) = send(
        &app,
        put(&format!("/api/games/{id}/tarot/flip"), Some(&amy)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["card"]["rank"], face_before["rank"]);
    assert_ne!(json["card"]["orientation"], face_before["orientation"]);
}

#[actix_web::test]
async fn flipping_an_empty_tarot_pile_is_a_noop() {
    let state = common::test_state();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let id = create_game(&app, json!({"players": ["Amy"]})).await;
    let token = issue_token(&app, id, 1).await;

    let (status, json) = send(
        &app,
        put(&format!("/api/games/{id}/tarot/flip"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["card"].is_null());
    assert_eq!(json["tarot"]["pile"]["length"], 0);
}

#[actix_web::test]
async fn bad_indexes_map_to_404_codes() {
    let state = common::test_state();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let id = create_game(&app, json!({"players": ["Amy"]})).await;

    // Unknown game.
    let ghost = issue_token(&app, id, 0).await;
    let (status, json) = send(&app, get("/api/games/999", Some(&ghost))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "GAME_NOT_FOUND");

    // Unknown seat: tokens are only minted for live pairs.
    let (status, json) = send(
        &app,
        post_json("/api/tokens", json!({"game_id": id, "player_id": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "PLAYER_NOT_FOUND");

    // Card index past the end of the hand.
    let amy = issue_token(&app, id, 1).await;
    let (status, json) = send(
        &app,
        put(&format!("/api/games/{id}/players/1/cards/99/discard"), Some(&amy)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "CARD_NOT_FOUND");

    // Malformed id segment.
    let (status, json) = send(&app, get("/api/games/not-a-number", Some(&amy))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_GAME_ID");
}

#[actix_web::test]
async fn create_validation() {
    let state = common::test_state();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let (status, json) = send(
        &app,
        post_json("/api/games", json!({"players": ["Amy"], "decks": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_DECKS");

    // Duplicate trumps would fabricate a second copy of the card.
    let (status, json) = send(
        &app,
        post_json(
            "/api/games",
            json!({"players": ["Amy", "Bo"], "trumps": ["tower", "tower"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_REQUEST");

    // More trumps than non-host seats.
    let (status, _) = send(
        &app,
        post_json(
            "/api/games",
            json!({"players": ["Amy"], "trumps": ["tower", "sun"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn deleted_games_stay_gone() {
    let state = common::test_state();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let first = create_game(&app, json!({"players": ["Amy"]})).await;
    let token = issue_token(&app, first, 0).await;

    let (status, json) = send(&app, delete(&format!("/api/games/{first}"), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], first);

    // The id is retired: reads 404, and a new game gets a fresh id.
    let (status, _) = send(&app, get(&format!("/api/games/{first}"), Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let second = create_game(&app, json!({"players": ["Bo"]})).await;
    assert_ne!(second, first);

    // A token minted for the dead game cannot reach the new one.
    let (status, _) = send(&app, get(&format!("/api/games/{second}"), Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn draw_from_exhausted_deck_is_a_noop() {
    let state = common::test_state();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    // Host + Amy at 27 each consume the whole 54-card deck.
    let id = create_game(&app, json!({"players": ["Amy"], "hand_size": 27})).await;
    let amy = issue_token(&app, id, 1).await;

    let (_, json) = send(&app, get(&format!("/api/games/{id}/deck"), Some(&amy))).await;
    assert_eq!(json["deck"]["length"], 0);

    let (status, json) = send(
        &app,
        put(&format!("/api/games/{id}/players/1/draw"), Some(&amy)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hand"].as_array().unwrap().len(), 27);
}
