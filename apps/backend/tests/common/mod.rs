//! Shared helpers for HTTP-level tests: a test app over the real route
//! tree (middleware included) and small wrappers around the request dance.

// Each test binary compiles its own copy; not every binary uses every helper.
#![allow(dead_code)]

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, Error};
use serde_json::Value;

use decks_backend::state::app_state::AppState;
use decks_backend::state::security_config::SecurityConfig;

pub const TEST_JWT_SECRET: &[u8] = b"test_secret_key_for_testing_purposes_only";

pub fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState::new(SecurityConfig::new(TEST_JWT_SECRET)))
}

/// Build the service under test. Usage:
/// ```ignore
/// let state = common::test_state();
/// let app = test::init_service(
///     App::new().app_data(state.clone()).configure(routes::configure),
/// ).await;
/// ```
/// (init_service's opaque return type keeps this as a documented pattern
/// rather than a helper function.)
pub async fn send(
    app: &impl Service<Request, Response = ServiceResponse, Error = Error>,
    req: Request,
) -> (StatusCode, Value) {
    let res = test::call_service(app, req).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

pub fn get(path: &str, token: Option<&str>) -> Request {
    let mut req = test::TestRequest::get().uri(path);
    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {token}")));
    }
    req.to_request()
}

pub fn put(path: &str, token: Option<&str>) -> Request {
    let mut req = test::TestRequest::put().uri(path);
    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {token}")));
    }
    req.to_request()
}

pub fn delete(path: &str, token: Option<&str>) -> Request {
    let mut req = test::TestRequest::delete().uri(path);
    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {token}")));
    }
    req.to_request()
}

pub fn post_json(path: &str, body: Value) -> Request {
    test::TestRequest::post().uri(path).set_json(body).to_request()
}

/// Create a game through the API and return its id.
pub async fn create_game(
    app: &impl Service<Request, Response = ServiceResponse, Error = Error>,
    body: Value,
) -> u64 {
    let (status, json) = send(app, post_json("/api/games", body)).await;
    assert_eq!(status, StatusCode::OK, "create_game failed: {json}");
    json["id"].as_u64().expect("create response carries an id")
}

/// Fetch a token for a (game, player) pair through the API.
pub async fn issue_token(
    app: &impl Service<Request, Response = ServiceResponse, Error = Error>,
    game_id: u64,
    player_id: u64,
) -> String {
    let (status, json) = send(
        app,
        post_json(
            "/api/tokens",
            serde_json::json!({"game_id": game_id, "player_id": player_id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "issue_token failed: {json}");
    json["token"].as_str().expect("token in response").to_string()
}
