//! Per-connection websocket actor.
//!
//! A fresh socket is anonymous. The first real message must be a
//! `Register` carrying a token scoped to the (game, player) it names;
//! anything short of that (bad JSON, bad token, wrong scope, unknown game
//! or seat) closes the socket without a reply. Registration is silent on
//! success: the next thing a client hears is an event envelope or its own
//! keep-alive coming back.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth;
use crate::state::app_state::AppState;
use crate::ws::hub::{ConnKey, ConnectionRegistry, Outbound};
use crate::ws::protocol::{Register, KEEPALIVE};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

/// The whole gate a registration must pass: a valid token, scoped to
/// exactly the (game, player) being claimed, for a game that is live and a
/// seat that exists.
fn authorize_registration(
    app_state: &AppState,
    msg: &Register,
) -> Result<(), crate::error::AppError> {
    let claims = auth::verify_access_token(&msg.token, &app_state.security)?;
    auth::authorize(&claims, msg.id, Some(msg.pid))?;

    let store = app_state.store.read();
    let game = store.get(msg.id).ok_or_else(|| {
        crate::error::AppError::not_found("GAME_NOT_FOUND", format!("Game {} not found", msg.id))
    })?;
    if msg.pid as usize >= game.players().len() {
        return Err(crate::error::AppError::not_found(
            "PLAYER_NOT_FOUND",
            format!("No player {} in game {}", msg.pid, msg.id),
        ));
    }
    Ok(())
}

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let conn_id = Uuid::new_v4();
    // The registry key needs the origin; a missing peer address (unit-test
    // transports) falls back to the connection id, which is unique anyway.
    let peer = req
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| conn_id.to_string());

    let session = WsSession::new(conn_id, peer, app_state);
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    peer: String,
    app_state: web::Data<AppState>,
    registry: Arc<ConnectionRegistry>,
    registered: Option<ConnKey>,
    last_heartbeat: Instant,
}

impl WsSession {
    fn new(conn_id: Uuid, peer: String, app_state: web::Data<AppState>) -> Self {
        let registry = app_state.registry.clone();
        Self {
            conn_id,
            peer,
            app_state,
            registry,
            registered: None,
            last_heartbeat: Instant::now(),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    peer = %actor.peer,
                    "heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn close_on_refusal(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        reason: &str,
    ) {
        warn!(conn_id = %self.conn_id, peer = %self.peer, reason, "refusing registration");
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Policy)));
        ctx.stop();
    }

    /// Validate a registration end to end, then record the connection.
    fn handle_register(&mut self, msg: Register, ctx: &mut ws::WebsocketContext<Self>) {
        if let Err(err) = authorize_registration(&self.app_state, &msg) {
            self.close_on_refusal(ctx, &format!("registration rejected: {err}"));
            return;
        }

        // Re-registering on the same socket (e.g. the client switched
        // seats) supersedes its previous entry.
        if let Some(old) = self.registered.take() {
            self.registry.unregister(&old, self.conn_id);
        }

        let key = ConnKey {
            game_id: msg.id,
            player_id: msg.pid,
            peer: self.peer.clone(),
        };
        self.registry
            .register(key.clone(), self.conn_id, ctx.address().recipient());
        self.registered = Some(key);
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, peer = %self.peer, "websocket connected");
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(key) = self.registered.take() {
            self.registry.unregister(&key, self.conn_id);
        }
        info!(conn_id = %self.conn_id, peer = %self.peer, "websocket closed");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                let trimmed = text.trim();
                if trimmed.is_empty() || trimmed == KEEPALIVE {
                    ctx.text(KEEPALIVE);
                    return;
                }

                match serde_json::from_str::<Register>(trimmed) {
                    Ok(register) => self.handle_register(register, ctx),
                    Err(_) => self.close_on_refusal(ctx, "malformed registration"),
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.close_on_refusal(ctx, "binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(conn_id = %self.conn_id, peer = %self.peer, error = %err, "protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<Outbound> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Outbound, ctx: &mut Self::Context) -> Self::Result {
        match serde_json::to_string(&msg.0) {
            Ok(payload) => ctx.text(payload),
            // Isolated: a bad envelope skips this delivery, nothing else.
            Err(err) => warn!(conn_id = %self.conn_id, error = %err, "failed to serialize event"),
        }
    }
}
