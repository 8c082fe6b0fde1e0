//! Realtime wire contract.
//!
//! A client sends exactly one meaningful message, the registration, and
//! afterwards only the keep-alive sentinel. Everything the server sends is
//! either an event envelope (`events::GameEvent` serialized as
//! `{"deck":{…}}` etc.) or the echoed sentinel. Registration is never
//! acknowledged; failure closes the socket.

use serde::{Deserialize, Serialize};

/// Application-level keep-alive sentinel: an empty JSON object, echoed
/// verbatim. Kept apart from the event envelopes so liveness traffic never
/// enters domain-event handling.
pub const KEEPALIVE: &str = "{}";

/// First (and only) client message: claim a seat on a table. The token must
/// be scoped to exactly this (game, player) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Register {
    pub id: u64,
    pub pid: u64,
    pub token: String,
}
