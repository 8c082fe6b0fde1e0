//! Connection registry and event fanout.
//!
//! Each open, authenticated websocket owns one registry entry keyed by
//! (game, player, peer address). The pump task bridges the in-process
//! event bus to the registry: deck/pile/tarot events go to every entry of
//! the affected game, hand events only to entries for the destination
//! seat. Entries whose mailbox has closed are pruned during fanout; there
//! is no sweep timer.

use std::sync::Arc;

use actix::prelude::*;
use dashmap::DashMap;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::events::{EventBus, GameEvent};

/// An event on its way out to one connection.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Outbound(pub GameEvent);

/// The authenticated identity of a connection: which seat at which table,
/// from which remote endpoint. One browser tab = one peer address = one
/// entry; re-registering the same triple supersedes the old entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnKey {
    pub game_id: u64,
    pub player_id: u64,
    pub peer: String,
}

struct Entry {
    conn_id: Uuid,
    recipient: Recipient<Outbound>,
}

#[derive(Default)]
pub struct ConnectionRegistry {
    connections: DashMap<ConnKey, Entry>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Record an authenticated connection, replacing any prior entry for
    /// the same key (a reconnect silently supersedes a stale one).
    pub fn register(&self, key: ConnKey, conn_id: Uuid, recipient: Recipient<Outbound>) {
        info!(?key, %conn_id, "registering connection");
        self.connections.insert(key, Entry { conn_id, recipient });
    }

    /// Drop a connection's entry. A newer connection that already replaced
    /// the entry is left alone, which is why the conn id is checked.
    pub fn unregister(&self, key: &ConnKey, conn_id: Uuid) {
        let removed = self
            .connections
            .remove_if(key, |_, entry| entry.conn_id == conn_id);
        if removed.is_some() {
            info!(?key, %conn_id, "unregistered connection");
        }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Push one event to every connection it is addressed to. A closed
    /// mailbox gets its entry pruned; one bad connection never blocks the
    /// others.
    pub fn deliver(&self, event: &GameEvent) {
        let game_id = event.game_id();
        let only_player = match event {
            GameEvent::Hand(hand) => Some(hand.tid),
            _ => None,
        };

        let mut stale: Vec<(ConnKey, Uuid)> = Vec::new();
        for entry in self.connections.iter() {
            let key = entry.key();
            if key.game_id != game_id {
                continue;
            }
            if let Some(player_id) = only_player {
                if key.player_id != player_id {
                    continue;
                }
            }
            if entry.value().recipient.try_send(Outbound(event.clone())).is_err() {
                stale.push((key.clone(), entry.value().conn_id));
            } else {
                debug!(?key, "delivered event");
            }
        }

        // Removal happens outside the iteration to keep DashMap shards
        // unlocked while we hold iterator guards.
        for (key, conn_id) in stale {
            warn!(?key, "pruning closed connection");
            self.unregister(&key, conn_id);
        }
    }
}

/// Subscribe the registry to the bus for the life of the process. Lagging
/// (the pump overrun by `EVENT_CHANNEL_CAPACITY` unread events) drops the
/// oldest events and keeps going.
pub fn spawn_event_pump(registry: Arc<ConnectionRegistry>, bus: &EventBus) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => registry.deliver(&event),
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "event pump lagged; skipped events");
                }
                Err(RecvError::Closed) => {
                    info!("event bus closed; fanout pump exiting");
                    break;
                }
            }
        }
    });
}
