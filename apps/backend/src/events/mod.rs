//! Typed pub/sub channel between the HTTP layer and the realtime fanout.
//!
//! Handlers publish after responding; the connection registry's pump task
//! is the subscriber. External serde tagging makes each variant serialize
//! as the envelope the table clients expect: `{"deck":{…}}`, `{"pile":{…}}`,
//! `{"hand":{…}}`, `{"tarot":{…}}`.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::{Card, TarotCard};

/// Buffered events per subscriber before the oldest are dropped. Fanout
/// keeps up with hand-driven traffic easily; the bound exists so a wedged
/// pump cannot grow memory.
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum GameEvent {
    Deck(DeckEvent),
    Pile(PileEvent),
    Hand(HandEvent),
    Tarot(TarotEvent),
}

impl GameEvent {
    /// The session the event belongs to; fanout filters on this.
    pub fn game_id(&self) -> u64 {
        match self {
            GameEvent::Deck(e) => e.id,
            GameEvent::Pile(e) => e.id,
            GameEvent::Hand(e) => e.id,
            GameEvent::Tarot(e) => e.id,
        }
    }
}

/// Draw-deck changed. `pid`/`player` name the actor when a draw caused it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeckEvent {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
}

/// Discard pile changed; `card` is the new face, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PileEvent {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
}

/// A hand changed through another player's action. Delivered only to the
/// destination seat `tid` (the player passed to, or picked from).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandEvent {
    pub id: u64,
    pub pid: u64,
    pub player: String,
    pub tid: u64,
}

/// Tarot subsystem changed; `card` is the tarot pile face, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TarotEvent {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<TarotCard>,
}

#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish an event. Having no subscriber (e.g. before the pump starts,
    /// or in tests) is not an error.
    pub fn publish(&self, event: GameEvent) {
        debug!(game_id = event.game_id(), ?event, "publishing event");
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
