//! Registry of live game sessions.
//!
//! Ids are slot indexes handed out monotonically and never reused: a
//! deleted slot stays `None` for the life of the process, so a stale id in
//! a client, a token, or a connection-registry entry addresses nothing
//! instead of silently addressing a newer session.

use crate::domain::GameSession;
use crate::errors::domain::{DomainError, NotFoundKind};

#[derive(Debug, Default)]
pub struct SessionStore {
    slots: Vec<Option<GameSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session and return its id.
    pub fn insert(&mut self, game: GameSession) -> u64 {
        self.slots.push(Some(game));
        (self.slots.len() - 1) as u64
    }

    pub fn get(&self, id: u64) -> Option<&GameSession> {
        self.slots.get(id as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut GameSession> {
        self.slots.get_mut(id as usize).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    /// Remove a session. The slot is retired, not freed.
    pub fn remove(&mut self, id: u64) -> Result<GameSession, DomainError> {
        self.slots
            .get_mut(id as usize)
            .and_then(Option::take)
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Game, format!("no game with id {id}"))
            })
    }

    /// Ids of live sessions, in creation order.
    pub fn ids(&self) -> Vec<u64> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| i as u64))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
