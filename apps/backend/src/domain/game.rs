//! A live table: one draw deck, one discard pile, one hand per player, and
//! the parallel tarot deck/pile/hands.
//!
//! Every operation moves cards between the session's own collections and
//! nothing else, so the multiset of cards in play is fixed at construction.
//! Drawing from an empty source is a no-op rather than an error; the
//! stale-view cases that deserve errors are bad player and card indexes.

use rand::Rng;

use crate::errors::domain::{DomainError, NotFoundKind};

use super::cards::{Card, Rank, Suit};
use super::collection::{CardStack, ShufflePolicy, DEFAULT_SHUFFLE_PASSES};
use super::tarot::{TarotCard, TarotRank};

/// Display name of the synthetic player occupying seat 0. Its hand is dealt
/// like any other; it exists so shared flows (e.g. an exposed dummy hand)
/// have a seat that no human claims.
pub const HOST_NAME: &str = "Host";

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Number of 52-card sets in the draw deck.
    pub decks: usize,
    /// Jokers added per 52-card set.
    pub jokers: usize,
    /// Cards dealt to every seat (host included) at construction.
    pub hand_size: usize,
    pub shuffle_passes: usize,
    /// Tarot ranks withheld from the shared tarot deck and pre-dealt to
    /// seats 1.. in order.
    pub trumps: Vec<TarotRank>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            decks: 1,
            jokers: 2,
            hand_size: 4,
            shuffle_passes: DEFAULT_SHUFFLE_PASSES,
            trumps: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct GameSession {
    players: Vec<String>,
    deck: CardStack<Card>,
    pile: CardStack<Card>,
    hands: Vec<CardStack<Card>>,
    tarot_deck: CardStack<TarotCard>,
    tarot_pile: CardStack<TarotCard>,
    tarot_hands: Vec<CardStack<TarotCard>>,
    shuffle_passes: usize,
}

impl GameSession {
    /// Build a fully-populated session: shuffled deck, dealt hands, tarot
    /// deck minus the reserved trumps. `players` excludes the host seat,
    /// which is prepended here.
    pub fn new<R: Rng + ?Sized>(
        players: &[String],
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<Self, DomainError> {
        if config.trumps.len() > players.len() {
            return Err(DomainError::validation(
                "more trumps reserved than players to hold them",
            ));
        }
        for (i, trump) in config.trumps.iter().enumerate() {
            if config.trumps[..i].contains(trump) {
                return Err(DomainError::validation(format!(
                    "trump {trump} reserved twice"
                )));
            }
        }

        let mut roster = Vec::with_capacity(players.len() + 1);
        roster.push(HOST_NAME.to_string());
        roster.extend(players.iter().cloned());

        let mut deck = build_draw_deck(config.decks, config.jokers);
        deck.shuffle(config.shuffle_passes, rng);

        let mut hands: Vec<CardStack<Card>> = Vec::with_capacity(roster.len());
        for _ in &roster {
            let mut hand = CardStack::new(ShufflePolicy::Plain);
            for _ in 0..config.hand_size {
                if let Some(card) = deck.pop_front() {
                    hand.push_back(card);
                }
            }
            hands.push(hand);
        }

        let mut tarot_deck = CardStack::new(ShufflePolicy::Reorient);
        for rank in TarotRank::ALL {
            if !config.trumps.contains(&rank) {
                tarot_deck.push_back(TarotCard::upright(rank));
            }
        }
        tarot_deck.shuffle(config.shuffle_passes, rng);

        let mut tarot_hands: Vec<CardStack<TarotCard>> = Vec::with_capacity(roster.len());
        for seat in 0..roster.len() {
            let mut hand = CardStack::new(ShufflePolicy::Reorient);
            // Seat 0 is the host; trumps go to seats 1.. in reservation order.
            if seat > 0 {
                if let Some(rank) = config.trumps.get(seat - 1) {
                    hand.push_back(TarotCard::upright(*rank));
                }
            }
            tarot_hands.push(hand);
        }

        Ok(Self {
            players: roster,
            deck,
            pile: CardStack::new(ShufflePolicy::Plain),
            hands,
            tarot_deck,
            tarot_pile: CardStack::new(ShufflePolicy::Reorient),
            tarot_hands,
            shuffle_passes: config.shuffle_passes,
        })
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn player_name(&self, player: usize) -> Result<&str, DomainError> {
        self.players
            .get(player)
            .map(String::as_str)
            .ok_or_else(|| player_not_found(player))
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn pile_len(&self) -> usize {
        self.pile.len()
    }

    pub fn pile_face(&self) -> Option<&Card> {
        self.pile.front()
    }

    pub fn hand(&self, player: usize) -> Result<&CardStack<Card>, DomainError> {
        self.hands.get(player).ok_or_else(|| player_not_found(player))
    }

    pub fn card(&self, player: usize, index: usize) -> Result<&Card, DomainError> {
        self.hand(player)?
            .get(index)
            .ok_or_else(|| card_not_found(player, index))
    }

    /// Deck front to the back of `player`'s hand. No-op when the deck is
    /// out of cards.
    pub fn draw_card(&mut self, player: usize) -> Result<(), DomainError> {
        self.check_player(player)?;
        if let Some(card) = self.deck.pop_front() {
            self.hands[player].push_back(card);
        }
        Ok(())
    }

    /// Hand card at `index` to the face of the pile. Returns the moved card.
    pub fn discard_card(&mut self, player: usize, index: usize) -> Result<Card, DomainError> {
        self.check_player(player)?;
        let card = self.hands[player]
            .remove_at(index)
            .ok_or_else(|| card_not_found(player, index))?;
        self.pile.push_front(card);
        Ok(card)
    }

    /// Pile face back into `player`'s hand. No-op when the pile is empty.
    pub fn recycle_from_pile(&mut self, player: usize) -> Result<(), DomainError> {
        self.check_player(player)?;
        if let Some(card) = self.pile.pop_front() {
            self.hands[player].push_back(card);
        }
        Ok(())
    }

    /// Move the card at `index` from one hand to the back of another.
    pub fn pass_card(&mut self, from: usize, index: usize, to: usize) -> Result<(), DomainError> {
        self.check_player(from)?;
        self.check_player(to)?;
        let card = self.hands[from]
            .remove_at(index)
            .ok_or_else(|| card_not_found(from, index))?;
        self.hands[to].push_back(card);
        Ok(())
    }

    /// Take a uniformly random card out of `from`'s hand into `player`'s.
    /// No-op when `from` holds nothing.
    pub fn pick_random_from<R: Rng + ?Sized>(
        &mut self,
        player: usize,
        from: usize,
        rng: &mut R,
    ) -> Result<(), DomainError> {
        self.check_player(player)?;
        self.check_player(from)?;
        if self.hands[from].is_empty() {
            return Ok(());
        }
        let index = rng.random_range(0..self.hands[from].len());
        if let Some(card) = self.hands[from].remove_at(index) {
            self.hands[player].push_back(card);
        }
        Ok(())
    }

    /// Fold the whole pile back into the deck and shuffle it.
    pub fn reshuffle_discard_into_deck<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        while let Some(card) = self.pile.pop_back() {
            self.deck.push_back(card);
        }
        self.deck.shuffle(self.shuffle_passes, rng);
    }

    /// Deck front straight onto the pile, seeding the discard without any
    /// player involved. No-op when the deck is empty.
    pub fn discard_deck_top(&mut self) -> Option<Card> {
        let card = self.deck.pop_front()?;
        self.pile.push_front(card);
        Some(card)
    }

    /// Undo of `discard_deck_top`: pile face back onto the deck front.
    /// No-op when the pile is empty.
    pub fn recycle_to_deck(&mut self) {
        if let Some(card) = self.pile.pop_front() {
            self.deck.push_front(card);
        }
    }

    pub fn tarot_deck_len(&self) -> usize {
        self.tarot_deck.len()
    }

    pub fn tarot_pile_len(&self) -> usize {
        self.tarot_pile.len()
    }

    pub fn tarot_pile_face(&self) -> Option<&TarotCard> {
        self.tarot_pile.front()
    }

    pub fn tarot_hand(&self, player: usize) -> Result<&CardStack<TarotCard>, DomainError> {
        self.tarot_hands
            .get(player)
            .ok_or_else(|| player_not_found(player))
    }

    /// Tarot deck front to the back of `player`'s tarot hand. No-op when
    /// the tarot deck is exhausted.
    pub fn tarot_draw(&mut self, player: usize) -> Result<(), DomainError> {
        self.check_player(player)?;
        if let Some(card) = self.tarot_deck.pop_front() {
            self.tarot_hands[player].push_back(card);
        }
        Ok(())
    }

    /// Tarot hand card at `index` to the face of the tarot pile.
    pub fn tarot_discard(&mut self, player: usize, index: usize) -> Result<TarotCard, DomainError> {
        self.check_player(player)?;
        let card = self.tarot_hands[player]
            .remove_at(index)
            .ok_or_else(|| card_not_found(player, index))?;
        self.tarot_pile.push_front(card);
        Ok(card)
    }

    /// Flip the facing of the tarot pile's top card. No-op (returning None)
    /// when the pile is empty.
    pub fn tarot_flip_pile_top(&mut self) -> Option<&TarotCard> {
        let card = self.tarot_pile.front_mut()?;
        card.flip();
        Some(&*card)
    }

    /// Playing cards in the session, wherever they sit. Constant for the
    /// session's lifetime.
    pub fn total_card_count(&self) -> usize {
        self.deck.len()
            + self.pile.len()
            + self.hands.iter().map(CardStack::len).sum::<usize>()
    }

    /// Tarot cards in the session. Also constant.
    pub fn total_tarot_count(&self) -> usize {
        self.tarot_deck.len()
            + self.tarot_pile.len()
            + self.tarot_hands.iter().map(CardStack::len).sum::<usize>()
    }

    fn check_player(&self, player: usize) -> Result<(), DomainError> {
        if player < self.players.len() {
            Ok(())
        } else {
            Err(player_not_found(player))
        }
    }
}

fn build_draw_deck(decks: usize, jokers: usize) -> CardStack<Card> {
    let mut cards = CardStack::new(ShufflePolicy::Plain);
    for deck in 0..decks {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push_back(Card::new(suit, rank, deck as u8));
            }
        }
        for _ in 0..jokers {
            cards.push_back(Card::joker(deck as u8));
        }
    }
    cards
}

fn player_not_found(player: usize) -> DomainError {
    DomainError::not_found(NotFoundKind::Player, format!("no player at seat {player}"))
}

fn card_not_found(player: usize, index: usize) -> DomainError {
    DomainError::not_found(
        NotFoundKind::Card,
        format!("no card at index {index} in seat {player}'s hand"),
    )
}
