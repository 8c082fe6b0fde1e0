//! Ordered card collection shared by decks, piles, and hands.
//!
//! One generic stack type covers both card families; the tarot-specific
//! behavior (orientation churn while shuffling) is selected by a
//! `ShufflePolicy` tag on the stack instead of a subtype.

use std::collections::VecDeque;

use rand::Rng;

use super::cards::Card;
use super::tarot::TarotCard;

/// Number of Fisher–Yates passes a shuffle runs by default. One pass is
/// already a uniform permutation; the extra passes are a robustness margin
/// against a weak RNG and stay tunable through `GameConfig`.
pub const DEFAULT_SHUFFLE_PASSES: usize = 10;

/// Cards that can change facing. Plain playing cards have no facing, so
/// their flip is a no-op; a `Plain`-policy stack never invokes it.
pub trait Flip {
    fn flip(&mut self);
}

impl Flip for Card {
    fn flip(&mut self) {}
}

impl Flip for TarotCard {
    fn flip(&mut self) {
        TarotCard::flip(self);
    }
}

/// What a shuffle does beyond permuting: `Reorient` flips each visited
/// position with probability 1/2 per pass, so tarot orientations come out
/// of a shuffle as fresh coin tosses.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShufflePolicy {
    Plain,
    Reorient,
}

#[derive(Debug, Clone)]
pub struct CardStack<C> {
    cards: VecDeque<C>,
    policy: ShufflePolicy,
}

impl<C: Flip> CardStack<C> {
    pub fn new(policy: ShufflePolicy) -> Self {
        Self {
            cards: VecDeque::new(),
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn push_front(&mut self, card: C) {
        self.cards.push_front(card);
    }

    pub fn push_back(&mut self, card: C) {
        self.cards.push_back(card);
    }

    pub fn pop_front(&mut self) -> Option<C> {
        self.cards.pop_front()
    }

    pub fn pop_back(&mut self) -> Option<C> {
        self.cards.pop_back()
    }

    /// Remove and return the card at `index`, or None when out of range.
    pub fn remove_at(&mut self, index: usize) -> Option<C> {
        self.cards.remove(index)
    }

    pub fn get(&self, index: usize) -> Option<&C> {
        self.cards.get(index)
    }

    pub fn front(&self) -> Option<&C> {
        self.cards.front()
    }

    pub fn front_mut(&mut self) -> Option<&mut C> {
        self.cards.front_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.cards.iter()
    }

    /// In-place Fisher–Yates, repeated `passes` times. Under the
    /// `Reorient` policy each visited position additionally flips with
    /// probability 1/2 per pass.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, passes: usize, rng: &mut R) {
        for _ in 0..passes {
            for i in (1..self.cards.len()).rev() {
                let j = rng.random_range(0..=i);
                self.cards.swap(i, j);
                if self.policy == ShufflePolicy::Reorient && rng.random_bool(0.5) {
                    self.cards[i].flip();
                }
            }
        }
    }
}

impl<C: Flip + Clone> CardStack<C> {
    pub fn to_vec(&self) -> Vec<C> {
        self.cards.iter().cloned().collect()
    }
}

impl<C: Flip> FromIterator<C> for CardStack<C> {
    /// Collects into a `Plain` stack; tarot stacks are built explicitly.
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
            policy: ShufflePolicy::Plain,
        }
    }
}
