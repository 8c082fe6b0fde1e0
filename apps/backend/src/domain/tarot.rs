//! Tarot card value types: the 22 major arcana plus an orientation.
//!
//! Orientation is the only mutable part of any card in the system. A card
//! drawn reversed reads differently at the table, so flips are first-class
//! and shuffling a tarot stack re-randomizes orientations (see
//! `collection::ShufflePolicy`).

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TarotRank {
    Fool,
    Magician,
    HighPriestess,
    Empress,
    Emperor,
    Hierophant,
    Lovers,
    Chariot,
    Strength,
    Hermit,
    WheelOfFortune,
    Justice,
    HangedMan,
    Death,
    Temperance,
    Devil,
    Tower,
    Star,
    Moon,
    Sun,
    Judgement,
    World,
}

impl TarotRank {
    pub const ALL: [TarotRank; 22] = [
        TarotRank::Fool,
        TarotRank::Magician,
        TarotRank::HighPriestess,
        TarotRank::Empress,
        TarotRank::Emperor,
        TarotRank::Hierophant,
        TarotRank::Lovers,
        TarotRank::Chariot,
        TarotRank::Strength,
        TarotRank::Hermit,
        TarotRank::WheelOfFortune,
        TarotRank::Justice,
        TarotRank::HangedMan,
        TarotRank::Death,
        TarotRank::Temperance,
        TarotRank::Devil,
        TarotRank::Tower,
        TarotRank::Star,
        TarotRank::Moon,
        TarotRank::Sun,
        TarotRank::Judgement,
        TarotRank::World,
    ];
}

impl Display for TarotRank {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            TarotRank::Fool => "the fool",
            TarotRank::Magician => "the magician",
            TarotRank::HighPriestess => "the high priestess",
            TarotRank::Empress => "the empress",
            TarotRank::Emperor => "the emperor",
            TarotRank::Hierophant => "the hierophant",
            TarotRank::Lovers => "the lovers",
            TarotRank::Chariot => "the chariot",
            TarotRank::Strength => "strength",
            TarotRank::Hermit => "the hermit",
            TarotRank::WheelOfFortune => "wheel of fortune",
            TarotRank::Justice => "justice",
            TarotRank::HangedMan => "the hanged man",
            TarotRank::Death => "death",
            TarotRank::Temperance => "temperance",
            TarotRank::Devil => "the devil",
            TarotRank::Tower => "the tower",
            TarotRank::Star => "the star",
            TarotRank::Moon => "the moon",
            TarotRank::Sun => "the sun",
            TarotRank::Judgement => "judgement",
            TarotRank::World => "the world",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    #[serde(rename = "U")]
    Upright,
    #[serde(rename = "R")]
    Reversed,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Upright => Orientation::Reversed,
            Orientation::Reversed => Orientation::Upright,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TarotCard {
    pub rank: TarotRank,
    pub orientation: Orientation,
}

impl TarotCard {
    pub fn upright(rank: TarotRank) -> Self {
        Self {
            rank,
            orientation: Orientation::Upright,
        }
    }

    pub fn flip(&mut self) {
        self.orientation = self.orientation.flipped();
    }
}

impl Display for TarotCard {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let facing = match self.orientation {
            Orientation::Upright => "upright",
            Orientation::Reversed => "reversed",
        };
        write!(f, "{} ({facing})", self.rank)
    }
}
