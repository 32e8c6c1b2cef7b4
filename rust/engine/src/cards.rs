use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// Represents one of the four suits of the 40-card Spanish deck.
/// The ordinal of a suit is the hundreds digit of a card code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Oros (coins), ordinal 0
    Oros,
    /// Copas (cups), ordinal 1
    Copas,
    /// Espadas (swords), ordinal 2
    Espadas,
    /// Bastos (clubs), ordinal 3
    Bastos,
}

impl Suit {
    pub fn ordinal(self) -> u16 {
        self as u16
    }

    pub fn from_ordinal(v: u16) -> Option<Suit> {
        match v {
            0 => Some(Suit::Oros),
            1 => Some(Suit::Copas),
            2 => Some(Suit::Espadas),
            3 => Some(Suit::Bastos),
            _ => None,
        }
    }

    /// Single-letter tag used in short card notation (`5O`, `12E`).
    pub fn letter(self) -> char {
        match self {
            Suit::Oros => 'O',
            Suit::Copas => 'C',
            Suit::Espadas => 'E',
            Suit::Bastos => 'B',
        }
    }

    pub fn from_letter(c: char) -> Option<Suit> {
        match c.to_ascii_uppercase() {
            'O' => Some(Suit::Oros),
            'C' => Some(Suit::Copas),
            'E' => Some(Suit::Espadas),
            'B' => Some(Suit::Bastos),
            _ => None,
        }
    }
}

/// Represents the rank of a card. Ranks 8 and 9 do not exist in this deck,
/// so the numeric values jump from 7 straight to 10.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// As (1)
    One = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    /// Sota (10)
    Ten = 10,
    /// Caballo (11)
    Eleven,
    /// Rey (12)
    Twelve,
}

impl Rank {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_u8(v: u8) -> Option<Rank> {
        match v {
            1 => Some(Rank::One),
            2 => Some(Rank::Two),
            3 => Some(Rank::Three),
            4 => Some(Rank::Four),
            5 => Some(Rank::Five),
            6 => Some(Rank::Six),
            7 => Some(Rank::Seven),
            10 => Some(Rank::Ten),
            11 => Some(Rank::Eleven),
            12 => Some(Rank::Twelve),
            _ => None,
        }
    }

    /// The rank numerically one above, if it exists. `Seven` has none.
    pub fn succ(self) -> Option<Rank> {
        Rank::from_u8(self.value() + 1)
    }

    /// The rank numerically one below, if it exists. `Ten` has none.
    pub fn pred(self) -> Option<Rank> {
        self.value().checked_sub(1).and_then(Rank::from_u8)
    }

    pub fn is_adjacent(self, other: Rank) -> bool {
        self.value().abs_diff(other.value()) == 1
    }
}

/// A single playing card. Cards are plain values; equality is by suit and rank.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// Compact integer code: `suit_ordinal * 100 + rank_value`.
    pub fn code(self) -> u16 {
        self.suit.ordinal() * 100 + u16::from(self.rank.value())
    }

    pub fn from_code(code: u16) -> Result<Card, GameError> {
        let suit = Suit::from_ordinal(code / 100);
        let rank = u8::try_from(code % 100).ok().and_then(Rank::from_u8);
        match (suit, rank) {
            (Some(suit), Some(rank)) => Ok(Card { suit, rank }),
            _ => Err(GameError::InvalidCardCode { code }),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.value(), self.suit.letter())
    }
}

pub fn encode(card: Card) -> u16 {
    card.code()
}

pub fn decode(code: u16) -> Result<Card, GameError> {
    Card::from_code(code)
}

pub fn encode_all(cards: &[Card]) -> Vec<u16> {
    cards.iter().map(|c| c.code()).collect()
}

pub fn decode_all(codes: &[u16]) -> Result<Vec<Card>, GameError> {
    codes.iter().map(|&c| Card::from_code(c)).collect()
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Oros, Suit::Copas, Suit::Espadas, Suit::Bastos]
}

pub fn all_ranks() -> [Rank; 10] {
    [
        Rank::One,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Ten,
        Rank::Eleven,
        Rank::Twelve,
    ]
}

/// The 40 cards in canonical order: suits by ordinal, ranks ascending.
pub fn full_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(40);
    for &s in &all_suits() {
        for &r in &all_ranks() {
            v.push(Card { suit: s, rank: r });
        }
    }
    v
}
