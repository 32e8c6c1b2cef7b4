use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

/// A combination declared from a freshly dealt hand.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationKind {
    /// Exactly two cards of one rank.
    Ronda,
    /// Exactly three cards of one rank.
    Tringa,
}

impl CombinationKind {
    pub fn points(self) -> u32 {
        match self {
            CombinationKind::Ronda => 1,
            CombinationKind::Tringa => 5,
        }
    }

    fn size(self) -> usize {
        match self {
            CombinationKind::Ronda => 2,
            CombinationKind::Tringa => 3,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub kind: CombinationKind,
    pub rank: Rank,
}

/// Combinations present in `hand`, at most one per kind. When several ranks
/// qualify for a kind the highest one is announced.
pub fn detect_combinations(hand: &[Card]) -> Vec<Combination> {
    let mut counts = [0usize; 13];
    for c in hand {
        counts[c.rank.value() as usize] += 1;
    }

    [CombinationKind::Ronda, CombinationKind::Tringa]
        .into_iter()
        .filter_map(|kind| {
            (1u8..=12)
                .rev()
                .filter(|&v| counts[v as usize] == kind.size())
                .find_map(Rank::from_u8)
                .map(|rank| Combination { kind, rank })
        })
        .collect()
}

/// Tracks which combination kinds have already scored this round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationFlags {
    ronda: bool,
    tringa: bool,
}

impl CombinationFlags {
    /// Marks `kind` as scored. Returns false if it already was.
    pub fn claim(&mut self, kind: CombinationKind) -> bool {
        let flag = match kind {
            CombinationKind::Ronda => &mut self.ronda,
            CombinationKind::Tringa => &mut self.tringa,
        };
        !std::mem::replace(flag, true)
    }

    pub fn is_claimed(&self, kind: CombinationKind) -> bool {
        match kind {
            CombinationKind::Ronda => self.ronda,
            CombinationKind::Tringa => self.tringa,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    #[test]
    fn triple_is_a_tringa_not_a_ronda() {
        let hand = [
            Card::new(Suit::Oros, Rank::Eleven),
            Card::new(Suit::Copas, Rank::Eleven),
            Card::new(Suit::Bastos, Rank::Eleven),
        ];
        assert_eq!(
            detect_combinations(&hand),
            vec![Combination {
                kind: CombinationKind::Tringa,
                rank: Rank::Eleven
            }]
        );
    }

    #[test]
    fn flags_claim_once() {
        let mut flags = CombinationFlags::default();
        assert!(flags.claim(CombinationKind::Ronda));
        assert!(!flags.claim(CombinationKind::Ronda));
        assert!(flags.claim(CombinationKind::Tringa));
        flags.reset();
        assert!(!flags.is_claimed(CombinationKind::Ronda));
    }
}
