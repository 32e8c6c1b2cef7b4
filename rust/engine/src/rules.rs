use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};
use crate::player::PlayerId;

pub const TABLE_DEAL_SIZE: usize = 4;
pub const HAND_SIZE: usize = 3;
pub const MAX_TABLE_DEAL_ATTEMPTS: u32 = 100;

pub const WAHED_POINTS: u32 = 1;
pub const KHAMSA_POINTS: u32 = 5;
pub const ASHRA_POINTS: u32 = 10;
pub const MISSA_POINTS: u32 = 1;
pub const FINAL_THROW_POINTS: u32 = 5;
pub const MISSA_MIN_RUN: usize = 3;
pub const EXTRA_CARD_CAP: u32 = 20;
pub const DEFAULT_TARGET_SCORE: u32 = 41;
pub const DEFAULT_TURN_LIMIT_SECS: u64 = 30;
pub const DEFAULT_TURN_WARNING_SECS: u64 = 10;

/// How the base points of a capture are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// One point per captured table card.
    #[default]
    CardCount,
    /// Two points for the match plus the length of the longest captured run.
    MatchPlusRun,
}

impl ScoringPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoringPolicy::CardCount => "card_count",
            ScoringPolicy::MatchPlusRun => "match_plus_run",
        }
    }
}

impl std::str::FromStr for ScoringPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "card_count" => Ok(ScoringPolicy::CardCount),
            "match_plus_run" => Ok(ScoringPolicy::MatchPlusRun),
            other => Err(format!(
                "unknown scoring policy '{}' (expected card_count or match_plus_run)",
                other
            )),
        }
    }
}

/// Tunable rules of a game. Every field has a default so partial TOML or
/// JSON documents deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub scoring: ScoringPolicy,
    /// When false the played card of a capture goes to the discard pile.
    pub played_card_to_pile: bool,
    pub target_score: u32,
    pub turn_limit_secs: u64,
    pub turn_warning_secs: u64,
    pub max_table_deal_attempts: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            scoring: ScoringPolicy::default(),
            played_card_to_pile: true,
            target_score: DEFAULT_TARGET_SCORE,
            turn_limit_secs: DEFAULT_TURN_LIMIT_SECS,
            turn_warning_secs: DEFAULT_TURN_WARNING_SECS,
            max_table_deal_attempts: MAX_TABLE_DEAL_ATTEMPTS,
        }
    }
}

impl RuleSet {
    pub fn validate(&self) -> Result<(), String> {
        if self.turn_limit_secs == 0 {
            return Err("turn_limit_secs must be greater than 0".to_string());
        }
        if self.turn_warning_secs >= self.turn_limit_secs {
            return Err(format!(
                "turn_warning_secs ({}) must be less than turn_limit_secs ({})",
                self.turn_warning_secs, self.turn_limit_secs
            ));
        }
        if self.max_table_deal_attempts == 0 {
            return Err("max_table_deal_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}

/// True iff some table card shares the played card's rank.
pub fn can_capture(played: Card, table: &[Card]) -> bool {
    table.iter().any(|c| c.rank == played.rank)
}

/// Resolves the mandatory capture for `played` against `table`.
///
/// Every table card matching the played rank is taken, and from each match the
/// sequence is extended upward and downward one rank at a time, each step
/// picking the first table card (in table order) of the next rank. The result
/// is deduplicated and returned in table order. An empty vector means the card
/// cannot capture.
///
/// ```
/// use ronda_engine::cards::{Card, Rank, Suit};
/// use ronda_engine::rules::capture_set;
///
/// let c = |r| Card::new(Suit::Oros, r);
/// let table = [c(Rank::Five), c(Rank::Six), c(Rank::Seven), c(Rank::Ten)];
/// let captured = capture_set(Card::new(Suit::Copas, Rank::Five), &table);
/// assert_eq!(captured, vec![c(Rank::Five), c(Rank::Six), c(Rank::Seven)]);
/// ```
pub fn capture_set(played: Card, table: &[Card]) -> Vec<Card> {
    let mut picked = vec![false; table.len()];
    let first_of = |rank: Rank| table.iter().position(|c| c.rank == rank);

    for (idx, card) in table.iter().enumerate() {
        if card.rank != played.rank {
            continue;
        }
        picked[idx] = true;

        let mut cur = card.rank;
        while let Some(pos) = cur.succ().and_then(first_of) {
            picked[pos] = true;
            cur = table[pos].rank;
        }
        let mut cur = card.rank;
        while let Some(pos) = cur.pred().and_then(first_of) {
            picked[pos] = true;
            cur = table[pos].rank;
        }
    }

    table
        .iter()
        .zip(picked)
        .filter_map(|(c, p)| p.then_some(*c))
        .collect()
}

/// Length of the longest run of adjacent distinct ranks among `cards`.
pub fn longest_run(cards: &[Card]) -> usize {
    let mut values: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    values.sort_unstable();
    values.dedup();

    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<u8> = None;
    for v in values {
        run = match prev {
            Some(p) if v == p + 1 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(v);
    }
    best
}

/// A run of at least three adjacent ranks, all of them 7 or below.
pub fn is_missa(cards: &[Card]) -> bool {
    let low: Vec<Card> = cards
        .iter()
        .copied()
        .filter(|c| c.rank.value() <= Rank::Seven.value())
        .collect();
    longest_run(&low) >= MISSA_MIN_RUN
}

/// An opening table is acceptable when no two cards share a rank and no two
/// ranks are adjacent.
pub fn is_valid_table(cards: &[Card]) -> bool {
    cards.iter().enumerate().all(|(i, a)| {
        cards[i + 1..]
            .iter()
            .all(|b| a.rank != b.rank && !a.rank.is_adjacent(b.rank))
    })
}

/// Breakdown of the points earned by one capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureScore {
    pub base: u32,
    pub wahed: u32,
    pub khamsa: u32,
    pub ashra: u32,
    pub missa: u32,
    pub final_throw: u32,
}

impl CaptureScore {
    pub fn total(&self) -> u32 {
        self.base + self.wahed + self.khamsa + self.ashra + self.missa + self.final_throw
    }
}

/// Scores the captured table cards of one play.
///
/// `last_play` is true when the capture leaves the deck and both hands empty;
/// the final-throw bonus then applies if a 12 or a 1 was captured.
///
/// ```
/// use ronda_engine::cards::{Card, Rank, Suit};
/// use ronda_engine::rules::{score_capture, ScoringPolicy};
///
/// let captured = [Card::new(Suit::Oros, Rank::Ten), Card::new(Suit::Bastos, Rank::Two)];
/// let score = score_capture(&captured, ScoringPolicy::CardCount, false);
/// assert_eq!(score.total(), 12);
/// ```
pub fn score_capture(captured: &[Card], policy: ScoringPolicy, last_play: bool) -> CaptureScore {
    if captured.is_empty() {
        return CaptureScore::default();
    }
    let has = |rank: Rank| captured.iter().any(|c| c.rank == rank);

    let base = match policy {
        ScoringPolicy::CardCount => captured.len() as u32,
        ScoringPolicy::MatchPlusRun => {
            let run = longest_run(captured);
            2 + if run >= 2 { run as u32 } else { 0 }
        }
    };

    CaptureScore {
        base,
        wahed: if has(Rank::One) { WAHED_POINTS } else { 0 },
        khamsa: if has(Rank::Five) { KHAMSA_POINTS } else { 0 },
        ashra: if has(Rank::Ten) { ASHRA_POINTS } else { 0 },
        missa: if is_missa(captured) { MISSA_POINTS } else { 0 },
        final_throw: if last_play && (has(Rank::Twelve) || has(Rank::One)) {
            FINAL_THROW_POINTS
        } else {
            0
        },
    }
}

/// End-of-round bonus for the player who captured `mine` cards against the
/// opponent's `theirs`.
pub fn extra_card_points(mine: usize, theirs: usize) -> u32 {
    if mine > theirs {
        u32::try_from(mine - theirs)
            .unwrap_or(u32::MAX)
            .min(EXTRA_CARD_CAP)
    } else {
        0
    }
}

/// Cards per player for a hand deal given the cards left in the deck.
pub fn hand_deal_size(remaining: usize) -> usize {
    if remaining <= 2 * HAND_SIZE {
        remaining / 2
    } else {
        HAND_SIZE
    }
}

/// The game winner once a score reaches `target`; ties keep the game going.
pub fn winner(scores: [u32; 2], target: u32) -> Option<PlayerId> {
    let [a, b] = scores;
    if a.max(b) < target || a == b {
        None
    } else if a > b {
        Some(0)
    } else {
        Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    fn c(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank)
    }

    #[test]
    fn capture_set_does_not_bridge_seven_and_ten() {
        let table = [c(Suit::Oros, Rank::Seven), c(Suit::Copas, Rank::Ten)];
        let captured = capture_set(c(Suit::Bastos, Rank::Seven), &table);
        assert_eq!(captured, vec![c(Suit::Oros, Rank::Seven)]);
    }

    #[test]
    fn capture_set_walks_downward() {
        let table = [
            c(Suit::Oros, Rank::Two),
            c(Suit::Copas, Rank::Four),
            c(Suit::Espadas, Rank::Three),
            c(Suit::Bastos, Rank::Six),
        ];
        let captured = capture_set(c(Suit::Bastos, Rank::Four), &table);
        assert_eq!(
            captured,
            vec![
                c(Suit::Oros, Rank::Two),
                c(Suit::Copas, Rank::Four),
                c(Suit::Espadas, Rank::Three)
            ]
        );
    }

    #[test]
    fn longest_run_counts_distinct_ranks() {
        let cards = [
            c(Suit::Oros, Rank::Three),
            c(Suit::Copas, Rank::Three),
            c(Suit::Oros, Rank::Four),
            c(Suit::Oros, Rank::Ten),
        ];
        assert_eq!(longest_run(&cards), 2);
        assert_eq!(longest_run(&[]), 0);
    }

    #[test]
    fn table_validation() {
        let ok = [
            c(Suit::Oros, Rank::One),
            c(Suit::Oros, Rank::Three),
            c(Suit::Oros, Rank::Five),
            c(Suit::Oros, Rank::Seven),
        ];
        assert!(is_valid_table(&ok));
        let seven_ten = [c(Suit::Oros, Rank::Seven), c(Suit::Oros, Rank::Ten)];
        assert!(is_valid_table(&seven_ten));
        let pair = [c(Suit::Oros, Rank::One), c(Suit::Copas, Rank::One)];
        assert!(!is_valid_table(&pair));
        let adjacent = [c(Suit::Oros, Rank::Eleven), c(Suit::Copas, Rank::Twelve)];
        assert!(!is_valid_table(&adjacent));
    }

    #[test]
    fn scoring_policy_parses_from_str() {
        assert_eq!("card_count".parse(), Ok(ScoringPolicy::CardCount));
        assert_eq!("Match-Plus-Run".parse(), Ok(ScoringPolicy::MatchPlusRun));
        assert!("most_cards".parse::<ScoringPolicy>().is_err());
    }

    #[test]
    fn rule_set_validation() {
        assert!(RuleSet::default().validate().is_ok());
        let bad = RuleSet {
            turn_warning_secs: 30,
            ..RuleSet::default()
        };
        assert!(bad.validate().is_err());
    }
}
