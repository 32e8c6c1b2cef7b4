//! Card, table and event formatters for terminal display.
//!
//! Cards print in short form, rank then suit letter (`5B`, `12O`). Codes that
//! do not decode are shown as `?<code>` rather than failing the whole line.
//!
//! ## Example
//!
//! ```rust
//! use ronda_engine::cards::{Card, Rank, Suit};
//! use ronda_cli::formatters::{format_card, format_cards};
//!
//! let card = Card::new(Suit::Espadas, Rank::Twelve);
//! assert_eq!(format_card(&card), "12E");
//! assert_eq!(format_cards(&[card]), "[12E]");
//! ```

use ronda_engine::cards::Card;
use ronda_engine::events::GameEvent;
use ronda_engine::hand::CombinationKind;
use ronda_engine::player::PlayerId;

pub fn format_card(card: &Card) -> String {
    card.to_string()
}

fn format_code(code: u16) -> String {
    Card::from_code(code)
        .map(|c| c.to_string())
        .unwrap_or_else(|_| format!("?{}", code))
}

/// Bracketed list like `[1O 3C 10E]`, or `[]` when empty.
pub fn format_cards(cards: &[Card]) -> String {
    let formatted: Vec<String> = cards.iter().map(format_card).collect();
    format!("[{}]", formatted.join(" "))
}

pub fn format_codes(codes: &[u16]) -> String {
    let formatted: Vec<String> = codes.iter().map(|&c| format_code(c)).collect();
    format!("[{}]", formatted.join(" "))
}

/// Hand with each card's code, the form shown at the play prompt.
///
/// ```rust
/// use ronda_engine::cards::{Card, Rank, Suit};
/// # use ronda_cli::formatters::format_hand;
///
/// let hand = [Card::new(Suit::Bastos, Rank::Five), Card::new(Suit::Oros, Rank::One)];
/// assert_eq!(format_hand(&hand), "5B(305) 1O(1)");
/// ```
pub fn format_hand(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| format!("{}({})", c, c.code()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn combination_name(kind: CombinationKind) -> &'static str {
    match kind {
        CombinationKind::Ronda => "Ronda",
        CombinationKind::Tringa => "Tringa",
    }
}

/// One line describing `event`, `None` for events not worth printing.
pub fn format_event(event: &GameEvent, names: &[&str; 2]) -> Option<String> {
    let name = |id: PlayerId| names.get(id).copied().unwrap_or("?");
    let line = match event {
        GameEvent::TableUpdated { cards } => format!("Table: {}", format_codes(cards)),
        GameEvent::DeckSynced { .. } => return None,
        GameEvent::HandDealt { player_id, cards } => {
            format!("{} dealt {}", name(*player_id), format_codes(cards))
        }
        GameEvent::CardPlayed { player_id, card } => {
            format!("{} plays {}", name(*player_id), format_code(*card))
        }
        GameEvent::CardsCaptured { player_id, cards } => {
            format!("{} captures {}", name(*player_id), format_codes(cards))
        }
        GameEvent::ScoreChanged { player_id, score } => {
            format!("{} score: {}", name(*player_id), score)
        }
        GameEvent::CombinationAnnounced {
            player_id,
            kind,
            rank,
        } => format!(
            "{} announces {} of {}",
            name(*player_id),
            combination_name(*kind),
            rank
        ),
        GameEvent::TurnChanged { .. } => return None,
        GameEvent::TurnWarning { player_id } => {
            format!("{} is running out of time", name(*player_id))
        }
        GameEvent::TurnTimeout { player_id } => format!("{} timed out", name(*player_id)),
        GameEvent::RoundEnded { winner, bonus } => match winner {
            Some(id) if *bonus > 0 => {
                format!("Round over: {} takes {} extra-card points", name(*id), bonus)
            }
            _ => "Round over: no extra-card bonus".to_string(),
        },
        GameEvent::GameOver {
            winner,
            final_score,
        } => format!(
            "Game over: {} wins {}-{}",
            name(*winner),
            final_score[0],
            final_score[1]
        ),
    };
    Some(line)
}
