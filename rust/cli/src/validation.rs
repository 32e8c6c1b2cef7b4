//! Input parsing and validation for interactive commands.
//!
//! Cards are typed either as their numeric code (`305`) or in short form,
//! rank followed by suit letter (`5B`, `12o`).

use ronda_engine::cards::{Card, Rank, Suit};

/// Outcome of parsing one line typed during `play`.
#[derive(Debug, PartialEq)]
pub enum ParseResult {
    /// A legal card
    Card(Card),
    /// User entered quit command (q or quit)
    Quit,
    /// Invalid input with error message
    Invalid(String),
}

/// Parses a card code, a short-form card or a quit command.
///
/// ```rust
/// # use ronda_cli::validation::{parse_card_input, ParseResult};
/// use ronda_engine::cards::{Card, Rank, Suit};
///
/// let five_bastos = Card::new(Suit::Bastos, Rank::Five);
/// assert_eq!(parse_card_input("305"), ParseResult::Card(five_bastos));
/// assert_eq!(parse_card_input("5b"), ParseResult::Card(five_bastos));
/// assert_eq!(parse_card_input("quit"), ParseResult::Quit);
/// assert!(matches!(parse_card_input("8O"), ParseResult::Invalid(_)));
/// ```
pub fn parse_card_input(input: &str) -> ParseResult {
    let input = input.trim();
    if input.is_empty() {
        return ParseResult::Invalid("Enter a card, e.g. 305 or 5B".to_string());
    }
    if matches!(input.to_ascii_lowercase().as_str(), "q" | "quit") {
        return ParseResult::Quit;
    }
    match parse_card(input) {
        Ok(card) => ParseResult::Card(card),
        Err(msg) => ParseResult::Invalid(msg),
    }
}

/// Parses `305` or `5B` into a card.
pub fn parse_card(input: &str) -> Result<Card, String> {
    if input.chars().all(|c| c.is_ascii_digit()) {
        let code: u16 = input
            .parse()
            .map_err(|_| format!("Invalid card code: {}", input))?;
        return Card::from_code(code).map_err(|e| e.to_string());
    }

    let mut chars = input.chars();
    let letter = chars
        .next_back()
        .ok_or_else(|| "Enter a card, e.g. 305 or 5B".to_string())?;
    let suit =
        Suit::from_letter(letter).ok_or_else(|| format!("Unknown suit letter: {}", letter))?;
    let rank = chars
        .as_str()
        .parse::<u8>()
        .ok()
        .and_then(Rank::from_u8)
        .ok_or_else(|| format!("Invalid rank in {}: use 1-7 or 10-12", input))?;
    Ok(Card::new(suit, rank))
}

/// Checks the `YYYYMMDD-NNNNNN` shape of logged round ids.
pub fn is_valid_round_id(id: &str) -> bool {
    id.len() == 15
        && id.is_char_boundary(8)
        && id.is_char_boundary(9)
        && id[0..8].chars().all(|c| c.is_ascii_digit())
        && &id[8..9] == "-"
        && id[9..].chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_short_forms() {
        let twelve_espadas = Card::new(Suit::Espadas, Rank::Twelve);
        assert_eq!(parse_card("212"), Ok(twelve_espadas));
        assert_eq!(parse_card("12E"), Ok(twelve_espadas));
        assert_eq!(parse_card("12e"), Ok(twelve_espadas));
        assert_eq!(parse_card("1O"), Ok(Card::new(Suit::Oros, Rank::One)));
    }

    #[test]
    fn rejects_missing_ranks_and_unknown_suits() {
        assert!(parse_card("108").is_err());
        assert!(parse_card("9C").is_err());
        assert!(parse_card("5X").is_err());
        assert!(parse_card("B").is_err());
        assert!(parse_card("99999").is_err());
    }

    #[test]
    fn quit_and_empty_input() {
        assert_eq!(parse_card_input("Q"), ParseResult::Quit);
        assert!(matches!(parse_card_input("  "), ParseResult::Invalid(_)));
    }

    #[test]
    fn round_id_shape() {
        assert!(is_valid_round_id("20250102-000001"));
        assert!(!is_valid_round_id("2025010-0000001"));
        assert!(!is_valid_round_id("00000000000002a-001"));
        assert!(!is_valid_round_id("2025010２-00001"));
    }
}
