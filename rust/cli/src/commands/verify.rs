//! Verify command handler module.
//!
//! Replays every recorded round against the rule engine and checks:
//!
//! - Round id format (`YYYYMMDD-NNNNNN`) and an RFC 3339 timestamp
//! - A valid opening table and no card dealt twice
//! - Each card played was in the player's hand
//! - Capture sets match what the rules capture from the replayed table
//! - Points of every play, final-throw flags and announced combinations
//! - Captured counts, the extra-card bonus and the score arithmetic
//! - Score continuity between consecutive rounds of one game
//!
//! Every failure is collected as an `ItemError` keyed by round number.

use crate::error::{CliError, ItemError};
use crate::io_utils::{collect_jsonl_files, read_text};
use crate::validation::is_valid_round_id;
use ronda_engine::cards::Card;
use ronda_engine::deck::DECK_SIZE;
use ronda_engine::hand::{CombinationFlags, detect_combinations};
use ronda_engine::logger::{CombinationRecord, RoundRecord};
use ronda_engine::rules::{
    TABLE_DEAL_SIZE, capture_set, extra_card_points, is_valid_table, score_capture,
};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

/// The `usize` context is the 1-based round number within the input.
type VerifyError = ItemError<usize>;

/// Handle the verify command.
///
/// # Returns
///
/// `Ok(())` if every round passes, otherwise `CliError::InvalidInput` after
/// listing each error on `err`.
pub fn handle_verify_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let mut errors: Vec<VerifyError> = Vec::new();
    let mut rounds = 0usize;
    let mut previous: Option<RoundRecord> = None;

    for file in collect_jsonl_files(Path::new(&input)) {
        let content = read_text(&file)
            .map_err(|e| CliError::InvalidInput(format!("Failed to read {}: {}", input, e)))?;
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            rounds += 1;
            let rec: RoundRecord = match serde_json::from_str(line) {
                Ok(r) => r,
                Err(_) => {
                    errors.push(VerifyError::new(rounds, "Invalid record structure"));
                    previous = None;
                    continue;
                }
            };
            let mut push = |message: String| errors.push(VerifyError::new(rounds, message));
            for message in check_round(&rec) {
                push(message);
            }
            if let Some(prev) = previous.as_ref()
                && let Some(message) = check_continuity(prev, &rec)
            {
                push(message);
            }
            previous = Some(rec);
        }
    }

    if errors.is_empty() {
        writeln!(out, "Verify: OK (rounds={})", rounds)?;
        return Ok(());
    }

    writeln!(out, "Verify: FAIL (rounds={})", rounds)?;
    writeln!(err)?;
    writeln!(err, "Errors found:")?;
    for error in &errors {
        writeln!(err, "  Round {}", error)?;
    }
    writeln!(err)?;
    let invalid: HashSet<usize> = errors.iter().map(|e| e.item).collect();
    writeln!(
        err,
        "Summary: {} error(s) in {} rounds ({} invalid rounds)",
        errors.len(),
        rounds,
        invalid.len()
    )?;
    Err(CliError::InvalidInput(format!(
        "{} validation errors found",
        errors.len()
    )))
}

/// Scores must carry over from one round to the next of the same game.
fn check_continuity(prev: &RoundRecord, rec: &RoundRecord) -> Option<String> {
    let same_game = prev.seed.is_some() && prev.seed == rec.seed && prev.winner.is_none();
    if same_game && rec.round == prev.round + 1 && rec.starting_scores != prev.scores {
        return Some(format!(
            "Starting scores {:?} do not continue previous round scores {:?}",
            rec.starting_scores, prev.scores
        ));
    }
    None
}

/// Every rule violation found in one round.
fn check_round(rec: &RoundRecord) -> Vec<String> {
    let mut errors = Vec::new();

    if !is_valid_round_id(&rec.round_id) {
        errors.push("Invalid round_id format".to_string());
    }
    if let Some(ts) = rec.ts.as_deref()
        && chrono::DateTime::parse_from_rfc3339(ts).is_err()
    {
        errors.push(format!("Invalid timestamp: {}", ts));
    }
    if rec.opening_table.len() != TABLE_DEAL_SIZE || !is_valid_table(&rec.opening_table) {
        errors.push("Invalid opening table".to_string());
    }

    let mut seen: HashSet<Card> = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    for card in rec
        .opening_table
        .iter()
        .chain(rec.deals.iter().flat_map(|d| d.iter().flatten()))
    {
        if !seen.insert(*card) {
            duplicates.push(card.to_string());
        }
    }
    if !duplicates.is_empty() {
        errors.push(format!("Duplicate card(s) dealt: {}", duplicates.join(", ")));
    }

    let expected_combos = replay_combinations(rec);
    if expected_combos != rec.combinations {
        errors.push("Announced combinations do not match the deals".to_string());
    }

    let deck_emptied = seen.len() == DECK_SIZE;
    let mut table: Vec<Card> = rec.opening_table.clone();
    let mut hands: [Vec<Card>; 2] = [Vec::new(), Vec::new()];
    let mut deals = rec.deals.iter();
    let mut captured = [0usize; 2];
    let mut play_points = [0u64; 2];

    for (i, play) in rec.plays.iter().enumerate() {
        let n = i + 1;
        if hands.iter().all(|h| h.is_empty()) {
            match deals.next() {
                Some(deal) => hands = deal.clone(),
                None => {
                    errors.push(format!("Play {} happens with no cards dealt", n));
                    break;
                }
            }
        }
        let p = play.player_id;
        if p > 1 {
            errors.push(format!("Play {} has unknown player {}", n, p));
            break;
        }
        let Some(pos) = hands[p].iter().position(|&c| c == play.card) else {
            errors.push(format!("Play {}: {} is not in P{}'s hand", n, play.card, p));
            break;
        };
        hands[p].remove(pos);

        let mut expected = capture_set(play.card, &table);
        let mut recorded = play.captured.clone();
        expected.sort();
        recorded.sort();
        if expected != recorded {
            errors.push(format!(
                "Play {}: {} should capture {:?} but recorded {:?}",
                n,
                play.card,
                expected.iter().map(Card::to_string).collect::<Vec<_>>(),
                recorded.iter().map(Card::to_string).collect::<Vec<_>>(),
            ));
        }

        let last = deck_emptied && deals.len() == 0 && hands.iter().all(|h| h.is_empty());
        if play.last_play != last {
            errors.push(format!("Play {}: wrong final-throw flag", n));
        }
        let points = score_capture(&play.captured, rec.scoring, play.last_play).total();
        if points != play.points {
            errors.push(format!(
                "Play {}: {} points recorded, rules give {}",
                n, play.points, points
            ));
        }
        play_points[p] += u64::from(play.points);

        if play.captured.is_empty() {
            table.push(play.card);
        } else {
            table.retain(|c| !play.captured.contains(c));
            captured[p] += play.captured.len() + usize::from(rec.played_card_to_pile);
        }
    }

    if deals.len() > 0 || hands.iter().any(|h| !h.is_empty()) {
        errors.push("Round ended with cards left to play".to_string());
    }
    if captured != rec.captured_counts {
        errors.push(format!(
            "Captured counts {:?} do not match the plays {:?}",
            rec.captured_counts, captured
        ));
    }

    let leader = match captured[0].cmp(&captured[1]) {
        std::cmp::Ordering::Greater => Some(0),
        std::cmp::Ordering::Less => Some(1),
        std::cmp::Ordering::Equal => None,
    };
    let bonus = leader.map_or(0, |l| extra_card_points(captured[l], captured[1 - l]));
    if rec.bonus != bonus || rec.bonus_player != leader.filter(|_| bonus > 0) {
        errors.push(format!(
            "Extra-card bonus {} for {:?} should be {} for {:?}",
            rec.bonus,
            rec.bonus_player,
            bonus,
            leader.filter(|_| bonus > 0)
        ));
    }

    for p in 0..2 {
        let combos: u64 = rec
            .combinations
            .iter()
            .filter(|c| c.player_id == p)
            .map(|c| u64::from(c.points))
            .sum();
        let extra = if rec.bonus_player == Some(p) {
            u64::from(rec.bonus)
        } else {
            0
        };
        let expected = u64::from(rec.starting_scores[p]) + play_points[p] + combos + extra;
        if expected != u64::from(rec.scores[p]) {
            errors.push(format!(
                "P{} score {} does not add up (expected {})",
                p, rec.scores[p], expected
            ));
        }
    }

    if let Some(w) = rec.winner
        && (w > 1 || rec.scores[w] <= rec.scores[1 - w])
    {
        errors.push(format!("Winner P{} does not lead the scores", w));
    }

    errors
}

fn replay_combinations(rec: &RoundRecord) -> Vec<CombinationRecord> {
    let mut flags = CombinationFlags::default();
    let mut combos = Vec::new();
    for deal in &rec.deals {
        for (player_id, hand) in deal.iter().enumerate() {
            for combo in detect_combinations(hand) {
                if flags.claim(combo.kind) {
                    combos.push(CombinationRecord {
                        player_id,
                        kind: combo.kind,
                        rank: combo.rank.value(),
                        points: combo.kind.points(),
                    });
                }
            }
        }
    }
    combos
}
