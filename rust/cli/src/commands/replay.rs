//! Replay command handler.
//!
//! Prints recorded rounds play by play: the opening table, each deal, every
//! card played with what it captured and scored, then the extra-card bonus
//! and final scores. Lines that do not parse are reported and skipped.

use crate::error::CliError;
use crate::formatters::{format_card, format_cards};
use crate::io_utils::read_text;
use crate::ui;
use ronda_engine::logger::RoundRecord;
use std::io::Write;
use std::path::Path;

pub fn handle_replay_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let content = match read_text(Path::new(&input)) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!("Failed to read {}: {}", input, e);
            ui::write_error(err, &msg)?;
            return Err(CliError::InvalidInput(msg));
        }
    };

    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        writeln!(out, "No rounds found in file.")?;
        return Ok(());
    }

    let mut shown = 0usize;
    for (idx, line) in lines.iter().enumerate() {
        let record: RoundRecord = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                ui::write_error(err, &format!("Failed to parse round {}: {}", idx + 1, e))?;
                continue;
            }
        };
        shown += 1;
        replay_round(&record, out)?;
    }

    writeln!(out, "Replayed {} of {} rounds", shown, lines.len())?;
    Ok(())
}

fn replay_round(record: &RoundRecord, out: &mut dyn Write) -> Result<(), CliError> {
    writeln!(
        out,
        "Round {} ({}) scoring={}",
        record.round,
        record.round_id,
        record.scoring.as_str()
    )?;
    writeln!(out, "  Table: {}", format_cards(&record.opening_table))?;

    let mut deals = record.deals.iter();
    let mut in_hand = [0usize; 2];
    for play in &record.plays {
        if in_hand.iter().all(|&n| n == 0)
            && let Some(deal) = deals.next()
        {
            writeln!(
                out,
                "  Deal: P0 {} P1 {}",
                format_cards(&deal[0]),
                format_cards(&deal[1])
            )?;
            in_hand = [deal[0].len(), deal[1].len()];
        }
        if let Some(n) = in_hand.get_mut(play.player_id) {
            *n = n.saturating_sub(1);
        }

        if play.captured.is_empty() {
            writeln!(
                out,
                "  P{} lays {}",
                play.player_id,
                format_card(&play.card)
            )?;
        } else {
            writeln!(
                out,
                "  P{} plays {} and captures {} (+{}){}",
                play.player_id,
                format_card(&play.card),
                format_cards(&play.captured),
                play.points,
                if play.last_play { " final throw" } else { "" }
            )?;
        }
    }

    for combo in &record.combinations {
        writeln!(
            out,
            "  P{} announced {:?} of {} (+{})",
            combo.player_id, combo.kind, combo.rank, combo.points
        )?;
    }
    if let Some(p) = record.bonus_player {
        writeln!(out, "  Extra cards: P{} +{}", p, record.bonus)?;
    }
    writeln!(
        out,
        "  Score: {}-{} (captured {}-{})",
        record.scores[0], record.scores[1], record.captured_counts[0], record.captured_counts[1]
    )?;
    if let Some(w) = record.winner {
        writeln!(out, "  Game won by P{}", w)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ronda_engine::engine::Engine;
    use ronda_engine::rules::RuleSet;

    fn recorded_round() -> RoundRecord {
        let rules = RuleSet {
            target_score: 10_000,
            ..RuleSet::default()
        };
        let mut engine = Engine::new(Some(21), rules);
        engine.start().unwrap();
        loop {
            if let Some(rec) = engine.take_round_records().pop() {
                return rec;
            }
            if engine.needs_deal() {
                engine.request_deal().unwrap();
                continue;
            }
            let p = engine.current_player();
            let code = engine.players()[p].hand()[0].code();
            engine.play_card(p, code).unwrap();
        }
    }

    #[test]
    fn test_replay_prints_every_play() {
        let record = recorded_round();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.jsonl");
        std::fs::write(&path, format!("{}\n", serde_json::to_string(&record).unwrap())).unwrap();

        let mut out = Vec::new();
        let mut err = Vec::new();
        handle_replay_command(path.to_string_lossy().into_owned(), &mut out, &mut err).unwrap();

        let output = String::from_utf8(out).unwrap();
        let plays = output
            .lines()
            .filter(|l| l.contains(" lays ") || l.contains(" plays "))
            .count();
        assert_eq!(plays, record.plays.len());
        assert_eq!(
            output.lines().filter(|l| l.starts_with("  Deal:")).count(),
            record.deals.len()
        );
        assert!(output.contains("Replayed 1 of 1 rounds"));
    }

    #[test]
    fn test_replay_skips_corrupt_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        std::fs::write(&path, "{not json}\n").unwrap();

        let mut out = Vec::new();
        let mut err = Vec::new();
        handle_replay_command(path.to_string_lossy().into_owned(), &mut out, &mut err).unwrap();

        assert!(String::from_utf8(err).unwrap().contains("Failed to parse round 1"));
        assert!(String::from_utf8(out).unwrap().contains("Replayed 0 of 1 rounds"));
    }

    #[test]
    fn test_replay_missing_file() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = handle_replay_command("/nonexistent/r.jsonl".into(), &mut out, &mut err);
        assert!(result.is_err());
    }
}
