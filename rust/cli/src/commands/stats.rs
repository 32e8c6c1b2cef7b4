//! Statistics aggregation over round history files.
//!
//! Reads a JSONL file, or every `.jsonl` file under a directory, and prints
//! a JSON summary: rounds read, games finished and who won them, and the
//! average points and captured cards per round for each seat.

use crate::error::CliError;
use crate::io_utils::{collect_jsonl_files, read_text};
use crate::ui;
use ronda_engine::logger::RoundRecord;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize, PartialEq)]
struct PerSeat<T> {
    p0: T,
    p1: T,
}

#[derive(Debug, Serialize)]
struct Summary {
    rounds: u64,
    games: u64,
    wins: PerSeat<u64>,
    avg_points_per_round: PerSeat<f64>,
    avg_captured_per_round: PerSeat<f64>,
    combinations: u64,
    final_throws: u64,
}

#[derive(Default)]
struct Tally {
    rounds: u64,
    games: u64,
    wins: [u64; 2],
    points: [u64; 2],
    captured: [u64; 2],
    combinations: u64,
    final_throws: u64,
    // an unterminated last line is an interrupted write, not corruption
    truncated: u64,
    corrupted: u64,
    score_errors: u64,
}

impl Tally {
    fn read_file(&mut self, content: &str, err: &mut dyn Write) -> Result<(), CliError> {
        let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
        let open_tail = !content.ends_with('\n');
        for (i, line) in lines.iter().enumerate() {
            match serde_json::from_str::<RoundRecord>(line) {
                Ok(rec) => self.add(&rec, err)?,
                Err(_) if open_tail && i + 1 == lines.len() => self.truncated += 1,
                Err(_) => self.corrupted += 1,
            }
        }
        Ok(())
    }

    fn add(&mut self, rec: &RoundRecord, err: &mut dyn Write) -> Result<(), CliError> {
        for seat in 0..2 {
            match rec.scores[seat].checked_sub(rec.starting_scores[seat]) {
                Some(gained) => {
                    self.points[seat] += u64::from(gained);
                    self.captured[seat] += rec.captured_counts[seat] as u64;
                }
                None => {
                    self.score_errors += 1;
                    ui::write_error(
                        err,
                        &format!("Score went down for P{} in round {}", seat, rec.round_id),
                    )?;
                }
            }
        }
        self.rounds += 1;
        self.combinations += rec.combinations.len() as u64;
        self.final_throws += rec.plays.iter().filter(|p| p.last_play).count() as u64;
        if let Some(w) = rec.winner.filter(|&w| w < 2) {
            self.games += 1;
            self.wins[w] += 1;
        }
        Ok(())
    }

    /// Per-round mean rounded to two decimals.
    fn per_round(&self, totals: [u64; 2]) -> PerSeat<f64> {
        let mean = |total: u64| match self.rounds {
            0 => 0.0,
            n => (total as f64 / n as f64 * 100.0).round() / 100.0,
        };
        PerSeat {
            p0: mean(totals[0]),
            p1: mean(totals[1]),
        }
    }

    fn summary(&self) -> Summary {
        Summary {
            rounds: self.rounds,
            games: self.games,
            wins: PerSeat {
                p0: self.wins[0],
                p1: self.wins[1],
            },
            avg_points_per_round: self.per_round(self.points),
            avg_captured_per_round: self.per_round(self.captured),
            combinations: self.combinations,
            final_throws: self.final_throws,
        }
    }
}

/// Aggregates statistics from round history files.
///
/// Corrupted lines are counted and reported on stderr. A single file with
/// no readable round fails, as does a record whose score went down.
pub fn handle_stats_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let path = Path::new(&input);
    let mut tally = Tally::default();

    if path.is_dir() {
        for file in collect_jsonl_files(path) {
            match read_text(&file) {
                Ok(content) => tally.read_file(&content, err)?,
                Err(_) => tally.corrupted += 1,
            }
        }
    } else {
        let content = read_text(path).map_err(|e| format!("Failed to read {}: {}", input, e));
        match content {
            Ok(content) => tally.read_file(&content, err)?,
            Err(message) => {
                ui::write_error(err, &message)?;
                return Err(CliError::Config(message));
            }
        }
    }

    if tally.corrupted > 0 {
        ui::write_error(err, &format!("Skipped {} corrupted record(s)", tally.corrupted))?;
    }
    if tally.truncated > 0 {
        ui::write_error(
            err,
            &format!("Discarded {} incomplete final line(s)", tally.truncated),
        )?;
    }
    let unreadable = tally.corrupted + tally.truncated;
    if !path.is_dir() && tally.rounds == 0 && unreadable > 0 {
        ui::write_error(err, "Invalid record")?;
        return Err(CliError::InvalidInput("Invalid record".into()));
    }

    let rendered = serde_json::to_string_pretty(&tally.summary())
        .map_err(|e| CliError::InvalidInput(format!("Failed to serialize stats: {}", e)))?;
    writeln!(out, "{}", rendered)?;

    match tally.score_errors {
        0 => Ok(()),
        _ => Err(CliError::InvalidInput("Statistics validation failed".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ronda_engine::rules::ScoringPolicy;
    use std::io::Write as _;

    fn record(id: &str, start: [u32; 2], end: [u32; 2], winner: Option<usize>) -> String {
        let rec = RoundRecord {
            round_id: id.to_string(),
            seed: Some(1),
            round: 1,
            scoring: ScoringPolicy::CardCount,
            played_card_to_pile: true,
            opening_table: vec![],
            deals: vec![],
            plays: vec![],
            combinations: vec![],
            bonus: 0,
            bonus_player: None,
            starting_scores: start,
            scores: end,
            captured_counts: [24, 14],
            winner,
            ts: None,
            meta: None,
        };
        serde_json::to_string(&rec).unwrap()
    }

    struct Run {
        result: Result<(), CliError>,
        stdout: Vec<u8>,
        stderr: String,
    }

    impl Run {
        fn json(&self) -> serde_json::Value {
            serde_json::from_slice(&self.stdout).unwrap()
        }
    }

    fn stats_over(body: &[u8]) -> Run {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body).unwrap();
        stats_at(file.path().display().to_string())
    }

    fn stats_at(input: String) -> Run {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let result = handle_stats_command(input, &mut stdout, &mut stderr);
        Run {
            result,
            stdout,
            stderr: String::from_utf8(stderr).unwrap(),
        }
    }

    #[test]
    fn empty_history_reports_zeroes() {
        let run = stats_over(b"");
        assert!(run.result.is_ok());
        assert_eq!(run.json()["rounds"], 0);
        assert_eq!(run.json()["avg_points_per_round"]["p0"], 0.0);
    }

    #[test]
    fn games_wins_and_averages() {
        let body = format!(
            "{}\n{}\n",
            record("20250101-000001", [0, 0], [20, 10], None),
            record("20250101-000002", [20, 10], [42, 12], Some(0)),
        );
        let run = stats_over(body.as_bytes());
        assert!(run.result.is_ok());

        let json = run.json();
        assert_eq!(json["rounds"], 2);
        assert_eq!(json["games"], 1);
        assert_eq!(json["wins"]["p0"], 1);
        assert_eq!(json["avg_points_per_round"]["p0"], 21.0);
        assert_eq!(json["avg_points_per_round"]["p1"], 6.0);
        assert_eq!(json["avg_captured_per_round"]["p0"], 24.0);
    }

    #[test]
    fn falling_score_is_an_error() {
        let body = format!("{}\n", record("20250101-000001", [10, 0], [5, 3], None));
        let run = stats_over(body.as_bytes());
        assert!(run.result.is_err());
        assert!(run.stderr.contains("Score went down"));
    }

    #[test]
    fn corrupted_lines_are_skipped() {
        let body = format!(
            "{}\n{{invalid json}}\n{}\n",
            record("20250101-000001", [0, 0], [3, 4], None),
            record("20250101-000002", [3, 4], [9, 9], None),
        );
        let run = stats_over(body.as_bytes());
        assert!(run.result.is_ok());
        assert_eq!(run.json()["rounds"], 2);
        assert!(run.stderr.contains("corrupted"));
    }

    #[test]
    fn lone_truncated_line_fails() {
        let run = stats_over(b"{\"round_id\":\"2025");
        assert!(run.result.is_err());
        assert!(run.stderr.contains("incomplete final line"));
    }

    #[test]
    fn missing_file_fails() {
        let run = stats_at("/nonexistent/rounds.jsonl".into());
        assert!(matches!(run.result, Err(CliError::Config(_))));
    }
}
