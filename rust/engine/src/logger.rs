use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::hand::CombinationKind;
use crate::player::PlayerId;
use crate::rules::{CaptureScore, ScoringPolicy};

/// Records a single card played during a round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    /// Player identifier (0 or 1)
    pub player_id: PlayerId,
    /// The card played from hand
    pub card: Card,
    /// Table cards captured by the play, empty if the card was laid down
    #[serde(default)]
    pub captured: Vec<Card>,
    /// Points earned by the play
    pub points: u32,
    /// Point breakdown, present on captures
    #[serde(default)]
    pub breakdown: Option<CaptureScore>,
    /// The play emptied the deck and both hands
    #[serde(default)]
    pub last_play: bool,
}

/// A combination scored from a dealt hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CombinationRecord {
    pub player_id: PlayerId,
    pub kind: CombinationKind,
    pub rank: u8,
    pub points: u32,
}

/// Complete record of one round: opening table, deals, plays and outcome.
/// Serialized to JSONL format for round history storage and verification.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Unique identifier for this round (format: YYYYMMDD-NNNNNN when logged)
    pub round_id: String,
    /// Game seed (enables deterministic replay of the whole game)
    pub seed: Option<u64>,
    /// Round number within the game, starting at 1
    pub round: u32,
    pub scoring: ScoringPolicy,
    #[serde(default = "default_true")]
    pub played_card_to_pile: bool,
    /// The four cards laid face up at the start of the round
    pub opening_table: Vec<Card>,
    /// Every hand deal of the round, indexed by player
    #[serde(default)]
    pub deals: Vec<[Vec<Card>; 2]>,
    /// Chronological list of all plays
    pub plays: Vec<PlayRecord>,
    #[serde(default)]
    pub combinations: Vec<CombinationRecord>,
    /// Extra-card bonus awarded at the end of the round
    #[serde(default)]
    pub bonus: u32,
    #[serde(default)]
    pub bonus_player: Option<PlayerId>,
    /// Scores before the round started
    pub starting_scores: [u32; 2],
    /// Scores after the round ended
    pub scores: [u32; 2],
    pub captured_counts: [usize; 2],
    /// Game winner, present only on the round that ended the game
    #[serde(default)]
    pub winner: Option<PlayerId>,
    /// Timestamp when the round was logged (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
    /// Additional metadata (extensible JSON object)
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

fn default_true() -> bool {
    true
}

impl RoundRecord {
    pub fn total_play_points(&self, player: PlayerId) -> u32 {
        self.plays
            .iter()
            .filter(|p| p.player_id == player)
            .map(|p| p.points)
            .sum()
    }

    pub fn total_combination_points(&self, player: PlayerId) -> u32 {
        self.combinations
            .iter()
            .filter(|c| c.player_id == player)
            .map(|c| c.points)
            .sum()
    }
}

pub fn format_round_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Largest sequence number among the `yyyymmdd` round ids in JSONL
/// `content`, or 0. Lines that do not parse or carry another date are
/// skipped.
pub fn last_round_seq(content: &str, yyyymmdd: &str) -> u32 {
    content
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .filter_map(|value| {
            let id = value.get("round_id")?.as_str()?;
            id.strip_prefix(yyyymmdd)?
                .strip_prefix('-')?
                .parse::<u32>()
                .ok()
        })
        .max()
        .unwrap_or(0)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Appends round records to a JSONL file, one record per line.
pub struct RoundLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl RoundLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Self::open(path, false)
    }

    /// Like [`RoundLogger::create`] but keeps existing lines.
    pub fn append<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Self::open(path, true)
    }

    fn open<P: AsRef<Path>>(path: P, append: bool) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    /// Date part of the ids this logger hands out.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Continues numbering after `seq`, for files opened with
    /// [`RoundLogger::append`].
    pub fn resume_after(&mut self, seq: u32) {
        self.seq = seq;
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_round_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
