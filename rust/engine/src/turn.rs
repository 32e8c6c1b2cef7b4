use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::player::PlayerId;
use crate::rules::{DEFAULT_TURN_LIMIT_SECS, DEFAULT_TURN_WARNING_SECS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Inactive,
    Active,
    /// Less than the warning threshold left.
    Warning,
    Timeout,
}

/// Emitted by [`TurnClock::tick`] when the clock crosses a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnSignal {
    Warning(PlayerId),
    Timeout(PlayerId),
}

/// Per-turn countdown. Time only moves through [`TurnClock::tick`].
#[derive(Debug, Clone)]
pub struct TurnClock {
    phase: TurnPhase,
    current: PlayerId,
    remaining: Duration,
    limit: Duration,
    warning: Duration,
}

impl Default for TurnClock {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_TURN_LIMIT_SECS),
            Duration::from_secs(DEFAULT_TURN_WARNING_SECS),
        )
    }
}

impl TurnClock {
    pub fn new(limit: Duration, warning: Duration) -> Self {
        Self {
            phase: TurnPhase::Inactive,
            current: 0,
            remaining: limit,
            limit,
            warning,
        }
    }

    pub fn start_first_turn(&mut self, player: PlayerId) {
        self.advance_turn(player);
    }

    pub fn advance_turn(&mut self, next: PlayerId) {
        self.current = next;
        self.remaining = self.limit;
        self.phase = if self.remaining <= self.warning {
            TurnPhase::Warning
        } else {
            TurnPhase::Active
        };
    }

    /// Counts `elapsed` off the current turn. A single tick can cross both
    /// thresholds; the warning is then reported before the timeout.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<TurnSignal> {
        let mut signals = Vec::new();
        if !matches!(self.phase, TurnPhase::Active | TurnPhase::Warning) {
            return signals;
        }
        self.remaining = self.remaining.saturating_sub(elapsed);

        if self.phase == TurnPhase::Active && self.remaining <= self.warning {
            self.phase = TurnPhase::Warning;
            signals.push(TurnSignal::Warning(self.current));
        }
        if self.remaining.is_zero() {
            self.phase = TurnPhase::Timeout;
            signals.push(TurnSignal::Timeout(self.current));
        }
        signals
    }

    pub fn is_players_turn(&self, id: PlayerId) -> bool {
        matches!(self.phase, TurnPhase::Active | TurnPhase::Warning) && self.current == id
    }

    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn deactivate(&mut self) {
        self.phase = TurnPhase::Inactive;
    }
}
