use std::collections::VecDeque;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::cards::{decode, Card};
use crate::deck::Deck;
use crate::errors::GameError;
use crate::events::{GameEvent, Intent};
use crate::logger::{CombinationRecord, PlayRecord, RoundRecord};
use crate::mirror::Snapshot;
use crate::player::{opponent, Player, PlayerId, NUM_PLAYERS};
use crate::round::{HandDeal, PlayResolution, Round, RoundPhase};
use crate::rules::{winner, RuleSet};
use crate::table::Table;
use crate::turn::{TurnClock, TurnPhase, TurnSignal};

/// Result of an accepted play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOutcome {
    pub resolution: PlayResolution,
    /// Phase of the round after the play.
    pub phase: RoundPhase,
}

/// Authoritative Ronda game: two players, one deck, one table, played over
/// successive rounds until a player reaches the target score.
///
/// Every operation validates all of its preconditions before mutating
/// anything, so a rejected call leaves the game untouched.
///
/// # Examples
///
/// ```
/// use ronda_engine::engine::Engine;
/// use ronda_engine::rules::RuleSet;
///
/// let mut engine = Engine::new(Some(7), RuleSet::default());
/// engine.start().expect("opening deal");
/// assert_eq!(engine.table().len(), 4);
/// assert_eq!(engine.deck_remaining(), 30);
///
/// let player = engine.current_player();
/// let card = engine.players()[player].hand()[0];
/// engine.play_card(player, card.code()).unwrap();
/// assert_eq!(engine.players()[player].hand().len(), 2);
/// ```
#[derive(Debug)]
pub struct Engine {
    rules: RuleSet,
    seed: u64,
    rng: ChaCha20Rng,
    players: [Player; 2],
    round: Round,
    turn: TurnClock,
    events: VecDeque<GameEvent>,
    // who plays first after a mid-round re-deal
    next_player: PlayerId,
    game_winner: Option<PlayerId>,
    record: Option<RoundRecord>,
    finished: Vec<RoundRecord>,
}

impl Engine {
    pub fn new(seed: Option<u64>, rules: RuleSet) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let deck = Deck::new_with_seed(rng.random());
        let turn = TurnClock::new(
            Duration::from_secs(rules.turn_limit_secs),
            Duration::from_secs(rules.turn_warning_secs),
        );
        Self {
            rules,
            seed,
            rng,
            players: [Player::new(0), Player::new(1)],
            round: Round::new(1, deck),
            turn,
            events: VecDeque::new(),
            next_player: 0,
            game_winner: None,
            record: None,
            finished: Vec::new(),
        }
    }

    /// An engine whose first round uses `deck` in the given order. Later
    /// rounds are shuffled from the game seed as usual.
    pub fn with_deck(seed: Option<u64>, rules: RuleSet, deck: Deck) -> Result<Self, GameError> {
        if !deck.is_valid() {
            return Err(GameError::InvalidDeck(format!(
                "expected the 40 distinct cards, got {}",
                deck.remaining()
            )));
        }
        let mut engine = Self::new(seed, rules);
        engine.round = Round::stacked(1, deck);
        Ok(engine)
    }

    /// Deals the opening table and the first hands, then starts the turn of
    /// a randomly chosen player.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.round.phase() != RoundPhase::NotStarted {
            return Err(GameError::InvalidPhase {
                phase: self.round.phase(),
            });
        }
        let opening = self.round.deal_table(self.rules.max_table_deal_attempts)?;
        self.begin_round(opening)
    }

    /// Opens the current round on an already dealt table.
    fn begin_round(&mut self, opening: Vec<Card>) -> Result<(), GameError> {
        self.events.push_back(GameEvent::TableUpdated {
            cards: Table::from_cards(opening.clone()).codes(),
        });
        self.record = Some(RoundRecord {
            round_id: format!("{:016x}-{:03}", self.seed, self.round.number()),
            seed: Some(self.seed),
            round: self.round.number(),
            scoring: self.rules.scoring,
            played_card_to_pile: self.rules.played_card_to_pile,
            opening_table: opening,
            deals: Vec::new(),
            plays: Vec::new(),
            combinations: Vec::new(),
            bonus: 0,
            bonus_player: None,
            starting_scores: self.scores(),
            scores: self.scores(),
            captured_counts: [0, 0],
            winner: None,
            ts: None,
            meta: None,
        });

        self.deal_and_announce()?;
        let first = self.rng.random_range(0..NUM_PLAYERS);
        self.turn.start_first_turn(first);
        self.events
            .push_back(GameEvent::TurnChanged { player_id: first });
        info!(round = self.round.number(), first, "round started");
        Ok(())
    }

    fn deal_and_announce(&mut self) -> Result<(), GameError> {
        let before = self.scores();
        let HandDeal {
            hands,
            combinations,
        } = self.round.deal_hands(&mut self.players)?;

        for (id, cards) in hands.iter().enumerate() {
            self.events.push_back(GameEvent::HandDealt {
                player_id: id,
                cards: cards.iter().map(|c| c.code()).collect(),
            });
        }
        for (id, combo) in &combinations {
            debug!(player = id, kind = ?combo.kind, rank = combo.rank.value(), "combination");
            self.events.push_back(GameEvent::CombinationAnnounced {
                player_id: *id,
                kind: combo.kind,
                rank: combo.rank.value(),
            });
        }
        let after = self.scores();
        for id in 0..NUM_PLAYERS {
            if after[id] != before[id] {
                self.events.push_back(GameEvent::ScoreChanged {
                    player_id: id,
                    score: after[id],
                });
            }
        }
        self.events.push_back(GameEvent::DeckSynced {
            cards: self.round.deck().codes(),
        });

        if let Some(rec) = &mut self.record {
            rec.deals.push(hands);
            rec.combinations
                .extend(combinations.iter().map(|(id, combo)| CombinationRecord {
                    player_id: *id,
                    kind: combo.kind,
                    rank: combo.rank.value(),
                    points: combo.kind.points(),
                }));
        }
        Ok(())
    }

    fn check_play(&self, player: PlayerId, code: u16) -> Result<Card, GameError> {
        if self.game_winner.is_some() {
            return Err(GameError::GameAlreadyOver);
        }
        if self.round.phase() != RoundPhase::Playing {
            return Err(GameError::InvalidPhase {
                phase: self.round.phase(),
            });
        }
        if player >= NUM_PLAYERS {
            return Err(GameError::UnknownPlayer { player });
        }
        if !self.turn.is_players_turn(player) {
            return Err(GameError::NotPlayersTurn { player });
        }
        let card = decode(code)?;
        if !self.players[player].has_card(card) {
            return Err(GameError::CardNotInHand { player, code });
        }
        Ok(card)
    }

    /// What playing `code` would capture and score right now.
    pub fn preview_capture(
        &self,
        player: PlayerId,
        code: u16,
    ) -> Result<PlayResolution, GameError> {
        let card = self.check_play(player, code)?;
        Ok(self
            .round
            .preview(&self.players, player, card, &self.rules))
    }

    /// Plays the card with code `code` from `player`'s hand.
    pub fn play_card(&mut self, player: PlayerId, code: u16) -> Result<PlayOutcome, GameError> {
        let card = self.check_play(player, code)?;
        let resolution = self
            .round
            .apply_play(&mut self.players, player, card, &self.rules)?;
        let points = resolution.score.total();

        self.events.push_back(GameEvent::CardPlayed {
            player_id: player,
            card: code,
        });
        if !resolution.captured.is_empty() {
            self.players[player].add_score(points);
            debug!(player, card = %card, captured = ?resolution.captured, points, "capture");
            self.events.push_back(GameEvent::CardsCaptured {
                player_id: player,
                cards: resolution.captured.iter().map(|c| c.code()).collect(),
            });
        }
        self.events.push_back(GameEvent::TableUpdated {
            cards: self.round.table().codes(),
        });
        if points > 0 {
            self.events.push_back(GameEvent::ScoreChanged {
                player_id: player,
                score: self.players[player].score(),
            });
        }
        if let Some(rec) = &mut self.record {
            rec.plays.push(PlayRecord {
                player_id: player,
                card,
                captured: resolution.captured.clone(),
                points,
                breakdown: (!resolution.captured.is_empty()).then_some(resolution.score),
                last_play: resolution.last_play,
            });
        }

        let phase = self.round.after_play(&self.players);
        match phase {
            RoundPhase::Playing => {
                let next = self.next_to_play(player);
                self.turn.advance_turn(next);
                debug!(player = next, "turn changed");
                self.events
                    .push_back(GameEvent::TurnChanged { player_id: next });
            }
            RoundPhase::RoundExhausted => {
                self.turn.deactivate();
                self.next_player = opponent(player);
            }
            _ => self.finish_round(),
        }

        Ok(PlayOutcome {
            resolution,
            phase: self.round.phase(),
        })
    }

    // The opponent plays next unless their hand is already empty.
    fn next_to_play(&self, player: PlayerId) -> PlayerId {
        let other = opponent(player);
        if self.players[other].hand().is_empty() {
            player
        } else {
            other
        }
    }

    fn finish_round(&mut self) {
        self.turn.deactivate();
        let (leader, bonus) = self.round.finish(&mut self.players);
        if let (Some(id), true) = (leader, bonus > 0) {
            self.events.push_back(GameEvent::ScoreChanged {
                player_id: id,
                score: self.players[id].score(),
            });
        }
        self.events.push_back(GameEvent::RoundEnded {
            winner: leader,
            bonus,
        });
        let scores = self.scores();
        info!(round = self.round.number(), ?leader, bonus, ?scores, "round ended");

        let game_winner = winner(scores, self.rules.target_score);
        if let Some(id) = game_winner {
            self.game_winner = Some(id);
            self.round.set_phase(RoundPhase::GameOver);
            self.events.push_back(GameEvent::GameOver {
                winner: id,
                final_score: scores,
            });
            info!(winner = id, ?scores, "game over");
        }

        if let Some(mut rec) = self.record.take() {
            rec.bonus = bonus;
            rec.bonus_player = leader.filter(|_| bonus > 0);
            rec.scores = scores;
            rec.captured_counts = [
                self.players[0].captured_count(),
                self.players[1].captured_count(),
            ];
            rec.winner = game_winner;
            self.finished.push(rec);
        }
    }

    /// Refills both hands after exhaustion, or starts the next round once
    /// the previous one is over.
    pub fn request_deal(&mut self) -> Result<(), GameError> {
        if self.game_winner.is_some() {
            return Err(GameError::GameAlreadyOver);
        }
        match self.round.phase() {
            RoundPhase::RoundExhausted => {
                self.deal_and_announce()?;
                let next = self.next_player;
                self.turn.advance_turn(next);
                self.events
                    .push_back(GameEvent::TurnChanged { player_id: next });
                Ok(())
            }
            RoundPhase::RoundOver => {
                // a failed table deal leaves the finished round in place;
                // the next request draws a fresh deck
                let deck = Deck::new_with_seed(self.rng.random());
                let mut next = Round::new(self.round.number() + 1, deck);
                let opening = next.deal_table(self.rules.max_table_deal_attempts)?;
                for p in &mut self.players {
                    p.reset_round();
                }
                self.round = next;
                self.begin_round(opening)
            }
            phase => Err(GameError::InvalidPhase { phase }),
        }
    }

    /// Advances the turn clock, queueing warning and timeout events.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<TurnSignal> {
        let signals = self.turn.tick(elapsed);
        for signal in &signals {
            let event = match *signal {
                TurnSignal::Warning(player_id) => GameEvent::TurnWarning { player_id },
                TurnSignal::Timeout(player_id) => GameEvent::TurnTimeout { player_id },
            };
            self.events.push_back(event);
        }
        signals
    }

    /// Hands a timed-out turn to the other player.
    pub fn pass_turn(&mut self) -> Result<PlayerId, GameError> {
        if self.game_winner.is_some() {
            return Err(GameError::GameAlreadyOver);
        }
        if self.turn.phase() != TurnPhase::Timeout {
            return Err(GameError::TurnStillActive);
        }
        let next = self.next_to_play(self.turn.current_player());
        self.turn.advance_turn(next);
        self.events
            .push_back(GameEvent::TurnChanged { player_id: next });
        Ok(next)
    }

    pub fn handle(&mut self, intent: Intent) -> Result<(), GameError> {
        match intent {
            Intent::PlayCard {
                player_id,
                card_code,
            } => self.play_card(player_id, card_code).map(|_| ()),
            Intent::RequestDeal => self.request_deal(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// True while the game waits for [`Engine::request_deal`].
    pub fn needs_deal(&self) -> bool {
        self.game_winner.is_none()
            && matches!(
                self.round.phase(),
                RoundPhase::RoundExhausted | RoundPhase::RoundOver
            )
    }

    pub fn snapshot(&self) -> Snapshot {
        let codes = |cards: &[Card]| cards.iter().map(|c| c.code()).collect::<Vec<u16>>();
        let active = matches!(self.turn.phase(), TurnPhase::Active | TurnPhase::Warning);
        Snapshot {
            round: self.round.number(),
            phase: self.round.phase(),
            deck: self.round.deck().codes(),
            table: self.round.table().codes(),
            hands: [codes(self.players[0].hand()), codes(self.players[1].hand())],
            captured: [
                codes(self.players[0].captured()),
                codes(self.players[1].captured()),
            ],
            discarded: codes(self.round.discarded()),
            scores: self.scores(),
            current_player: active.then_some(self.turn.current_player()),
        }
    }

    /// Records of the rounds finished since the last call.
    pub fn take_round_records(&mut self) -> Vec<RoundRecord> {
        std::mem::take(&mut self.finished)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn scores(&self) -> [u32; 2] {
        [self.players[0].score(), self.players[1].score()]
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn round_number(&self) -> u32 {
        self.round.number()
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.phase()
    }

    pub fn table(&self) -> &[Card] {
        self.round.table().cards()
    }

    pub fn deck_remaining(&self) -> usize {
        self.round.deck().remaining()
    }

    pub fn turn(&self) -> &TurnClock {
        &self.turn
    }

    pub fn current_player(&self) -> PlayerId {
        self.turn.current_player()
    }

    pub fn is_players_turn(&self, id: PlayerId) -> bool {
        self.turn.is_players_turn(id)
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.game_winner
    }

    pub fn is_game_over(&self) -> bool {
        self.game_winner.is_some()
    }
}
