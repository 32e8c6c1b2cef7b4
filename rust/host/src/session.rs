//! One game per actor.
//!
//! A [`GameSession`] task owns its [`Engine`] outright. Commands arrive over
//! a bounded channel and timer ticks from a [`tokio::time::interval`]; a
//! single `select!` loop handles one at a time, so engine transitions never
//! overlap. After each step the queued engine events are broadcast on the
//! [`EventBus`]. Seats driven by an AI play as soon as it is their turn, and
//! re-deals are scheduled `redeal_delay_ms` after the engine asks for one.

use crate::errors::SessionError;
use crate::events::{EventBus, HostEvent};
use crate::settings::HostSettings;
use ronda_ai::{AIOpponent, create_ai};
use ronda_engine::engine::{Engine, PlayOutcome};
use ronda_engine::mirror::Snapshot;
use ronda_engine::player::PlayerId;
use ronda_engine::round::RoundPhase;
use ronda_engine::turn::TurnSignal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub type SessionId = String;

/// Who controls each seat of a new session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub seed: Option<u64>,
    /// AI name per seat; `None` seats are played through [`SessionHandle`].
    pub seats: [Option<String>; 2],
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            seats: [None, Some("baseline".to_string())],
        }
    }
}

impl SessionConfig {
    /// Both seats played by remote participants.
    pub fn remote(seed: Option<u64>) -> Self {
        Self {
            seed,
            seats: [None, None],
        }
    }
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: SessionId,
    pub snapshot: Snapshot,
    pub needs_deal: bool,
    pub winner: Option<PlayerId>,
    /// Engine events broadcast so far
    pub events_sent: u64,
}

pub enum SessionCommand {
    Play {
        player_id: PlayerId,
        card_code: u16,
        reply: oneshot::Sender<Result<PlayOutcome, SessionError>>,
    },
    RequestDeal {
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    PassTurn {
        reply: oneshot::Sender<Result<PlayerId, SessionError>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionState>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable address of a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub async fn play_card(
        &self,
        player_id: PlayerId,
        card_code: u16,
    ) -> Result<PlayOutcome, SessionError> {
        self.request(|reply| SessionCommand::Play {
            player_id,
            card_code,
            reply,
        })
        .await?
    }

    pub async fn request_deal(&self) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::RequestDeal { reply })
            .await?
    }

    /// Hands a timed-out turn to the opponent.
    pub async fn pass_turn(&self) -> Result<PlayerId, SessionError> {
        self.request(|reply| SessionCommand::PassTurn { reply })
            .await?
    }

    pub async fn snapshot(&self) -> Result<SessionState, SessionError> {
        self.request(|reply| SessionCommand::Snapshot { reply })
            .await
    }

    /// Stops the actor. Stopping an already stopped session succeeds.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        match self
            .request(|reply| SessionCommand::Shutdown { reply })
            .await
        {
            Err(SessionError::Closed(_)) | Ok(()) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(make(tx))
            .await
            .map_err(|_| SessionError::Closed(self.id.clone()))?;
        rx.await.map_err(|_| SessionError::Closed(self.id.clone()))
    }
}

/// The actor owning one game.
pub struct GameSession {
    id: SessionId,
    engine: Engine,
    seats: [Option<Box<dyn AIOpponent>>; 2],
    bus: EventBus,
    settings: HostSettings,
    inbox: mpsc::Receiver<SessionCommand>,
    redeal_at: Option<Instant>,
    seq: u64,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("round", &self.engine.round_number())
            .field("scores", &self.engine.scores())
            .field("seq", &self.seq)
            .finish()
    }
}

impl GameSession {
    /// Starts the game and spawns its actor on the current runtime.
    pub fn spawn(
        id: SessionId,
        config: &SessionConfig,
        settings: HostSettings,
        bus: EventBus,
    ) -> Result<(SessionHandle, JoinHandle<()>), SessionError> {
        settings.validate()?;
        let mut engine = Engine::new(config.seed, settings.rules.clone());
        let seed = engine.seed();
        let mut seats: [Option<Box<dyn AIOpponent>>; 2] = [None, None];
        for (player_id, seat) in config.seats.iter().enumerate() {
            if let Some(name) = seat {
                let ai = create_ai(name, seed.wrapping_add(player_id as u64)).ok_or_else(|| {
                    crate::settings::SettingsError::InvalidValue(format!("unknown AI '{}'", name))
                })?;
                seats[player_id] = Some(ai);
            }
        }
        engine.start()?;

        let (sender, inbox) = mpsc::channel(settings.command_buffer);
        let session = GameSession {
            id: id.clone(),
            engine,
            seats,
            bus,
            settings,
            inbox,
            redeal_at: None,
            seq: 0,
        };
        tracing::info!(session_id = %id, seed, "session started");
        let task = tokio::spawn(session.run());
        Ok((SessionHandle { id, sender }, task))
    }

    async fn run(mut self) {
        let mut interval =
            tokio::time::interval(Duration::from_millis(self.settings.tick_interval_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_tick = Instant::now();
        self.after_step();

        let reason = loop {
            tokio::select! {
                command = self.inbox.recv() => match command {
                    Some(SessionCommand::Shutdown { reply }) => {
                        let _ = reply.send(());
                        break "shutdown";
                    }
                    Some(command) => self.handle_command(command),
                    None => break "all handles dropped",
                },
                now = interval.tick() => {
                    let elapsed = now.saturating_duration_since(last_tick);
                    last_tick = now;
                    self.on_tick(now, elapsed);
                }
            }
            self.after_step();
        };

        tracing::info!(session_id = %self.id, reason, "session stopped");
        self.bus.broadcast(
            &self.id,
            HostEvent::SessionClosed {
                session_id: self.id.clone(),
                reason: reason.to_string(),
            },
        );
        self.bus.drop_session(&self.id);
    }

    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Play {
                player_id,
                card_code,
                reply,
            } => {
                let result = self
                    .engine
                    .play_card(player_id, card_code)
                    .map_err(SessionError::from);
                self.log_result(&result);
                let _ = reply.send(result);
            }
            SessionCommand::RequestDeal { reply } => {
                let result = self.engine.request_deal().map_err(SessionError::from);
                if result.is_ok() {
                    self.redeal_at = None;
                }
                self.log_result(&result);
                let _ = reply.send(result);
            }
            SessionCommand::PassTurn { reply } => {
                let result = self.engine.pass_turn().map_err(SessionError::from);
                self.log_result(&result);
                let _ = reply.send(result);
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(self.state());
            }
            // handled by the loop
            SessionCommand::Shutdown { reply } => {
                let _ = reply.send(());
            }
        }
    }

    fn on_tick(&mut self, now: Instant, elapsed: Duration) {
        if self.engine.is_game_over() {
            return;
        }
        if self.redeal_at.is_some_and(|at| now >= at) {
            self.redeal_at = None;
            if let Err(e) = self.engine.request_deal() {
                let err = SessionError::from(e);
                err.log(&self.id);
                self.bus.broadcast(
                    &self.id,
                    HostEvent::Error {
                        session_id: self.id.clone(),
                        message: err.to_string(),
                    },
                );
            }
        }

        for signal in self.engine.tick(elapsed) {
            let TurnSignal::Timeout(player_id) = signal else {
                continue;
            };
            tracing::debug!(session_id = %self.id, player_id, "turn timed out");
            if !self.settings.pass_on_timeout {
                continue;
            }
            if let Err(e) = self.engine.pass_turn() {
                SessionError::from(e).log(&self.id);
            }
        }
    }

    /// Lets AI seats move, schedules a pending re-deal and publishes events.
    fn after_step(&mut self) {
        self.play_ai_turns();
        if self.engine.needs_deal() && self.redeal_at.is_none() {
            self.redeal_at =
                Some(Instant::now() + Duration::from_millis(self.settings.redeal_delay_ms));
        }
        self.publish();
    }

    fn play_ai_turns(&mut self) {
        while !self.engine.is_game_over() && self.engine.phase() == RoundPhase::Playing {
            let current = self.engine.current_player();
            if !self.engine.is_players_turn(current) {
                return;
            }
            let Some(ai) = self.seats[current].as_ref() else {
                return;
            };
            let Some(card) = ai.choose_card(&self.engine, current) else {
                return;
            };
            if let Err(e) = self.engine.play_card(current, card.code()) {
                SessionError::from(e).log(&self.id);
                return;
            }
        }
    }

    fn publish(&mut self) {
        for event in self.engine.drain_events() {
            self.seq += 1;
            self.bus.broadcast(
                &self.id,
                HostEvent::Game {
                    session_id: self.id.clone(),
                    seq: self.seq,
                    event,
                },
            );
        }
    }

    fn state(&self) -> SessionState {
        SessionState {
            session_id: self.id.clone(),
            snapshot: self.engine.snapshot(),
            needs_deal: self.engine.needs_deal(),
            winner: self.engine.winner(),
            events_sent: self.seq,
        }
    }

    fn log_result<T>(&self, result: &Result<T, SessionError>) {
        if let Err(e) = result {
            e.log(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ronda_engine::events::GameEvent;

    fn quick_settings() -> HostSettings {
        HostSettings {
            redeal_delay_ms: 500,
            ..HostSettings::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_reflects_started_game() {
        let bus = EventBus::new();
        let (handle, _task) = GameSession::spawn(
            "t1".into(),
            &SessionConfig::remote(Some(4)),
            quick_settings(),
            bus,
        )
        .unwrap();

        let state = handle.snapshot().await.unwrap();
        assert_eq!(state.snapshot.table.len(), 4);
        assert_eq!(state.snapshot.hands[0].len(), 3);
        assert_eq!(state.snapshot.deck.len(), 30);
        assert!(state.snapshot.current_player.is_some());
        assert!(state.events_sent > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn wrong_player_is_rejected() {
        let (handle, _task) = GameSession::spawn(
            "t2".into(),
            &SessionConfig::remote(Some(5)),
            quick_settings(),
            EventBus::new(),
        )
        .unwrap();

        let state = handle.snapshot().await.unwrap();
        let current = state.snapshot.current_player.unwrap();
        let other = 1 - current;
        let code = state.snapshot.hands[other][0];
        let err = handle.play_card(other, code).await.unwrap_err();
        assert!(matches!(err, SessionError::Game(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn play_is_broadcast() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe("t3".into());
        let (handle, _task) = GameSession::spawn(
            "t3".into(),
            &SessionConfig::remote(Some(6)),
            quick_settings(),
            bus,
        )
        .unwrap();

        let state = handle.snapshot().await.unwrap();
        let current = state.snapshot.current_player.unwrap();
        let code = state.snapshot.hands[current][0];
        handle.play_card(current, code).await.unwrap();

        let mut saw_play = false;
        while let Ok(HostEvent::Game { event, .. }) = sub.receiver.try_recv() {
            if event == (GameEvent::CardPlayed { player_id: current, card: code }) {
                saw_play = true;
            }
        }
        assert!(saw_play);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_ai_is_rejected() {
        let config = SessionConfig {
            seed: Some(1),
            seats: [None, Some("oracle".into())],
        };
        let result = GameSession::spawn("t4".into(), &config, quick_settings(), EventBus::new());
        assert!(matches!(result, Err(SessionError::Settings(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn commands_after_shutdown_report_closed() {
        let (handle, task) = GameSession::spawn(
            "t5".into(),
            &SessionConfig::remote(Some(7)),
            quick_settings(),
            EventBus::new(),
        )
        .unwrap();

        handle.shutdown().await.unwrap();
        task.await.unwrap();
        assert!(matches!(
            handle.snapshot().await,
            Err(SessionError::Closed(_))
        ));
        handle.shutdown().await.unwrap();
    }
}
