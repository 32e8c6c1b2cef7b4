use crate::session::SessionId;
use ronda_engine::events::GameEvent;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

/// Per-subscriber queue depth. A subscriber that falls this far behind
/// is dropped.
pub const SUBSCRIBER_QUEUE: usize = 1000;

/// Everything a subscriber of one session can receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// An engine event, numbered per session from 1.
    Game {
        session_id: SessionId,
        seq: u64,
        event: GameEvent,
    },
    /// A command the session could not apply on its own, such as a
    /// scheduled re-deal.
    Error {
        session_id: SessionId,
        message: String,
    },
    SessionClosed {
        session_id: SessionId,
        reason: String,
    },
}

impl HostEvent {
    pub fn session_id(&self) -> &SessionId {
        match self {
            HostEvent::Game { session_id, .. }
            | HostEvent::Error { session_id, .. }
            | HostEvent::SessionClosed { session_id, .. } => session_id,
        }
    }
}

/// A live subscription to one session. Dropping it unsubscribes.
pub struct EventSubscription {
    pub receiver: mpsc::Receiver<HostEvent>,
    bus: EventBus,
    session_id: SessionId,
    ticket: u64,
}

impl EventSubscription {
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.session_id, self.ticket);
    }
}

impl std::fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventSubscription({}#{})", self.session_id, self.ticket)
    }
}

type Routes = HashMap<SessionId, HashMap<u64, mpsc::Sender<HostEvent>>>;

/// Routes session events to bounded per-subscriber queues.
///
/// Cloning is cheap; all clones share the same routing table.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    routes: Arc<Mutex<Routes>>,
    tickets: Arc<AtomicU64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn routes(&self) -> MutexGuard<'_, Routes> {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self, session_id: SessionId) -> EventSubscription {
        let (tx, receiver) = mpsc::channel(SUBSCRIBER_QUEUE);
        let ticket = self.tickets.fetch_add(1, Ordering::Relaxed);
        self.routes()
            .entry(session_id.clone())
            .or_default()
            .insert(ticket, tx);
        tracing::debug!(session_id = %session_id, ticket, "subscriber added");

        EventSubscription {
            receiver,
            bus: self.clone(),
            session_id,
            ticket,
        }
    }

    /// Queues `event` for every subscriber of `session_id` without
    /// waiting. Subscribers that are full or gone are removed.
    pub fn broadcast(&self, session_id: &SessionId, event: HostEvent) {
        tracing::trace!(session_id = %session_id, ?event, "broadcast");

        let mut routes = self.routes();
        let Some(targets) = routes.get_mut(session_id) else {
            return;
        };
        targets.retain(|ticket, tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    ticket = *ticket,
                    error = %e,
                    "dropping subscriber"
                );
                false
            }
        });
        if targets.is_empty() {
            routes.remove(session_id);
        }
    }

    pub fn unsubscribe(&self, session_id: &SessionId, ticket: u64) {
        let mut routes = self.routes();
        if let Some(targets) = routes.get_mut(session_id) {
            targets.remove(&ticket);
            if targets.is_empty() {
                routes.remove(session_id);
            }
        }
    }

    /// Forgets every subscriber of a session. Their receivers see the
    /// channel close once buffered events are read.
    pub fn drop_session(&self, session_id: &SessionId) {
        self.routes().remove(session_id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.routes().values().map(HashMap::len).sum()
    }
}
