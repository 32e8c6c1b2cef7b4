use crate::errors::SessionError;
use crate::events::{EventBus, EventSubscription};
use crate::session::{GameSession, SessionConfig, SessionHandle, SessionId};
use crate::settings::{HostSettings, SettingsStore};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Listing entry for a running session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub config: SessionConfig,
}

#[derive(Debug)]
struct SessionEntry {
    handle: SessionHandle,
    task: JoinHandle<()>,
    info: SessionInfo,
}

/// Registry of running sessions keyed by UUID.
#[derive(Debug)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
    event_bus: EventBus,
    settings: SettingsStore,
}

impl SessionManager {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            event_bus,
            settings: SettingsStore::default(),
        }
    }

    pub fn with_settings(
        event_bus: EventBus,
        settings: HostSettings,
    ) -> Result<Self, SessionError> {
        Ok(Self {
            sessions: RwLock::new(HashMap::new()),
            event_bus,
            settings: SettingsStore::with_settings(settings)?,
        })
    }

    /// Starts a new session with the current settings. Must be called from
    /// within a Tokio runtime.
    pub fn create_session(&self, config: SessionConfig) -> Result<SessionId, SessionError> {
        self.start(config, false).map(|(id, _)| id)
    }

    /// Like [`create_session`](Self::create_session), with a subscription
    /// registered before the game starts so the opening events arrive too.
    pub fn create_subscribed(
        &self,
        config: SessionConfig,
    ) -> Result<(SessionId, EventSubscription), SessionError> {
        let (id, subscription) = self.start(config, true)?;
        let subscription = subscription.ok_or(SessionError::Closed(id.clone()))?;
        Ok((id, subscription))
    }

    fn start(
        &self,
        config: SessionConfig,
        subscribe: bool,
    ) -> Result<(SessionId, Option<EventSubscription>), SessionError> {
        let id = Uuid::new_v4().to_string();
        let settings = self.settings.get()?;

        tracing::info!(
            session_id = %id,
            seed = ?config.seed,
            seats = ?config.seats,
            "creating session"
        );

        let subscription = subscribe.then(|| self.event_bus.subscribe(id.clone()));
        let (handle, task) =
            GameSession::spawn(id.clone(), &config, settings, self.event_bus.clone())?;
        let entry = SessionEntry {
            handle,
            task,
            info: SessionInfo {
                id: id.clone(),
                created_at: Utc::now(),
                config,
            },
        };

        let mut guard = self
            .sessions
            .write()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard.insert(id.clone(), entry);
        Ok((id, subscription))
    }

    pub fn get_session(&self, id: &SessionId) -> Result<SessionHandle, SessionError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(id)
            .map(|entry| entry.handle.clone())
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    /// Subscribes to a session's events. Events already sent are not
    /// replayed.
    pub fn subscribe(&self, id: &SessionId) -> Result<EventSubscription, SessionError> {
        self.get_session(id)?;
        Ok(self.event_bus.subscribe(id.clone()))
    }

    /// Running sessions, oldest first.
    pub fn list_sessions(&self) -> Vec<SessionInfo> {
        let mut infos: Vec<SessionInfo> = match self.sessions.read() {
            Ok(guard) => guard.values().map(|e| e.info.clone()).collect(),
            Err(_) => Vec::new(),
        };
        infos.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        infos
    }

    /// Stops a session and waits for its actor to finish.
    pub async fn shutdown_session(&self, id: &SessionId) -> Result<(), SessionError> {
        let entry = {
            let mut guard = self
                .sessions
                .write()
                .map_err(|_| SessionError::StoragePoisoned)?;
            guard.remove(id)
        };
        let entry = entry.ok_or_else(|| SessionError::NotFound(id.clone()))?;
        entry.handle.shutdown().await?;
        if let Err(e) = entry.task.await {
            tracing::error!(session_id = %id, error = %e, "session task failed");
        }
        Ok(())
    }

    pub async fn shutdown_all(&self) {
        let ids: Vec<SessionId> = self.list_sessions().into_iter().map(|i| i.id).collect();
        for id in ids {
            if let Err(e) = self.shutdown_session(&id).await {
                e.log(&id);
            }
        }
    }

    pub fn event_bus(&self) -> EventBus {
        self.event_bus.clone()
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }
}
