//! # ronda_host: Authoritative Ronda Host
//!
//! Runs each game as an actor task that owns its [`Engine`](ronda_engine::engine::Engine):
//! commands and turn-clock ticks are handled one at a time, and every engine
//! event is fanned out to subscribers through the [`EventBus`].
//!
//! ```no_run
//! use ronda_host::{EventBus, SessionConfig, SessionManager};
//!
//! # async fn demo() -> Result<(), ronda_host::SessionError> {
//! let manager = SessionManager::new(EventBus::new());
//! let (id, mut events) = manager.create_subscribed(SessionConfig::default())?;
//!
//! let state = manager.get_session(&id)?.snapshot().await?;
//! println!("table: {:?}", state.snapshot.table);
//! while let Some(event) = events.receiver.recv().await {
//!     println!("{}", serde_json::to_string(&event).unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod events;
pub mod logging;
pub mod manager;
pub mod session;
pub mod settings;

pub use errors::{ErrorSeverity, SessionError};
pub use events::{EventBus, EventSubscription, HostEvent};
pub use logging::{CaptureLayer, LogCapture, LogEntry, LogFormat, init_logging, init_test_logging};
pub use manager::{SessionInfo, SessionManager};
pub use session::{
    GameSession, SessionCommand, SessionConfig, SessionHandle, SessionId, SessionState,
};
pub use settings::{HostSettings, SettingsError, SettingsStore};
