//! Error types for the host.
//!
//! Every failure a session or the manager can report is a [`SessionError`].
//! Each error carries a machine-readable code and a severity that decides
//! the level it is logged at.

use crate::session::SessionId;
use crate::settings::SettingsError;
use ronda_engine::errors::GameError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    #[error("Session closed: {0}")]
    Closed(SessionId),
    #[error("Game error: {0}")]
    Game(#[from] GameError),
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("Session storage poisoned")]
    StoragePoisoned,
}

/// Error classification for logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Rejected requests: expected during normal play
    Client,
    /// Unexpected failures that need investigation
    Server,
    /// Shared state can no longer be trusted
    Critical,
}

impl SessionError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SessionError::NotFound(_) => "session_not_found",
            SessionError::Closed(_) => "session_closed",
            SessionError::Game(GameError::DealFailed { .. }) => "deal_failed",
            SessionError::Game(_) => "rejected_intent",
            SessionError::Settings(_) => "invalid_settings",
            SessionError::StoragePoisoned => "session_storage_error",
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SessionError::StoragePoisoned => ErrorSeverity::Critical,
            SessionError::Game(GameError::DealFailed { .. }) | SessionError::Closed(_) => {
                ErrorSeverity::Server
            }
            _ => ErrorSeverity::Client,
        }
    }

    /// Logs the error at the level its severity calls for.
    pub fn log(&self, session_id: &str) {
        match self.severity() {
            ErrorSeverity::Client => tracing::debug!(
                session_id,
                code = self.error_code(),
                error = %self,
                "request rejected"
            ),
            ErrorSeverity::Server => tracing::warn!(
                session_id,
                code = self.error_code(),
                error = %self,
                "session error"
            ),
            ErrorSeverity::Critical => tracing::error!(
                session_id,
                code = self.error_code(),
                error = %self,
                "critical session error"
            ),
        }
    }
}
