//! Tracing setup for the host, plus an in-memory capture for tests.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_FILTER: &str = "info,ronda_host=debug";

/// Output format of [`init_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// One captured event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: BTreeMap<String, String>,
}

impl LogEntry {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Shared buffer of events recorded by a [`CaptureLayer`].
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(&self) -> CaptureLayer {
        CaptureLayer {
            capture: self.clone(),
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Entries logged with `message` for one session.
    pub fn for_session(&self, session_id: &str, message: &str) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|e| e.message == message && e.field("session_id") == Some(session_id))
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Layer appending every event to its [`LogCapture`].
#[derive(Debug, Clone)]
pub struct CaptureLayer {
    capture: LogCapture,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = FieldCollector::default();
        event.record(&mut fields);
        let meta = event.metadata();
        self.capture.lock().push(LogEntry {
            level: *meta.level(),
            target: meta.target().to_string(),
            message: fields.message,
            fields: fields.values,
        });
    }
}

#[derive(Default)]
struct FieldCollector {
    message: String,
    values: BTreeMap<String, String>,
}

impl FieldCollector {
    fn put(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = value,
            name => {
                self.values.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{:?}", value));
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the default
/// filter. Does nothing if a subscriber is already installed.
pub fn init_logging(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Text => builder.with_thread_ids(true).try_init(),
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
    };
    if installed.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}

/// Installs a process-wide [`LogCapture`] on first use and returns it
/// emptied.
pub fn init_test_logging() -> LogCapture {
    static CAPTURE: OnceLock<LogCapture> = OnceLock::new();

    let capture = CAPTURE.get_or_init(|| {
        let capture = LogCapture::new();
        let _ = tracing::subscriber::set_global_default(Registry::default().with(capture.layer()));
        capture
    });
    capture.clear();
    capture.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(f: impl FnOnce()) -> LogCapture {
        let capture = LogCapture::new();
        tracing::subscriber::with_default(Registry::default().with(capture.layer()), f);
        capture
    }

    #[test]
    fn levels_are_kept_in_order() {
        let capture = captured(|| {
            tracing::debug!("tick");
            tracing::info!("session started");
            tracing::warn!("dropping subscriber");
            tracing::error!("critical session error");
        });
        let levels: Vec<Level> = capture.entries().iter().map(|e| e.level).collect();
        assert_eq!(levels, [Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR]);
    }

    #[test]
    fn fields_and_session_lookup() {
        let capture = captured(|| {
            tracing::info!(session_id = "a", seed = 7u64, "session started");
            tracing::info!(session_id = "b", seed = 8u64, "session started");
        });
        let found = capture.for_session("b", "session started");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].field("seed"), Some("8"));
        assert_eq!(found[0].target, module_path!());

        capture.clear();
        assert!(capture.entries().is_empty());
    }
}
