//! CLI error type. Handlers return `Result<(), CliError>` and `run` turns
//! any error into exit code `2`.

use std::fmt;
use std::io;

use ronda_engine::errors::GameError;

#[derive(Debug)]
pub enum CliError {
    /// Reading or writing a file or stream failed.
    Io(io::Error),
    /// Bad arguments or malformed input data.
    InvalidInput(String),
    Config(String),
    /// The engine refused an operation.
    Engine(String),
}

impl CliError {
    fn kind(&self) -> &'static str {
        match self {
            CliError::Io(_) => "I/O error",
            CliError::InvalidInput(_) => "Invalid input",
            CliError::Config(_) => "Configuration error",
            CliError::Engine(_) => "Engine error",
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        match self {
            CliError::Io(e) => write!(f, "{kind}: {e}"),
            CliError::InvalidInput(detail) | CliError::Config(detail) | CliError::Engine(detail) => {
                write!(f, "{kind}: {detail}")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let CliError::Io(e) = self {
            Some(e)
        } else {
            None
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<GameError> for CliError {
    fn from(e: GameError) -> Self {
        CliError::Engine(e.to_string())
    }
}

impl From<String> for CliError {
    fn from(detail: String) -> Self {
        CliError::Engine(detail)
    }
}

/// A failure tied to one item of a batch, such as a round number.
///
/// ```rust
/// use ronda_cli::ItemError;
///
/// let error = ItemError::new(5, "score mismatch");
/// assert_eq!(error.to_string(), "5: score mismatch");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError<T> {
    pub item: T,
    pub message: String,
}

impl<T> ItemError<T> {
    pub fn new(item: T, message: impl Into<String>) -> Self {
        Self {
            item,
            message: message.into(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for ItemError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.item, self.message)
    }
}
