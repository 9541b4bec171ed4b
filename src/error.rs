use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a field of a timer configuration was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Missing,
    WrongType { expected: &'static str },
    NotPositive,
    OutOfRange,
    InvalidColor,
    Empty,
    Unknown,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing => write!(f, "missing"),
            Violation::WrongType { expected } => write!(f, "expected {expected}"),
            Violation::NotPositive => write!(f, "has to be higher than 0"),
            Violation::OutOfRange => write!(f, "is too large"),
            Violation::InvalidColor => write!(f, "is not a '#rrggbb' color"),
            Violation::Empty => write!(f, "must not be empty"),
            Violation::Unknown => write!(f, "is not a known field"),
        }
    }
}

/// First offending field found while validating a raw configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{field}' {violation}")]
pub struct SchemaError {
    pub field: String,
    pub violation: Violation,
}

impl SchemaError {
    pub fn new(field: impl Into<String>, violation: Violation) -> Self {
        Self {
            field: field.into(),
            violation,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config is corrupted or incorrect: {0}")]
    Schema(#[from] SchemaError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotkeyError {
    #[error("invalid key binding '{0}'")]
    InvalidBinding(String),
    #[error("failed to register hotkey '{binding}': {reason}")]
    Registration { binding: String, reason: String },
    #[error("global hotkeys are not supported on this platform")]
    Unsupported,
    #[error("hotkey listener failed to start: {0}")]
    ListenerStart(String),
}

/// A key capture that did not produce a new binding. The previous binding
/// stays in effect for every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("key '{0}' cannot be bound")]
    Rejected(char),
    #[error("key capture cancelled")]
    Cancelled,
    #[error("key capture timed out")]
    TimedOut,
}
