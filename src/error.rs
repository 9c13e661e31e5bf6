//! Crate-level error types.

use std::fmt;

use crate::registry::InstanceId;

/// Errors produced by the shared-bounds crate.
///
/// Apart from [`Io`](Self::Io) and [`OptionsParse`](Self::OptionsParse),
/// every variant is a precondition violation: the caller read or started
/// something before the frame protocol made it available.
#[derive(Debug)]
pub enum TransitionError {
    /// The instance id was never registered or has been unregistered.
    UnknownInstance(InstanceId),
    /// No group is registered under the given key.
    UnknownKey(String),
    /// Lookahead bounds were read before layout reported them.
    LookaheadMissing(String),
    /// The group's current bounds were read before any were recorded.
    CurrentBoundsMissing(String),
    /// Velocity tracking was started while already tracking.
    AlreadyTracking(String),
    /// A negative animation duration scale was supplied.
    NegativeDurationScale(f32),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownInstance(id) => write!(f, "unknown instance {id}"),
            Self::UnknownKey(key) => write!(f, "no shared element for key {key}"),
            Self::LookaheadMissing(key) => {
                write!(f, "lookahead bounds not set yet for {key}")
            }
            Self::CurrentBoundsMissing(key) => {
                write!(f, "current bounds not set yet for {key}")
            }
            Self::AlreadyTracking(key) => write!(
                f,
                "attempting to begin velocity tracking for {key} when already tracking"
            ),
            Self::NegativeDurationScale(scale) => {
                write!(f, "negative duration scale factor: {scale}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for TransitionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TransitionError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
