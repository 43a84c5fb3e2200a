//! Recorder state, error kinds and the lifecycle transition table

use std::fmt;

/// Recording state as last reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecorderState {
    #[default]
    Stopped,
    Recording,
    Paused,
}

impl fmt::Display for RecorderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Recording => write!(f, "recording"),
            Self::Paused => write!(f, "paused"),
        }
    }
}

/// Error kinds reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecorderErrorKind {
    #[default]
    None,
    ResourceError,
    FormatError,
    OutOfSpaceError,
}

impl RecorderErrorKind {
    pub const fn is_error(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for RecorderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::ResourceError => "resource error",
            Self::FormatError => "format error",
            Self::OutOfSpaceError => "out of space",
        };
        write!(f, "{}", s)
    }
}

/// Read-only snapshot of what the engine last told us.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecorderStatus {
    pub state: RecorderState,
    pub error: RecorderErrorKind,
    pub error_string: String,
    pub duration_ms: u64,
}

/// Discrete event fired alongside a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    RecordingStarted,
    Stopped,
    Paused,
    Resumed,
}

impl LifecycleEvent {
    /// Pick the lifecycle event for a state transition.
    ///
    /// Entering `Recording` from `Paused` is a resume, not a new start.
    pub const fn for_transition(old: RecorderState, new: RecorderState) -> Option<Self> {
        match (old, new) {
            (RecorderState::Stopped, RecorderState::Stopped)
            | (RecorderState::Recording, RecorderState::Recording)
            | (RecorderState::Paused, RecorderState::Paused) => None,
            (_, RecorderState::Stopped) => Some(Self::Stopped),
            (RecorderState::Paused, RecorderState::Recording) => Some(Self::Resumed),
            (_, RecorderState::Recording) => Some(Self::RecordingStarted),
            (_, RecorderState::Paused) => Some(Self::Paused),
        }
    }
}
