//! Recognition session state machine.
//!
//! Transitions:
//! - Idle/Error -> Listening (start)
//! - Idle -> Error (recognizer unavailable)
//! - Listening -> Error (microphone failed to start)
//! - Listening -> Listening (engine confirmed start)
//! - Listening -> Idle (result or end of input)
//! - Idle -> Idle (end after a result)
//! - any -> Idle (stop)

use std::fmt;

use uuid::Uuid;

use crate::error::VoiceError;

pub const UNSUPPORTED_MESSAGE: &str = "Speech recognition is not supported";
pub const START_FAILED_MESSAGE: &str = "Failed to start microphone";

/// Listening state of the recognizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RecognitionState {
    #[default]
    Idle,
    Listening,
    Error,
}

impl fmt::Display for RecognitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognitionState::Idle => write!(f, "idle"),
            RecognitionState::Listening => write!(f, "listening"),
            RecognitionState::Error => write!(f, "error"),
        }
    }
}

/// Inputs to the state machine, from the operator or the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Operator asked to listen.
    Start,
    /// Engine confirmed the microphone is live.
    Started,
    /// Engine produced a final transcript.
    Result(String),
    /// Engine stopped without a transcript.
    End,
    /// Operator closed the session.
    Stop,
    /// No recognizer on this platform.
    Unavailable,
    /// Engine could not open the microphone.
    StartFailed(String),
}

impl RecognitionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RecognitionEvent::Start => "start",
            RecognitionEvent::Started => "started",
            RecognitionEvent::Result(_) => "result",
            RecognitionEvent::End => "end",
            RecognitionEvent::Stop => "stop",
            RecognitionEvent::Unavailable => "unavailable",
            RecognitionEvent::StartFailed(_) => "start_failed",
        }
    }
}

/// Target state for `event` in `from`, or `None` if the event is not allowed.
pub fn next_state(from: RecognitionState, event: &RecognitionEvent) -> Option<RecognitionState> {
    use RecognitionEvent as E;
    use RecognitionState as S;

    match (from, event) {
        (_, E::Stop) => Some(S::Idle),
        (S::Idle | S::Error, E::Start) => Some(S::Listening),
        (S::Idle, E::Unavailable) => Some(S::Error),
        (S::Listening, E::StartFailed(_)) => Some(S::Error),
        (S::Listening, E::Started) => Some(S::Listening),
        (S::Listening, E::Result(_) | E::End) => Some(S::Idle),
        // Engines report end of input after the final result.
        (S::Idle, E::End) => Some(S::Idle),
        _ => None,
    }
}

/// One operator-facing recognition session.
#[derive(Debug, Default)]
pub struct RecognitionSession {
    state: RecognitionState,
    error: Option<String>,
    surface_open: bool,
    session_id: Option<Uuid>,
}

impl RecognitionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RecognitionState {
        self.state
    }

    /// User-visible error message, if the last attempt failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the assistant surface is shown.
    pub fn surface_open(&self) -> bool {
        self.surface_open
    }

    /// Identifier of the listening attempt, assigned on start.
    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn is_listening(&self) -> bool {
        self.state == RecognitionState::Listening
    }

    /// Apply `event`. Returns the transcript when the event carries one.
    ///
    /// Rejected events leave the session untouched.
    pub fn handle(&mut self, event: RecognitionEvent) -> Result<Option<String>, VoiceError> {
        let from = self.state;
        let to = next_state(from, &event).ok_or(VoiceError::InvalidTransition {
            from,
            event: event.name(),
        })?;

        tracing::debug!("Recognition state: {} -> {} ({})", from, to, event.name());
        self.state = to;

        let transcript = match event {
            RecognitionEvent::Start => {
                self.error = None;
                self.surface_open = true;
                self.session_id = Some(Uuid::new_v4());
                None
            }
            RecognitionEvent::Unavailable => {
                self.error = Some(UNSUPPORTED_MESSAGE.to_string());
                None
            }
            RecognitionEvent::StartFailed(reason) => {
                tracing::warn!(reason = %reason, "Microphone failed to start");
                self.error = Some(START_FAILED_MESSAGE.to_string());
                None
            }
            RecognitionEvent::Stop => {
                self.surface_open = false;
                self.session_id = None;
                None
            }
            RecognitionEvent::Result(text) => Some(text),
            RecognitionEvent::Started | RecognitionEvent::End => None,
        };
        Ok(transcript)
    }
}

// =============================================================================
// Tests
// =============================================================================
