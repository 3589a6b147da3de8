//! Error types for the voice engine.

use twin_core::TwinError;

use crate::recognition::RecognitionState;

/// Errors from the voice engine.
///
/// Remote-call failures never appear here: the dispatcher turns them into a
/// spoken apology at the dispatch boundary.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("speech recognition is not supported")]
    CapabilityUnavailable,
    #[error("failed to start microphone: {0}")]
    StartFailed(String),
    #[error("invalid recognition transition: {event} while {from}")]
    InvalidTransition {
        from: RecognitionState,
        event: &'static str,
    },
    #[error("synthesis failed: {0}")]
    Synthesis(String),
    #[error("playback failed: {0}")]
    Playback(String),
}

impl From<VoiceError> for TwinError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::Synthesis(msg) | VoiceError::Playback(msg) => TwinError::Synthesis(msg),
            other => TwinError::Recognition(other.to_string()),
        }
    }
}
