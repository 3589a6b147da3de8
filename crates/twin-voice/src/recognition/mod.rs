//! Speech recognition seam and session state.

mod state;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::VoiceError;

pub use state::{
    next_state, RecognitionEvent, RecognitionSession, RecognitionState, START_FAILED_MESSAGE,
    UNSUPPORTED_MESSAGE,
};

/// A platform speech recognizer.
///
/// After `start`, the engine reports progress by sending [`RecognitionEvent`]s
/// (`Started`, then `Result` or `End`, or `StartFailed`) on `events`.
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Whether a recognizer exists on this platform.
    fn is_available(&self) -> bool;

    /// Begin capturing one utterance in `language` (e.g. `en-US`).
    async fn start(
        &self,
        language: &str,
        events: mpsc::UnboundedSender<RecognitionEvent>,
    ) -> Result<(), VoiceError>;

    /// Abandon the current capture, if any.
    async fn stop(&self);
}
