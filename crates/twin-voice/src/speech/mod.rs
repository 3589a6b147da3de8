//! Speech output.
//!
//! Remote synthesis is tried first; the local synthesizer is the only tier
//! below it. Both paths failing is not an error, the text simply goes unspoken.

mod output;

use async_trait::async_trait;

use crate::error::VoiceError;

pub use output::{SpeechOutput, SpeechPath};

/// On-device text-to-speech.
#[async_trait]
pub trait LocalSynthesizer: Send + Sync {
    /// Whether the synthesizer can be used on this machine.
    fn is_available(&self) -> bool;

    /// Speak `text`, returning once playback finished.
    async fn speak(&self, text: &str) -> Result<(), VoiceError>;
}

/// Playback for audio returned by the remote synthesizer.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Play an encoded clip, returning once playback finished.
    async fn play(&self, bytes: &[u8], content_type: &str) -> Result<(), VoiceError>;
}
