use std::sync::Arc;

use tokio::sync::Mutex;
use twin_backend::{DashboardBackend, SynthesisOutcome};

use super::{AudioSink, LocalSynthesizer};

/// Which tier ended up voicing a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechPath {
    Remote,
    Local,
    Silent,
}

/// Speaks assistant turns, one at a time.
#[derive(Clone)]
pub struct SpeechOutput {
    backend: Option<Arc<dyn DashboardBackend>>,
    sink: Option<Arc<dyn AudioSink>>,
    local: Option<Arc<dyn LocalSynthesizer>>,
    /// Held for the whole of one turn so an ack finishes before its result.
    playback: Arc<Mutex<()>>,
}

impl Default for SpeechOutput {
    fn default() -> Self {
        Self::silent()
    }
}

impl SpeechOutput {
    /// Output that never makes a sound.
    pub fn silent() -> Self {
        Self {
            backend: None,
            sink: None,
            local: None,
            playback: Arc::new(Mutex::new(())),
        }
    }

    /// Enable remote synthesis through `backend`, played on `sink`.
    pub fn with_remote(mut self, backend: Arc<dyn DashboardBackend>, sink: Arc<dyn AudioSink>) -> Self {
        self.backend = Some(backend);
        self.sink = Some(sink);
        self
    }

    /// Enable the on-device synthesizer.
    pub fn with_local(mut self, local: Arc<dyn LocalSynthesizer>) -> Self {
        self.local = Some(local);
        self
    }

    /// Speak `text`, degrading silently. Never fails.
    pub async fn speak(&self, text: &str) -> SpeechPath {
        if text.trim().is_empty() {
            return SpeechPath::Silent;
        }
        let _turn = self.playback.lock().await;

        if self.speak_remote(text).await {
            return SpeechPath::Remote;
        }
        if self.speak_local(text).await {
            return SpeechPath::Local;
        }
        tracing::debug!("No speech path available, turn left unspoken");
        SpeechPath::Silent
    }

    async fn speak_remote(&self, text: &str) -> bool {
        let (Some(backend), Some(sink)) = (&self.backend, &self.sink) else {
            return false;
        };

        match backend.synthesize(text).await {
            Ok(SynthesisOutcome::Audio {
                content_type,
                bytes,
            }) => match sink.play(&bytes, &content_type).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "Remote audio playback failed");
                    false
                }
            },
            Ok(SynthesisOutcome::NotAudio { status }) => {
                tracing::debug!(status = ?status, "Remote synthesis returned no audio");
                false
            }
            Err(e) => {
                tracing::debug!(error = %e, "Remote synthesis unavailable");
                false
            }
        }
    }

    async fn speak_local(&self, text: &str) -> bool {
        let Some(local) = self.local.as_ref().filter(|l| l.is_available()) else {
            return false;
        };
        match local.speak(text).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Local synthesis failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeBackend, RecordingSink, RecordingVoice};

    fn audio() -> SynthesisOutcome {
        SynthesisOutcome::Audio {
            content_type: "audio/mpeg".to_string(),
            bytes: vec![0xFF, 0xFB, 0x90, 0x00],
        }
    }

    #[tokio::test]
    async fn test_remote_audio_goes_to_sink() {
        let backend = Arc::new(FakeBackend {
            speak: Some(audio()),
            ..Default::default()
        });
        let sink = Arc::new(RecordingSink::default());
        let voice = Arc::new(RecordingVoice::default());
        let output = SpeechOutput::silent()
            .with_remote(backend, sink.clone())
            .with_local(voice.clone());

        assert_eq!(output.speak("Displaying the metrics dashboard.").await, SpeechPath::Remote);
        assert_eq!(sink.played(), vec![("audio/mpeg".to_string(), 4)]);
        assert!(voice.spoken().is_empty());
    }

    #[tokio::test]
    async fn test_mock_status_falls_back_to_local() {
        let backend = Arc::new(FakeBackend {
            speak: Some(SynthesisOutcome::NotAudio {
                status: Some("mock".to_string()),
            }),
            ..Default::default()
        });
        let sink = Arc::new(RecordingSink::default());
        let voice = Arc::new(RecordingVoice::default());
        let output = SpeechOutput::silent()
            .with_remote(backend, sink.clone())
            .with_local(voice.clone());

        assert_eq!(output.speak("No errors detected.").await, SpeechPath::Local);
        assert!(sink.played().is_empty());
        assert_eq!(voice.spoken(), vec!["No errors detected.".to_string()]);
    }

    #[tokio::test]
    async fn test_sink_failure_falls_back_to_local() {
        let backend = Arc::new(FakeBackend {
            speak: Some(audio()),
            ..Default::default()
        });
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let voice = Arc::new(RecordingVoice::default());
        let output = SpeechOutput::silent()
            .with_remote(backend, sink)
            .with_local(voice.clone());

        assert_eq!(output.speak("hello").await, SpeechPath::Local);
    }

    #[tokio::test]
    async fn test_everything_unavailable_is_silent() {
        let voice = Arc::new(RecordingVoice {
            unavailable: true,
            ..Default::default()
        });
        let output = SpeechOutput::silent()
            .with_remote(Arc::new(FakeBackend::default()), Arc::new(RecordingSink::default()))
            .with_local(voice.clone());
        assert_eq!(output.speak("hello").await, SpeechPath::Silent);
        assert!(voice.spoken().is_empty());

        let broken = Arc::new(RecordingVoice {
            fail: true,
            ..Default::default()
        });
        let output = SpeechOutput::silent().with_local(broken);
        assert_eq!(output.speak("hello").await, SpeechPath::Silent);
    }

    #[tokio::test]
    async fn test_local_only_skips_remote() {
        let backend = Arc::new(FakeBackend::default());
        let voice = Arc::new(RecordingVoice::default());
        let output = SpeechOutput::silent().with_local(voice.clone());
        assert_eq!(output.speak("hi").await, SpeechPath::Local);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_blank_text_is_not_spoken() {
        let voice = Arc::new(RecordingVoice::default());
        let output = SpeechOutput::silent().with_local(voice.clone());
        assert_eq!(output.speak("   ").await, SpeechPath::Silent);
        assert!(voice.spoken().is_empty());
    }
}
