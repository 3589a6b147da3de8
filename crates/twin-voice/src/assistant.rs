//! The voice assistant: recognition session, matching, dispatch and output
//! wired together.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use twin_backend::DashboardBackend;
use twin_core::{AppShell, ConversationTurn, SideEffect};

use crate::context;
use crate::conversation::ConversationLog;
use crate::dispatcher::{ActionDispatcher, DispatchOutcome, Reply};
use crate::error::VoiceError;
use crate::fallback::FallbackResponder;
use crate::intent::IntentMatcher;
use crate::recognition::{RecognitionEngine, RecognitionEvent, RecognitionSession, RecognitionState};
use crate::speech::SpeechOutput;

/// What handling one utterance did.
#[derive(Debug)]
pub struct UtteranceHandle {
    /// Sequence of the user turn.
    pub user_sequence: u64,
    /// Effects applied while dispatching, in order.
    pub side_effects: Vec<SideEffect>,
    /// Continuation delivering a deferred result, if any.
    pub continuation: Option<JoinHandle<()>>,
}

impl UtteranceHandle {
    /// Wait for the deferred result (if any) to be logged and spoken.
    pub async fn finished(self) {
        if let Some(continuation) = self.continuation {
            if let Err(e) = continuation.await {
                tracing::warn!(error = %e, "Reply continuation did not complete");
            }
        }
    }
}

/// Voice command assistant for the operations dashboard.
pub struct VoiceAssistant {
    matcher: IntentMatcher,
    dispatcher: ActionDispatcher,
    fallback: FallbackResponder,
    speech: SpeechOutput,
    log: Arc<ConversationLog>,
    shell: Arc<dyn AppShell>,
    session: Mutex<RecognitionSession>,
    engine: Option<Arc<dyn RecognitionEngine>>,
    language: String,
}

impl VoiceAssistant {
    /// Assistant with the standard rule table, silent output and no recognizer.
    pub fn new(backend: Arc<dyn DashboardBackend>, shell: Arc<dyn AppShell>) -> Self {
        Self {
            matcher: IntentMatcher::new(),
            dispatcher: ActionDispatcher::new(Arc::clone(&backend), Arc::clone(&shell)),
            fallback: FallbackResponder::new(backend),
            speech: SpeechOutput::silent(),
            log: Arc::new(ConversationLog::new()),
            shell,
            session: Mutex::new(RecognitionSession::new()),
            engine: None,
            language: "en-US".to_string(),
        }
    }

    pub fn with_matcher(mut self, matcher: IntentMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_speech(mut self, speech: SpeechOutput) -> Self {
        self.speech = speech;
        self
    }

    pub fn with_engine(mut self, engine: Arc<dyn RecognitionEngine>, language: &str) -> Self {
        self.engine = Some(engine);
        self.language = language.to_string();
        self
    }

    pub fn log(&self) -> &Arc<ConversationLog> {
        &self.log
    }

    pub fn transcript(&self) -> Vec<ConversationTurn> {
        self.log.snapshot()
    }

    pub fn recognition_state(&self) -> RecognitionState {
        self.session().state()
    }

    /// Message to show the operator after a failed start.
    pub fn recognition_error(&self) -> Option<String> {
        self.session().error().map(str::to_string)
    }

    pub fn surface_open(&self) -> bool {
        self.session().surface_open()
    }

    fn session(&self) -> MutexGuard<'_, RecognitionSession> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    // =========================================================================
    // Recognition
    // =========================================================================

    /// Open the surface and start capturing one utterance. Engine events
    /// arrive on `events` and should be passed to [`Self::on_recognition_event`].
    pub async fn start_listening(
        &self,
        events: mpsc::UnboundedSender<RecognitionEvent>,
    ) -> Result<(), VoiceError> {
        let engine = match &self.engine {
            Some(engine) if engine.is_available() => Arc::clone(engine),
            _ => {
                let mut session = self.session();
                if session.state() != RecognitionState::Error {
                    session.handle(RecognitionEvent::Unavailable)?;
                }
                tracing::warn!("No speech recognizer available");
                return Err(VoiceError::CapabilityUnavailable);
            }
        };

        let session_id = {
            let mut session = self.session();
            session.handle(RecognitionEvent::Start)?;
            session.session_id()
        };
        tracing::info!(session = ?session_id, language = %self.language, "Listening");

        if let Err(e) = engine.start(&self.language, events).await {
            let reason = e.to_string();
            // A stop may have landed while the engine was starting.
            if self.session().is_listening() {
                self.session()
                    .handle(RecognitionEvent::StartFailed(reason.clone()))?;
            }
            return Err(VoiceError::StartFailed(reason));
        }
        Ok(())
    }

    /// Feed one engine event into the session. A final transcript is
    /// dispatched before this returns.
    pub async fn on_recognition_event(
        &self,
        event: RecognitionEvent,
    ) -> Result<Option<UtteranceHandle>, VoiceError> {
        let transcript = self.session().handle(event)?;
        match transcript {
            Some(text) => Ok(self.handle_transcript(&text).await),
            None => Ok(None),
        }
    }

    /// Close the surface, abandon recognition and clear the conversation.
    ///
    /// Continuations still in flight are not cancelled. Their results are
    /// still appended, answering a user turn that is no longer in the log.
    pub async fn stop_listening(&self) {
        let (was_listening, session_id) = {
            let session = self.session();
            (session.is_listening(), session.session_id())
        };
        if let Err(e) = self.session().handle(RecognitionEvent::Stop) {
            tracing::warn!(error = %e, "Stop rejected");
        }
        if was_listening {
            if let Some(engine) = &self.engine {
                engine.stop().await;
            }
        }
        self.log.clear();
        tracing::info!(session = ?session_id, "Assistant closed");
    }

    // =========================================================================
    // Utterances
    // =========================================================================

    /// Handle a final transcript (spoken, typed, or a clicked suggestion).
    ///
    /// Returns `None` for blank input.
    pub async fn handle_transcript(&self, transcript: &str) -> Option<UtteranceHandle> {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return None;
        }

        let user_sequence = self.log.append_user(transcript);
        let location = self.shell.location();
        let context = context::resolve(&location);
        tracing::info!(sequence = user_sequence, context = %context, "Utterance received");

        let DispatchOutcome {
            side_effects,
            reply,
        } = match self.matcher.match_intent(transcript, context) {
            Some(matched) => self.dispatcher.dispatch(&matched, context).await,
            None => {
                tracing::debug!(context = %context, "No rule matched, using fallback");
                self.fallback.respond(transcript, context).await
            }
        };

        let continuation = match reply {
            Reply::Immediate(text) => {
                self.log.append_assistant(&text, Some(user_sequence));
                self.speech.speak(&text).await;
                None
            }
            Reply::Deferred { ack, pending } => {
                self.log.append_assistant(&ack, Some(user_sequence));

                let (ack_spoken_tx, ack_spoken_rx) = oneshot::channel::<()>();
                let log = Arc::clone(&self.log);
                let speech = self.speech.clone();
                let continuation = tokio::spawn(async move {
                    let text = pending.await;
                    log.append_assistant(&text, Some(user_sequence));
                    // Keep the result behind its ack audibly too.
                    let _ = ack_spoken_rx.await;
                    speech.speak(&text).await;
                });

                self.speech.speak(&ack).await;
                let _ = ack_spoken_tx.send(());
                Some(continuation)
            }
        };

        Some(UtteranceHandle {
            user_sequence,
            side_effects,
            continuation,
        })
    }
}
