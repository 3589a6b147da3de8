//! Twin Voice crate - voice command engine for the operations dashboard.
//!
//! Turns recognized utterances into dashboard actions:
//! - [`intent::IntentMatcher`] scans an ordered rule table (first match wins)
//! - [`dispatcher::ActionDispatcher`] applies shell effects, calls the backend
//!   and phrases the reply, deferring long-running results behind an ack
//! - [`fallback::FallbackResponder`] forwards anything unmatched to the
//!   conversational endpoint
//! - [`speech::SpeechOutput`] voices replies, remote first, then local
//! - [`recognition::RecognitionSession`] tracks the listening lifecycle
//! - [`assistant::VoiceAssistant`] ties them together around a
//!   [`conversation::ConversationLog`]

pub mod assistant;
pub mod context;
pub mod conversation;
pub mod dispatcher;
pub mod error;
pub mod fallback;
pub mod intent;
pub mod recognition;
pub mod responses;
pub mod speech;

#[cfg(test)]
mod fakes;

pub use assistant::{UtteranceHandle, VoiceAssistant};
pub use conversation::ConversationLog;
pub use dispatcher::{ActionDispatcher, DispatchOutcome, PendingReply, Reply};
pub use error::VoiceError;
pub use fallback::FallbackResponder;
pub use intent::{suggested_commands, Intent, IntentMatcher, MatchedIntent, RuleGroup};
pub use recognition::{RecognitionEngine, RecognitionEvent, RecognitionSession, RecognitionState};
pub use speech::{AudioSink, LocalSynthesizer, SpeechOutput, SpeechPath};
