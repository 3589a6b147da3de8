//! Append-only conversation log for the current session.

use std::sync::Mutex;

use chrono::Utc;
use tokio::sync::broadcast;
use twin_core::{ConversationTurn, Speaker};

const CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
struct LogInner {
    turns: Vec<ConversationTurn>,
    next_sequence: u64,
}

/// Ordered turns of one session, observable by the presentation layer.
///
/// The lock is only held for the duration of a push or a copy, never across
/// an await.
pub struct ConversationLog {
    inner: Mutex<LogInner>,
    tx: broadcast::Sender<ConversationTurn>,
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationLog {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            inner: Mutex::new(LogInner::default()),
            tx,
        }
    }

    /// Record a transcribed utterance, returning its sequence number.
    pub fn append_user(&self, text: &str) -> u64 {
        self.append(Speaker::User, text, None)
    }

    /// Record an assistant turn answering user turn `in_reply_to`.
    pub fn append_assistant(&self, text: &str, in_reply_to: Option<u64>) -> u64 {
        self.append(Speaker::Assistant, text, in_reply_to)
    }

    fn append(&self, speaker: Speaker, text: &str, in_reply_to: Option<u64>) -> u64 {
        let turn = {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            let turn = ConversationTurn {
                sequence: inner.next_sequence,
                speaker,
                text: text.to_string(),
                in_reply_to,
                timestamp: Utc::now(),
            };
            inner.next_sequence += 1;
            inner.turns.push(turn.clone());
            turn
        };

        tracing::debug!(sequence = turn.sequence, speaker = %speaker, "Turn appended");
        let sequence = turn.sequence;
        // No subscribers is fine.
        let _ = self.tx.send(turn);
        sequence
    }

    /// Copy of every turn, in append order.
    pub fn snapshot(&self) -> Vec<ConversationTurn> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .turns
            .clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all turns. Numbering carries on, so a late reply to a cleared
    /// turn never pairs with a newer one.
    pub fn clear(&self) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .turns
            .clear();
    }

    /// Receive every turn appended from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ConversationTurn> {
        self.tx.subscribe()
    }
}
