//! Conversational fallback for utterances no rule handles.

use std::sync::Arc;

use twin_backend::{endpoints, DashboardBackend};
use twin_core::{Domain, SideEffect};

use crate::dispatcher::{DispatchOutcome, Reply};
use crate::responses;

/// Forwards unmatched utterances to the conversational endpoint.
#[derive(Clone)]
pub struct FallbackResponder {
    backend: Arc<dyn DashboardBackend>,
}

impl FallbackResponder {
    pub fn new(backend: Arc<dyn DashboardBackend>) -> Self {
        Self { backend }
    }

    /// Reply to `raw` (the utterance as recognized, not normalized).
    ///
    /// Any outcome other than a successful, non-empty reply produces the
    /// static acknowledgment.
    pub async fn respond(&self, raw: &str, context: Domain) -> DispatchOutcome {
        let side_effects = vec![SideEffect::remote("POST", endpoints::CHAT)];

        let text = match self.backend.chat(raw, context).await {
            Ok(reply) => match reply.success_text() {
                Some(text) => text.to_string(),
                None => {
                    tracing::debug!(
                        status = %reply.status,
                        message = reply.message.as_deref().unwrap_or(""),
                        "Chat endpoint gave no reply"
                    );
                    responses::FALLBACK.to_string()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Chat endpoint unreachable");
                responses::FALLBACK.to_string()
            }
        };

        DispatchOutcome {
            side_effects,
            reply: Reply::Immediate(text),
        }
    }
}
