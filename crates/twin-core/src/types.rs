use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Operational domain the assistant currently assumes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Neutral metrics dashboard.
    #[default]
    Dashboard,
    /// Hospital bed management view.
    Hospital,
    /// Warehouse shelf and routing view.
    Warehouse,
}

impl Domain {
    /// Lowercase name, as used in routes and backend payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Dashboard => "dashboard",
            Domain::Hospital => "hospital",
            Domain::Warehouse => "warehouse",
        }
    }

    /// Route of the view that presents this domain.
    pub fn route(&self) -> &'static str {
        match self {
            Domain::Dashboard => "/",
            Domain::Hospital => "/hospital",
            Domain::Warehouse => "/warehouse",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who produced a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => write!(f, "user"),
            Speaker::Assistant => write!(f, "assistant"),
        }
    }
}

/// Effect requested by a dispatched intent.
///
/// Effects are recorded in the order they were applied so callers can audit
/// what an utterance did to the surrounding application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SideEffect {
    /// Push the application to a named view.
    NavigateTo { route: String },
    /// Update the globally shared active-domain selector.
    SetContext { domain: Domain },
    /// A backend call issued while handling the utterance.
    RemoteCall { method: String, endpoint: String },
}

impl SideEffect {
    pub fn navigate(route: impl Into<String>) -> Self {
        SideEffect::NavigateTo {
            route: route.into(),
        }
    }

    pub fn set_context(domain: Domain) -> Self {
        SideEffect::SetContext { domain }
    }

    pub fn remote(method: &str, endpoint: impl Into<String>) -> Self {
        SideEffect::RemoteCall {
            method: method.to_string(),
            endpoint: endpoint.into(),
        }
    }
}

// =============================================================================
// Conversation
// =============================================================================

/// One entry of the conversation log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Monotonic index within the session, starting at 0.
    pub sequence: u64,
    pub speaker: Speaker,
    pub text: String,
    /// Sequence of the user turn this assistant turn answers.
    pub in_reply_to: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn is_user(&self) -> bool {
        self.speaker == Speaker::User
    }
}
