//! Wire types for the dashboard backend API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET /domain/{domain}/stats`
///
/// The backend names the total per domain (`totalBeds`, `totalShelves`);
/// both spellings are accepted alongside the generic `total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainStats {
    #[serde(alias = "totalBeds", alias = "totalShelves")]
    pub total: u64,
    pub occupied: u64,
    #[serde(default)]
    pub available: Option<u64>,
    #[serde(
        default,
        rename = "nextAvailable",
        alias = "nextAvailableRoom",
        alias = "nextAvailableSlot"
    )]
    pub next_available: Option<u64>,
}

impl DomainStats {
    /// Free locations, derived from the totals when the backend omits it.
    pub fn available_count(&self) -> u64 {
        self.available
            .unwrap_or_else(|| self.total.saturating_sub(self.occupied))
    }
}

/// `POST /operations/optimize` request body.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
}

/// `POST /operations/optimize` response body. A body without `result` is
/// not a usable answer and fails to decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizeResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub result: OptimizationResult,
}

impl OptimizeResponse {
    /// Whether the optimizer reported a failure. A missing status counts as
    /// success.
    pub fn is_failure(&self) -> bool {
        self.status.as_deref().is_some_and(|status| status != "success")
    }
}

/// Optimizer figures. Values are kept as raw JSON since the optimizer reports
/// some of them as numbers and others as preformatted strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizationResult {
    #[serde(default)]
    pub time_saved: Option<Value>,
    #[serde(default)]
    pub beds_optimized: Option<Value>,
    #[serde(default)]
    pub distance_saved: Option<Value>,
}

/// `GET /system/metrics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub accuracy: f64,
    pub errors: u64,
}

/// `POST /assistant/chat` request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub prompt: &'a str,
    pub context: &'a str,
}

/// `POST /assistant/chat` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub status: String,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatReply {
    /// The reply text, if the endpoint reported success with a non-empty body.
    pub fn success_text(&self) -> Option<&str> {
        if self.status != "success" {
            return None;
        }
        self.response.as_deref().filter(|text| !text.trim().is_empty())
    }
}

/// `POST /assistant/speak` request body.
#[derive(Debug, Clone, Serialize)]
pub struct SpeakRequest<'a> {
    pub text: &'a str,
}

/// Result of a remote synthesis request.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisOutcome {
    /// Playable audio.
    Audio {
        content_type: String,
        bytes: Vec<u8>,
    },
    /// The endpoint answered without audio (e.g. a `mock` status when no voice
    /// service is configured upstream).
    NotAudio { status: Option<String> },
}
