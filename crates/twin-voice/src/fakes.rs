//! In-memory implementations of the engine's seams for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use twin_backend::{
    BackendError, ChatReply, DashboardBackend, DomainStats, OptimizeResponse, SynthesisOutcome,
    SystemMetrics,
};
use twin_core::Domain;

use crate::error::VoiceError;
use crate::speech::{AudioSink, LocalSynthesizer};

fn unavailable(endpoint: &str) -> BackendError {
    BackendError::Status {
        endpoint: endpoint.to_string(),
        status: 503,
    }
}

/// Backend answering from fixed values; `None` fields fail with a 503.
#[derive(Default)]
pub struct FakeBackend {
    pub hospital: Option<DomainStats>,
    pub warehouse: Option<DomainStats>,
    pub optimize: Option<OptimizeResponse>,
    pub metrics: Option<SystemMetrics>,
    pub chat: Option<ChatReply>,
    pub speak: Option<SynthesisOutcome>,
    /// When set, `optimize` waits for a notification before answering.
    pub optimize_gate: Option<Arc<Notify>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn stats(total: u64, occupied: u64) -> DomainStats {
        DomainStats {
            total,
            occupied,
            available: Some(total.saturating_sub(occupied)),
            next_available: None,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl DashboardBackend for FakeBackend {
    async fn domain_stats(&self, domain: Domain) -> Result<DomainStats, BackendError> {
        self.record(format!("stats:{domain}"));
        let stats = match domain {
            Domain::Hospital => self.hospital.clone(),
            Domain::Warehouse => self.warehouse.clone(),
            Domain::Dashboard => return Err(BackendError::UnsupportedDomain(domain)),
        };
        stats.ok_or_else(|| unavailable("stats"))
    }

    async fn optimize(&self, domain: Domain) -> Result<OptimizeResponse, BackendError> {
        self.record(format!("optimize:{domain}"));
        if let Some(gate) = &self.optimize_gate {
            gate.notified().await;
        }
        self.optimize.clone().ok_or_else(|| unavailable("optimize"))
    }

    async fn system_metrics(&self) -> Result<SystemMetrics, BackendError> {
        self.record("metrics");
        self.metrics.clone().ok_or_else(|| unavailable("metrics"))
    }

    async fn chat(&self, prompt: &str, context: Domain) -> Result<ChatReply, BackendError> {
        self.record(format!("chat:{context}:{prompt}"));
        self.chat.clone().ok_or_else(|| unavailable("chat"))
    }

    async fn synthesize(&self, text: &str) -> Result<SynthesisOutcome, BackendError> {
        self.record(format!("speak:{text}"));
        self.speak.clone().ok_or_else(|| unavailable("speak"))
    }
}

/// Local voice that records what it said.
#[derive(Default)]
pub struct RecordingVoice {
    pub unavailable: bool,
    pub fail: bool,
    pub spoken: Mutex<Vec<String>>,
}

impl RecordingVoice {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl LocalSynthesizer for RecordingVoice {
    fn is_available(&self) -> bool {
        !self.unavailable
    }

    async fn speak(&self, text: &str) -> Result<(), VoiceError> {
        if self.fail {
            return Err(VoiceError::Synthesis("voice crashed".to_string()));
        }
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Audio sink that records played clips.
#[derive(Default)]
pub struct RecordingSink {
    pub fail: bool,
    pub played: Mutex<Vec<(String, usize)>>,
}

impl RecordingSink {
    pub fn played(&self) -> Vec<(String, usize)> {
        self.played.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioSink for RecordingSink {
    async fn play(&self, bytes: &[u8], content_type: &str) -> Result<(), VoiceError> {
        if self.fail {
            return Err(VoiceError::Playback("device gone".to_string()));
        }
        self.played
            .lock()
            .unwrap()
            .push((content_type.to_string(), bytes.len()));
        Ok(())
    }
}
