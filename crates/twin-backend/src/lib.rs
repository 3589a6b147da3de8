//! Twin Backend crate - typed client for the dashboard backend.
//!
//! Provides the [`DashboardBackend`] trait the voice engine talks to, the
//! JSON wire types, and [`HttpBackend`], a `reqwest` implementation.

pub mod error;
pub mod http;
pub mod types;

use async_trait::async_trait;
use twin_core::Domain;

pub use error::BackendError;
pub use http::HttpBackend;
pub use types::{
    ChatReply, DomainStats, OptimizationResult, OptimizeResponse, SynthesisOutcome,
    SystemMetrics,
};

/// Endpoint paths, relative to the configured base URL.
pub mod endpoints {
    use twin_core::Domain;

    pub const OPTIMIZE: &str = "/operations/optimize";
    pub const METRICS: &str = "/system/metrics";
    pub const CHAT: &str = "/assistant/chat";
    pub const SPEAK: &str = "/assistant/speak";

    /// Stats path for a domain, e.g. `/domain/hospital/stats`.
    pub fn stats(domain: Domain) -> String {
        format!("/domain/{}/stats", domain.as_str())
    }
}

/// Backend operations consumed by the voice engine.
#[async_trait]
pub trait DashboardBackend: Send + Sync {
    /// Occupancy figures for the hospital or warehouse.
    async fn domain_stats(&self, domain: Domain) -> Result<DomainStats, BackendError>;

    /// Run the optimizer for the hospital or warehouse.
    async fn optimize(&self, domain: Domain) -> Result<OptimizeResponse, BackendError>;

    /// Optimizer accuracy and error counters.
    async fn system_metrics(&self) -> Result<SystemMetrics, BackendError>;

    /// Open-ended conversational reply for an utterance no rule handled.
    async fn chat(&self, prompt: &str, context: Domain) -> Result<ChatReply, BackendError>;

    /// Remote voice synthesis.
    async fn synthesize(&self, text: &str) -> Result<SynthesisOutcome, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_endpoint() {
        assert_eq!(endpoints::stats(Domain::Hospital), "/domain/hospital/stats");
        assert_eq!(
            endpoints::stats(Domain::Warehouse),
            "/domain/warehouse/stats"
        );
    }
}
