//! Intent dispatch.
//!
//! Each handler applies zero or more shell effects, issues at most one backend
//! call, and produces the reply text. Effects are pushed to the shell as they
//! are recorded, so a failed backend call never rolls them back.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use twin_backend::{endpoints, BackendError, DashboardBackend};
use twin_core::{AppShell, Domain, SideEffect};

use crate::intent::{Intent, MatchedIntent};
use crate::responses;

/// Result text of a long-running backend call, resolved after the ack.
pub struct PendingReply(Pin<Box<dyn Future<Output = String> + Send + 'static>>);

impl PendingReply {
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = String> + Send + 'static,
    {
        Self(Box::pin(future))
    }
}

impl Future for PendingReply {
    type Output = String;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<String> {
        self.0.as_mut().poll(cx)
    }
}

impl fmt::Debug for PendingReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PendingReply(..)")
    }
}

/// What the assistant says in response to one utterance.
#[derive(Debug)]
pub enum Reply {
    /// A single assistant turn.
    Immediate(String),
    /// An acknowledgment now, and the result once `pending` resolves.
    Deferred { ack: String, pending: PendingReply },
}

/// Effects applied and reply produced for one dispatched utterance.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub side_effects: Vec<SideEffect>,
    pub reply: Reply,
}

/// Executes matched intents against the backend and the application shell.
#[derive(Clone)]
pub struct ActionDispatcher {
    backend: Arc<dyn DashboardBackend>,
    shell: Arc<dyn AppShell>,
}

impl ActionDispatcher {
    pub fn new(backend: Arc<dyn DashboardBackend>, shell: Arc<dyn AppShell>) -> Self {
        Self { backend, shell }
    }

    /// Run the handler for `matched` in `context`.
    ///
    /// Never fails: a backend error becomes the apology reply, with any
    /// effects applied before the call left in place.
    pub async fn dispatch(&self, matched: &MatchedIntent, context: Domain) -> DispatchOutcome {
        let mut effects = Vec::new();
        let reply = match self.handle(matched.intent, context, &mut effects).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(rule = matched.rule, error = %e, "Backend call failed");
                Reply::Immediate(responses::APOLOGY.to_string())
            }
        };

        tracing::info!(
            rule = matched.rule,
            effects = effects.len(),
            deferred = matches!(reply, Reply::Deferred { .. }),
            "Intent dispatched"
        );
        DispatchOutcome {
            side_effects: effects,
            reply,
        }
    }

    async fn handle(
        &self,
        intent: Intent,
        context: Domain,
        effects: &mut Vec<SideEffect>,
    ) -> Result<Reply, BackendError> {
        let text = match intent {
            Intent::SwitchDomain(domain) => {
                self.apply(effects, SideEffect::set_context(domain));
                self.apply(effects, SideEffect::navigate(domain.route()));
                responses::switched(domain)
            }
            Intent::ShowDashboard => {
                self.apply(effects, SideEffect::navigate(Domain::Dashboard.route()));
                responses::dashboard()
            }
            Intent::CountQuery(domain) => {
                if context != domain {
                    self.apply(effects, SideEffect::navigate(domain.route()));
                }
                let stats = self.fetch_stats(domain, effects).await?;
                responses::count(domain, &stats)
            }
            Intent::Occupancy(domain) => {
                let stats = self.fetch_stats(domain, effects).await?;
                responses::occupancy(domain, &stats)
            }
            Intent::NextAvailable(domain) => {
                let stats = self.fetch_stats(domain, effects).await?;
                responses::next_available(domain, &stats)
            }
            Intent::Optimize(domain) => return Ok(self.optimize(domain, effects)),
            Intent::Accuracy => {
                let metrics = self.fetch_metrics(effects).await?;
                responses::accuracy(&metrics)
            }
            Intent::ErrorCount => {
                let metrics = self.fetch_metrics(effects).await?;
                responses::errors(&metrics)
            }
        };
        Ok(Reply::Immediate(text))
    }

    fn optimize(&self, domain: Domain, effects: &mut Vec<SideEffect>) -> Reply {
        self.apply(effects, SideEffect::remote("POST", endpoints::OPTIMIZE));
        let ack = responses::optimize_ack(domain, responses::acknowledgment());

        let backend = Arc::clone(&self.backend);
        let pending = PendingReply::new(async move {
            match backend.optimize(domain).await {
                Ok(resp) => responses::optimize_result(domain, &resp.result),
                Err(e) => {
                    tracing::warn!(domain = %domain, error = %e, "Optimization failed");
                    responses::APOLOGY.to_string()
                }
            }
        });
        Reply::Deferred { ack, pending }
    }

    async fn fetch_stats(
        &self,
        domain: Domain,
        effects: &mut Vec<SideEffect>,
    ) -> Result<twin_backend::DomainStats, BackendError> {
        self.apply(effects, SideEffect::remote("GET", endpoints::stats(domain)));
        self.backend.domain_stats(domain).await
    }

    async fn fetch_metrics(
        &self,
        effects: &mut Vec<SideEffect>,
    ) -> Result<twin_backend::SystemMetrics, BackendError> {
        self.apply(effects, SideEffect::remote("GET", endpoints::METRICS));
        self.backend.system_metrics().await
    }

    /// Record `effect`, pushing shell effects through immediately.
    fn apply(&self, effects: &mut Vec<SideEffect>, effect: SideEffect) {
        match &effect {
            SideEffect::NavigateTo { route } => self.shell.navigate_to(route),
            SideEffect::SetContext { domain } => self.shell.set_active_domain(*domain),
            SideEffect::RemoteCall { .. } => {}
        }
        effects.push(effect);
    }
}
