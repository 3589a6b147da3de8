//! Application shell seam.
//!
//! The voice engine never owns routing state. It reads the current location
//! and requests navigation or an active-domain change through [`AppShell`].
//! [`ShellState`] is the in-process implementation: two `watch` cells that
//! observers (the dashboard chrome, the terminal front end) can subscribe to.

use tokio::sync::watch;

use crate::types::Domain;

/// Operations the surrounding application exposes to the voice engine.
pub trait AppShell: Send + Sync {
    /// Current navigation location, e.g. `/hospital`.
    fn location(&self) -> String;

    /// Push the application to a named view.
    fn navigate_to(&self, route: &str);

    /// Update the shared active-domain selector.
    fn set_active_domain(&self, domain: Domain);
}

/// Observable shell state with a single writer per event-loop tick.
#[derive(Debug, Clone)]
pub struct ShellState {
    location: watch::Sender<String>,
    active_domain: watch::Sender<Domain>,
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new("/")
    }
}

impl ShellState {
    /// Create shell state starting at `location`.
    ///
    /// The active domain starts as hospital, matching the dashboard chrome's
    /// default selector.
    pub fn new(location: impl Into<String>) -> Self {
        let (location, _) = watch::channel(location.into());
        let (active_domain, _) = watch::channel(Domain::Hospital);
        Self {
            location,
            active_domain,
        }
    }

    /// Currently selected domain in the dashboard chrome.
    pub fn active_domain(&self) -> Domain {
        *self.active_domain.borrow()
    }

    /// Subscribe to location changes.
    pub fn subscribe_location(&self) -> watch::Receiver<String> {
        self.location.subscribe()
    }

    /// Subscribe to active-domain changes.
    pub fn subscribe_active_domain(&self) -> watch::Receiver<Domain> {
        self.active_domain.subscribe()
    }
}

impl AppShell for ShellState {
    fn location(&self) -> String {
        self.location.borrow().clone()
    }

    fn navigate_to(&self, route: &str) {
        tracing::debug!(route = %route, "Shell navigation");
        self.location.send_replace(route.to_string());
    }

    fn set_active_domain(&self, domain: Domain) {
        tracing::debug!(domain = %domain, "Shell active domain changed");
        self.active_domain.send_replace(domain);
    }
}
