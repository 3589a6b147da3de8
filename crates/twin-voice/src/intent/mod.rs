//! Intent matching against the ordered rule table.
//!
//! Matching is case-insensitive substring search. Rules are scanned in table
//! order and the first satisfied predicate wins; nothing scores specificity,
//! so a broad rule placed early shadows narrower rules after it.

mod rules;

use std::fmt;

use twin_core::Domain;

pub use rules::{rule_table, suggested_commands};

/// Rule groups, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleGroup {
    Navigation,
    DomainQuery,
    Optimization,
    SystemMetrics,
}

impl fmt::Display for RuleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleGroup::Navigation => write!(f, "navigation"),
            RuleGroup::DomainQuery => write!(f, "domain_query"),
            RuleGroup::Optimization => write!(f, "optimization"),
            RuleGroup::SystemMetrics => write!(f, "system_metrics"),
        }
    }
}

/// What the dispatcher should do for a matched utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Select the domain and open its view.
    SwitchDomain(Domain),
    /// Open the metrics dashboard.
    ShowDashboard,
    /// Report totals for a domain.
    CountQuery(Domain),
    /// Report capacity percentage for a domain.
    Occupancy(Domain),
    /// Report the next free room or slot.
    NextAvailable(Domain),
    /// Run the optimizer for a domain (two-phase reply).
    Optimize(Domain),
    /// Report optimizer accuracy.
    Accuracy,
    /// Report the system error count.
    ErrorCount,
}

/// Predicate over a normalized utterance and the current context.
pub type Predicate = fn(&str, Domain) -> bool;

/// Builds the intent for an utterance the predicate accepted.
pub type IntentBuilder = fn(&str, Domain) -> Intent;

/// One entry of the rule table.
#[derive(Clone, Copy)]
pub struct IntentRule {
    pub name: &'static str,
    pub group: RuleGroup,
    pub predicate: Predicate,
    pub intent: IntentBuilder,
}

impl fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentRule")
            .field("name", &self.name)
            .field("group", &self.group)
            .finish()
    }
}

/// Result of a successful match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedIntent {
    pub rule: &'static str,
    pub group: RuleGroup,
    pub intent: Intent,
}

/// Lowercase and trim an utterance for matching.
pub fn normalize(utterance: &str) -> String {
    utterance.trim().to_lowercase()
}

/// Ordered rule table, built once and reused.
pub struct IntentMatcher {
    rules: Vec<IntentRule>,
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentMatcher {
    /// Matcher over the standard rule table.
    pub fn new() -> Self {
        Self {
            rules: rule_table(),
        }
    }

    /// Matcher over a custom rule list, scanned in the given order.
    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    /// Find the first rule satisfied by `utterance` in `context`.
    ///
    /// Returns `None` when the utterance should go to the fallback responder.
    pub fn match_intent(&self, utterance: &str, context: Domain) -> Option<MatchedIntent> {
        let normalized = normalize(utterance);
        let rule = self
            .rules
            .iter()
            .find(|rule| (rule.predicate)(&normalized, context))?;

        let matched = MatchedIntent {
            rule: rule.name,
            group: rule.group,
            intent: (rule.intent)(&normalized, context),
        };
        tracing::debug!(
            rule = matched.rule,
            group = %matched.group,
            context = %context,
            "Intent matched"
        );
        Some(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent_of(utterance: &str, context: Domain) -> Option<Intent> {
        IntentMatcher::new()
            .match_intent(utterance, context)
            .map(|m| m.intent)
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Switch To WAREHOUSE \n"), "switch to warehouse");
    }

    #[test]
    fn test_switch_domain() {
        assert_eq!(
            intent_of("Switch to warehouse", Domain::Hospital),
            Some(Intent::SwitchDomain(Domain::Warehouse))
        );
        assert_eq!(
            intent_of("please change to hospital", Domain::Dashboard),
            Some(Intent::SwitchDomain(Domain::Hospital))
        );
    }

    #[test]
    fn test_dashboard_phrases() {
        for phrase in ["show metrics", "Show dashboard", "back to the dashboard"] {
            assert_eq!(
                intent_of(phrase, Domain::Hospital),
                Some(Intent::ShowDashboard),
                "{phrase}"
            );
        }
    }

    #[test]
    fn test_count_queries() {
        assert_eq!(
            intent_of("How many beds are occupied", Domain::Dashboard),
            Some(Intent::CountQuery(Domain::Hospital))
        );
        assert_eq!(
            intent_of("count the shelves", Domain::Dashboard),
            Some(Intent::CountQuery(Domain::Warehouse))
        );
        assert_eq!(
            intent_of("how many items do we have", Domain::Hospital),
            Some(Intent::CountQuery(Domain::Warehouse))
        );
    }

    #[test]
    fn test_occupancy_uses_context() {
        assert_eq!(
            intent_of("what's occupied", Domain::Hospital),
            Some(Intent::Occupancy(Domain::Hospital))
        );
        assert_eq!(
            intent_of("what's occupied", Domain::Warehouse),
            Some(Intent::Occupancy(Domain::Warehouse))
        );
        // No domain named and no domain context: nothing to report on.
        assert_eq!(intent_of("what's occupied", Domain::Dashboard), None);
        assert_eq!(
            intent_of("how occupied is the warehouse", Domain::Dashboard),
            Some(Intent::Occupancy(Domain::Warehouse))
        );
        assert_eq!(
            intent_of("how occupied is the warehouse", Domain::Hospital),
            Some(Intent::Occupancy(Domain::Hospital))
        );
    }

    #[test]
    fn test_next_available() {
        assert_eq!(
            intent_of("next available room", Domain::Dashboard),
            Some(Intent::NextAvailable(Domain::Hospital))
        );
        assert_eq!(
            intent_of("next available", Domain::Warehouse),
            Some(Intent::NextAvailable(Domain::Warehouse))
        );
        assert_eq!(
            intent_of("next slot please", Domain::Hospital),
            Some(Intent::NextAvailable(Domain::Warehouse))
        );
        assert_eq!(
            intent_of("next room", Domain::Warehouse),
            Some(Intent::NextAvailable(Domain::Hospital))
        );
    }

    #[test]
    fn test_optimize() {
        assert_eq!(
            intent_of("Optimize hospital", Domain::Dashboard),
            Some(Intent::Optimize(Domain::Hospital))
        );
        assert_eq!(
            intent_of("optimize", Domain::Warehouse),
            Some(Intent::Optimize(Domain::Warehouse))
        );
        assert_eq!(intent_of("optimize", Domain::Dashboard), None);
        assert_eq!(
            intent_of("Optimize warehouse", Domain::Dashboard),
            Some(Intent::Optimize(Domain::Warehouse))
        );
        // The hospital context qualifies the hospital rule, which is scanned
        // first, even when the warehouse is named.
        assert_eq!(
            intent_of("Optimize warehouse", Domain::Hospital),
            Some(Intent::Optimize(Domain::Hospital))
        );
        assert_eq!(
            intent_of("Optimize hospital", Domain::Warehouse),
            Some(Intent::Optimize(Domain::Hospital))
        );
    }

    #[test]
    fn test_system_metrics() {
        assert_eq!(
            intent_of("System accuracy", Domain::Dashboard),
            Some(Intent::Accuracy)
        );
        assert_eq!(
            intent_of("Any errors?", Domain::Hospital),
            Some(Intent::ErrorCount)
        );
    }

    #[test]
    fn test_no_match_goes_to_fallback() {
        assert_eq!(intent_of("tell me a joke", Domain::Dashboard), None);
        assert_eq!(intent_of("", Domain::Hospital), None);
    }

    #[test]
    fn test_table_order_shadows_later_rules() {
        // "dashboard" is a navigation trigger, scanned before every query rule.
        assert_eq!(
            intent_of("how many beds on the dashboard", Domain::Hospital),
            Some(Intent::ShowDashboard)
        );
        // Hospital rules come before warehouse rules.
        assert_eq!(
            intent_of("optimize the hospital and the warehouse", Domain::Dashboard),
            Some(Intent::Optimize(Domain::Hospital))
        );
        assert_eq!(
            intent_of("switch to hospital, no wait, switch to warehouse", Domain::Dashboard),
            Some(Intent::SwitchDomain(Domain::Warehouse))
        );
    }

    #[test]
    fn test_custom_rule_order_is_respected() {
        let table = rule_table();
        let reversed: Vec<IntentRule> = table.iter().rev().copied().collect();
        let matcher = IntentMatcher::with_rules(reversed);
        let matched = matcher
            .match_intent("optimize the hospital and the warehouse", Domain::Dashboard)
            .unwrap();
        assert_eq!(matched.intent, Intent::Optimize(Domain::Warehouse));
    }

    #[test]
    fn test_groups_are_in_scan_order() {
        let groups: Vec<RuleGroup> = rule_table().iter().map(|r| r.group).collect();
        let mut sorted = groups.clone();
        sorted.sort();
        assert_eq!(groups, sorted);
    }

    #[test]
    fn test_every_suggestion_matches_a_rule() {
        let matcher = IntentMatcher::new();
        for suggestion in suggested_commands() {
            assert!(
                matcher.match_intent(suggestion, Domain::Hospital).is_some(),
                "suggestion {suggestion:?} fell through to the fallback"
            );
        }
    }
}
