//! The rule table.
//!
//! Order is load-bearing: reordering entries changes which rule answers an
//! utterance that satisfies several predicates.

use twin_core::Domain;

use super::{Intent, IntentRule, RuleGroup};

const COUNT_WORDS: &[&str] = &["count", "how many"];
const HOSPITAL_NOUNS: &[&str] = &["bed", "hospital"];
const WAREHOUSE_NOUNS: &[&str] = &["shelf", "shelves", "warehouse", "item"];
const SLOT_NOUNS: &[&str] = &["slot", "shelf", "shelves", "warehouse"];

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// Domain keyword in the utterance, or implied by the current context.
/// The context is not overridden by naming the other domain; scan order
/// settles that case.
fn targets(text: &str, context: Domain, domain: Domain) -> bool {
    text.contains(domain.as_str()) || context == domain
}

// =============================================================================
// Predicates
// =============================================================================

fn switch_to_warehouse(text: &str, _: Domain) -> bool {
    contains_any(text, &["switch to warehouse", "change to warehouse"])
}

fn switch_to_hospital(text: &str, _: Domain) -> bool {
    contains_any(text, &["switch to hospital", "change to hospital"])
}

fn show_dashboard(text: &str, _: Domain) -> bool {
    contains_any(text, &["show metrics", "show dashboard", "dashboard"])
}

fn hospital_count(text: &str, _: Domain) -> bool {
    contains_any(text, COUNT_WORDS) && contains_any(text, HOSPITAL_NOUNS)
}

fn hospital_occupancy(text: &str, context: Domain) -> bool {
    text.contains("occupied") && targets(text, context, Domain::Hospital)
}

fn next_available(text: &str, _: Domain) -> bool {
    contains_any(text, &["next available", "next room", "next slot"])
}

fn warehouse_count(text: &str, _: Domain) -> bool {
    contains_any(text, COUNT_WORDS) && contains_any(text, WAREHOUSE_NOUNS)
}

fn warehouse_occupancy(text: &str, context: Domain) -> bool {
    text.contains("occupied") && targets(text, context, Domain::Warehouse)
}

fn optimize_hospital(text: &str, context: Domain) -> bool {
    text.contains("optimize") && targets(text, context, Domain::Hospital)
}

fn optimize_warehouse(text: &str, context: Domain) -> bool {
    text.contains("optimize") && targets(text, context, Domain::Warehouse)
}

fn accuracy(text: &str, _: Domain) -> bool {
    text.contains("accuracy")
}

fn error_count(text: &str, _: Domain) -> bool {
    text.contains("errors")
}

/// Rooms are hospital vocabulary; slots and shelves are warehouse vocabulary.
/// Without either, the warehouse context selects the warehouse.
fn next_available_domain(text: &str, context: Domain) -> Domain {
    if contains_any(text, SLOT_NOUNS) {
        Domain::Warehouse
    } else if context == Domain::Warehouse && !text.contains("room") {
        Domain::Warehouse
    } else {
        Domain::Hospital
    }
}

// =============================================================================
// Table
// =============================================================================

/// The standard rule table, in scan order.
pub fn rule_table() -> Vec<IntentRule> {
    vec![
        // Navigation and mode switching
        IntentRule {
            name: "switch_to_warehouse",
            group: RuleGroup::Navigation,
            predicate: switch_to_warehouse,
            intent: |_, _| Intent::SwitchDomain(Domain::Warehouse),
        },
        IntentRule {
            name: "switch_to_hospital",
            group: RuleGroup::Navigation,
            predicate: switch_to_hospital,
            intent: |_, _| Intent::SwitchDomain(Domain::Hospital),
        },
        IntentRule {
            name: "show_dashboard",
            group: RuleGroup::Navigation,
            predicate: show_dashboard,
            intent: |_, _| Intent::ShowDashboard,
        },
        // Domain counts and occupancy
        IntentRule {
            name: "hospital_count",
            group: RuleGroup::DomainQuery,
            predicate: hospital_count,
            intent: |_, _| Intent::CountQuery(Domain::Hospital),
        },
        IntentRule {
            name: "hospital_occupancy",
            group: RuleGroup::DomainQuery,
            predicate: hospital_occupancy,
            intent: |_, _| Intent::Occupancy(Domain::Hospital),
        },
        IntentRule {
            name: "next_available",
            group: RuleGroup::DomainQuery,
            predicate: next_available,
            intent: |text, context| Intent::NextAvailable(next_available_domain(text, context)),
        },
        IntentRule {
            name: "warehouse_count",
            group: RuleGroup::DomainQuery,
            predicate: warehouse_count,
            intent: |_, _| Intent::CountQuery(Domain::Warehouse),
        },
        IntentRule {
            name: "warehouse_occupancy",
            group: RuleGroup::DomainQuery,
            predicate: warehouse_occupancy,
            intent: |_, _| Intent::Occupancy(Domain::Warehouse),
        },
        // Optimization
        IntentRule {
            name: "optimize_hospital",
            group: RuleGroup::Optimization,
            predicate: optimize_hospital,
            intent: |_, _| Intent::Optimize(Domain::Hospital),
        },
        IntentRule {
            name: "optimize_warehouse",
            group: RuleGroup::Optimization,
            predicate: optimize_warehouse,
            intent: |_, _| Intent::Optimize(Domain::Warehouse),
        },
        // System metrics
        IntentRule {
            name: "accuracy",
            group: RuleGroup::SystemMetrics,
            predicate: accuracy,
            intent: |_, _| Intent::Accuracy,
        },
        IntentRule {
            name: "error_count",
            group: RuleGroup::SystemMetrics,
            predicate: error_count,
            intent: |_, _| Intent::ErrorCount,
        },
    ]
}

/// Phrases offered to the operator as "try saying" hints.
pub fn suggested_commands() -> &'static [&'static str] {
    &[
        "Optimize hospital",
        "Optimize warehouse",
        "Show metrics",
        "Switch to warehouse",
        "Switch to hospital",
        "How many beds occupied?",
        "Next available room",
        "System accuracy",
        "Any errors?",
    ]
}
