//! Response phrasing for dispatched intents.

use rand::seq::IndexedRandom;
use serde_json::Value;
use twin_backend::{DomainStats, OptimizationResult, SystemMetrics};
use twin_core::Domain;

/// Spoken when a backend call fails while handling a rule.
pub const APOLOGY: &str = "Sorry, I'm having trouble accessing real-time data.";

/// Spoken when no rule matched and the conversational endpoint gave nothing.
pub const FALLBACK: &str = "I understand. How else can I assist with your operations?";

/// Acknowledgments spoken before a long-running operation resolves.
pub const ACKNOWLEDGMENTS: &[&str] = &[
    "Got it",
    "Understood",
    "Processing",
    "On it",
    "Working on it",
    "Checking that for you",
];

/// Pick an acknowledgment uniformly at random.
pub fn acknowledgment() -> &'static str {
    ACKNOWLEDGMENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(ACKNOWLEDGMENTS[0])
}

/// `round(100 * occupied / total)`, with an empty domain reported as 0%.
pub fn capacity_percent(occupied: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (occupied as f64 * 100.0 / total as f64).round() as u64
}

pub fn switched(domain: Domain) -> String {
    format!("Switched to {} operations view.", domain)
}

pub fn dashboard() -> String {
    "Displaying the metrics dashboard.".to_string()
}

pub fn count(domain: Domain, stats: &DomainStats) -> String {
    match domain {
        Domain::Warehouse => format!(
            "Warehouse has {} locations, with {} currently holding items.",
            stats.total, stats.occupied
        ),
        _ => format!(
            "There are {} total beds. {} are occupied and {} are available, {}% capacity.",
            stats.total,
            stats.occupied,
            stats.available_count(),
            capacity_percent(stats.occupied, stats.total)
        ),
    }
}

pub fn occupancy(domain: Domain, stats: &DomainStats) -> String {
    let percent = capacity_percent(stats.occupied, stats.total);
    match domain {
        Domain::Warehouse => format!("Warehouse is at {}% capacity.", percent),
        _ => format!(
            "Hospital is at {}% capacity, that's {} beds occupied.",
            percent, stats.occupied
        ),
    }
}

/// Next free location. The backend numbers locations sequentially, so when it
/// reports availability without a number the first free one is `occupied + 1`.
pub fn next_available(domain: Domain, stats: &DomainStats) -> String {
    let next = if stats.available_count() > 0 {
        Some(stats.next_available.unwrap_or(stats.occupied + 1))
    } else {
        None
    };

    match (domain, next) {
        (Domain::Warehouse, Some(slot)) => format!("The next available slot is S{}.", slot),
        (Domain::Warehouse, None) => "No slots are currently available.".to_string(),
        (_, Some(room)) => format!("The next available room is Room {}.", room),
        (_, None) => "No rooms are currently available.".to_string(),
    }
}

pub fn optimize_ack(domain: Domain, ack: &str) -> String {
    match domain {
        Domain::Warehouse => format!("{}, optimizing warehouse routing...", ack),
        _ => format!("{}, running optimization...", ack),
    }
}

pub fn optimize_result(domain: Domain, result: &OptimizationResult) -> String {
    match domain {
        Domain::Warehouse => {
            let distance = result
                .distance_saved
                .as_ref()
                .and_then(|v| render_figure(v, "%"))
                .unwrap_or_else(|| "12%".to_string());
            format!(
                "Optimization complete. Routing efficiency improved by {}.",
                distance
            )
        }
        _ => {
            let beds = result
                .beds_optimized
                .as_ref()
                .and_then(|v| render_figure(v, ""))
                .unwrap_or_else(|| "100".to_string());
            let minutes = result
                .time_saved
                .as_ref()
                .and_then(|v| render_figure(v, ""))
                .unwrap_or_else(|| "15".to_string());
            format!(
                "Optimization complete. Processed {} beds. Reduced average wait time by {} minutes.",
                beds, minutes
            )
        }
    }
}

/// The figure is reported exactly as the backend sent it.
pub fn accuracy(metrics: &SystemMetrics) -> String {
    format!(
        "The optimization accuracy is {} percent.",
        metrics.accuracy
    )
}

pub fn errors(metrics: &SystemMetrics) -> String {
    if metrics.errors == 0 {
        "No errors detected.".to_string()
    } else {
        format!("Detected {} system errors.", metrics.errors)
    }
}

/// Render an optimizer figure. Numbers get `unit` appended, strings are used
/// verbatim, anything else (including zero and empty strings) is treated as
/// missing.
fn render_figure(value: &Value, unit: &str) -> Option<String> {
    match value {
        Value::Number(n) => {
            let n = n.as_f64()?;
            (n != 0.0).then(|| format!("{}{}", format_number(n), unit))
        }
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Whole numbers without a fractional part, others to one decimal place.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{:.1}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stats(total: u64, occupied: u64) -> DomainStats {
        DomainStats {
            total,
            occupied,
            available: Some(total.saturating_sub(occupied)),
            next_available: None,
        }
    }

    #[test]
    fn test_capacity_percent() {
        assert_eq!(capacity_percent(65, 100), 65);
        assert_eq!(capacity_percent(1, 3), 33);
        assert_eq!(capacity_percent(2, 3), 67);
        assert_eq!(capacity_percent(1, 8), 13); // 12.5 rounds up
        assert_eq!(capacity_percent(0, 50), 0);
        assert_eq!(capacity_percent(50, 50), 100);
    }

    #[test]
    fn test_capacity_percent_empty_domain() {
        assert_eq!(capacity_percent(0, 0), 0);
        assert_eq!(capacity_percent(5, 0), 0);
    }

    #[test]
    fn test_acknowledgment_from_fixed_set() {
        for _ in 0..50 {
            assert!(ACKNOWLEDGMENTS.contains(&acknowledgment()));
        }
    }

    #[test]
    fn test_switched() {
        assert_eq!(
            switched(Domain::Warehouse),
            "Switched to warehouse operations view."
        );
        assert_eq!(
            switched(Domain::Hospital),
            "Switched to hospital operations view."
        );
    }

    #[test]
    fn test_hospital_count_includes_capacity() {
        let text = count(Domain::Hospital, &stats(100, 65));
        assert_eq!(
            text,
            "There are 100 total beds. 65 are occupied and 35 are available, 65% capacity."
        );
    }

    #[test]
    fn test_warehouse_count() {
        assert_eq!(
            count(Domain::Warehouse, &stats(48, 30)),
            "Warehouse has 48 locations, with 30 currently holding items."
        );
    }

    #[test]
    fn test_occupancy() {
        assert_eq!(
            occupancy(Domain::Hospital, &stats(120, 78)),
            "Hospital is at 65% capacity, that's 78 beds occupied."
        );
        assert_eq!(
            occupancy(Domain::Warehouse, &stats(0, 0)),
            "Warehouse is at 0% capacity."
        );
    }

    #[test]
    fn test_next_available() {
        let mut s = stats(100, 65);
        s.next_available = Some(70);
        assert_eq!(
            next_available(Domain::Hospital, &s),
            "The next available room is Room 70."
        );

        s.next_available = None;
        assert_eq!(
            next_available(Domain::Hospital, &s),
            "The next available room is Room 66."
        );
        assert_eq!(
            next_available(Domain::Warehouse, &s),
            "The next available slot is S66."
        );
    }

    #[test]
    fn test_next_available_when_full() {
        let mut full = stats(100, 100);
        full.next_available = Some(101);
        assert_eq!(
            next_available(Domain::Hospital, &full),
            "No rooms are currently available."
        );
        assert_eq!(
            next_available(Domain::Warehouse, &full),
            "No slots are currently available."
        );
    }

    #[test]
    fn test_optimize_ack() {
        assert_eq!(
            optimize_ack(Domain::Hospital, "On it"),
            "On it, running optimization..."
        );
        assert_eq!(
            optimize_ack(Domain::Warehouse, "Got it"),
            "Got it, optimizing warehouse routing..."
        );
    }

    #[test]
    fn test_optimize_result_defaults() {
        let empty = OptimizationResult::default();
        assert_eq!(
            optimize_result(Domain::Hospital, &empty),
            "Optimization complete. Processed 100 beds. Reduced average wait time by 15 minutes."
        );
        assert_eq!(
            optimize_result(Domain::Warehouse, &empty),
            "Optimization complete. Routing efficiency improved by 12%."
        );
    }

    #[test]
    fn test_optimize_result_reported_figures() {
        let result = OptimizationResult {
            time_saved: Some(json!(22)),
            beds_optimized: Some(json!(140)),
            distance_saved: Some(json!(17.5)),
        };
        assert_eq!(
            optimize_result(Domain::Hospital, &result),
            "Optimization complete. Processed 140 beds. Reduced average wait time by 22 minutes."
        );
        assert_eq!(
            optimize_result(Domain::Warehouse, &result),
            "Optimization complete. Routing efficiency improved by 17.5%."
        );

        let result = OptimizationResult {
            distance_saved: Some(json!("9%")),
            ..Default::default()
        };
        assert_eq!(
            optimize_result(Domain::Warehouse, &result),
            "Optimization complete. Routing efficiency improved by 9%."
        );
    }

    #[test]
    fn test_zero_figures_fall_back_to_defaults() {
        let result = OptimizationResult {
            time_saved: Some(json!(0)),
            beds_optimized: Some(json!(null)),
            distance_saved: Some(json!("")),
        };
        assert!(optimize_result(Domain::Hospital, &result).contains("Processed 100 beds"));
        assert!(optimize_result(Domain::Warehouse, &result).ends_with("by 12%."));
    }

    #[test]
    fn test_accuracy_and_errors() {
        let metrics = SystemMetrics {
            accuracy: 96.0,
            errors: 0,
        };
        assert_eq!(accuracy(&metrics), "The optimization accuracy is 96 percent.");
        assert_eq!(errors(&metrics), "No errors detected.");

        let metrics = SystemMetrics {
            accuracy: 94.37,
            errors: 3,
        };
        assert_eq!(
            accuracy(&metrics),
            "The optimization accuracy is 94.37 percent."
        );
        assert_eq!(errors(&metrics), "Detected 3 system errors.");
    }
}
