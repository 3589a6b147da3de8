//! Active domain resolution from the navigation location.

use twin_core::Domain;

/// Derive the operational domain from a location path.
///
/// Hospital is checked first, so a path naming both domains resolves to
/// hospital.
pub fn resolve(location: &str) -> Domain {
    if location.contains("hospital") {
        Domain::Hospital
    } else if location.contains("warehouse") {
        Domain::Warehouse
    } else {
        Domain::Dashboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_routes() {
        assert_eq!(resolve("/"), Domain::Dashboard);
        assert_eq!(resolve("/hospital"), Domain::Hospital);
        assert_eq!(resolve("/warehouse"), Domain::Warehouse);
        assert_eq!(resolve("/settings"), Domain::Dashboard);
        assert_eq!(resolve(""), Domain::Dashboard);
    }

    #[test]
    fn test_resolve_substring() {
        assert_eq!(resolve("/views/hospital/ward-3"), Domain::Hospital);
        assert_eq!(resolve("/warehouse?aisle=4"), Domain::Warehouse);
    }

    #[test]
    fn test_resolve_hospital_wins_over_warehouse() {
        assert_eq!(resolve("/hospital/warehouse"), Domain::Hospital);
        assert_eq!(resolve("/warehouse/hospital"), Domain::Hospital);
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        // Routes are lowercase; anything else is not a domain route.
        assert_eq!(resolve("/Hospital"), Domain::Dashboard);
    }
}
