//! Tests for dashboard value objects

use fcache_domain::constants::DASHBOARD_DEFAULT_LIMIT;
use fcache_domain::value_objects::{Dashboard, DashboardOptions, PeriodTotals};

#[test]
fn test_default_options() {
    let options = DashboardOptions::default();
    assert_eq!(options.limit_per_section, DASHBOARD_DEFAULT_LIMIT);
    assert!(options.recent_only);
    assert!(options.use_cache);
    assert!(options.as_of.is_none());
}

#[test]
fn test_period_totals_add() {
    let mut totals = PeriodTotals::default();
    totals.add(8.0);
    totals.add(4.5);
    assert_eq!(totals.count, 2);
    assert!((totals.total_hours - 12.5).abs() < f64::EPSILON);
}

#[test]
fn test_empty_dashboard_is_complete() {
    let dashboard = Dashboard::default();
    assert!(dashboard.is_complete());
    assert!(dashboard.subordinates.is_empty());
    assert_eq!(dashboard.records.total_count, 0);
}
