//! Attendance statistics aggregation
//!
//! Runs once per dashboard stats cache miss; the result is cached as a
//! pre-aggregated object.

use chrono::{Datelike, NaiveDate};
use fcache_domain::value_objects::{
    AttendanceRecord, DailyTotals, DashboardStats, PeriodTotals, ProjectTotals,
};
use std::collections::{BTreeMap, HashMap};

/// First day of `day`'s month
pub fn month_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Aggregate the current month's records as of `today`
///
/// Records outside `[month_start(today), today]` are ignored. Records without
/// a project count towards the period totals but not the project ranking.
pub fn aggregate_stats(
    records: &[AttendanceRecord],
    today: NaiveDate,
    top_projects: usize,
) -> DashboardStats {
    let from = month_start(today);
    let mut stats = DashboardStats::default();
    let mut daily: BTreeMap<NaiveDate, PeriodTotals> = BTreeMap::new();
    let mut projects: HashMap<&str, ProjectTotals> = HashMap::new();

    for record in records.iter().filter(|r| (from..=today).contains(&r.date)) {
        stats.month.add(record.hours);
        if record.date == today {
            stats.today.add(record.hours);
        }
        daily.entry(record.date).or_default().add(record.hours);

        if let Some(project_id) = record.project_id.as_deref() {
            let entry = projects.entry(project_id).or_insert_with(|| ProjectTotals {
                project_id: Some(project_id.to_string()),
                project_name: None,
                totals: PeriodTotals::default(),
            });
            if entry.project_name.is_none() {
                entry.project_name.clone_from(&record.project_name);
            }
            entry.totals.add(record.hours);
        }
    }

    stats.daily = daily
        .into_iter()
        .map(|(date, totals)| DailyTotals { date, totals })
        .collect();

    let mut ranked: Vec<ProjectTotals> = projects.into_values().collect();
    ranked.sort_by(|a, b| {
        b.totals
            .total_hours
            .total_cmp(&a.totals.total_hours)
            .then_with(|| b.totals.count.cmp(&a.totals.count))
            .then_with(|| a.project_id.cmp(&b.project_id))
    });
    ranked.truncate(top_projects);
    stats.projects = ranked;

    stats
}
