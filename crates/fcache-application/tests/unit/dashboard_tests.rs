//! Dashboard assembly, caching and invalidation

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use fcache_application::ports::data_source::DashboardDataSource;
use fcache_application::ports::services::{BatchQueryServiceInterface, DashboardServiceInterface};
use fcache_application::use_cases::{
    BatchQueryService, DashboardService, dashboard_keys, dashboard_prefix,
};
use fcache_domain::error::{Error, Result};
use fcache_domain::ports::infrastructure::CacheStoreInterface;
use fcache_domain::value_objects::{
    AttendanceRecord, DashboardOptions, RecordsSection, SubordinateSummary,
};
use fcache_infrastructure::cache::CacheStore;
use fcache_providers::cache::MemoryCacheProvider;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
}

fn options() -> DashboardOptions {
    DashboardOptions {
        as_of: Some(as_of()),
        ..DashboardOptions::default()
    }
}

/// In-memory record store counting every read
#[derive(Default)]
struct FakeSource {
    calls: AtomicUsize,
    stats_broken: AtomicBool,
    last_day: Mutex<Option<Option<NaiveDate>>>,
}

impl FakeSource {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(id: &str, day: u32, hours: f64) -> AttendanceRecord {
        AttendanceRecord {
            id: id.to_string(),
            worker_id: "w1".to_string(),
            worker_name: Some("Ayşe Yılmaz".to_string()),
            project_id: Some("p1".to_string()),
            project_name: Some("Depo".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            hours,
            created_at: Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap(),
        }
    }
}

#[async_trait]
impl DashboardDataSource for FakeSource {
    async fn recent_subordinates(
        &self,
        _principal_id: &str,
        limit: usize,
    ) -> Result<Vec<SubordinateSummary>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((0..limit.min(2))
            .map(|i| SubordinateSummary {
                id: format!("w{i}"),
                name: "Ayşe".to_string(),
                surname: "Yılmaz".to_string(),
                code: None,
            })
            .collect())
    }

    async fn recent_records(
        &self,
        _principal_id: &str,
        day: Option<NaiveDate>,
        _limit: usize,
    ) -> Result<RecordsSection> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_day.lock().unwrap() = Some(day);
        Ok(RecordsSection {
            total_count: 7,
            records: vec![Self::record("r1", 14, 8.0)],
        })
    }

    async fn records_since(
        &self,
        _principal_id: &str,
        _since: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.stats_broken.load(Ordering::SeqCst) {
            return Err(Error::internal("query failed"));
        }
        Ok(vec![
            Self::record("r1", 14, 8.0),
            Self::record("r2", 2, 6.5),
        ])
    }
}

struct Fixture {
    store: Arc<CacheStore>,
    source: Arc<FakeSource>,
    dashboard: DashboardService,
}

fn fixture() -> Fixture {
    let store = Arc::new(CacheStore::local_only(Arc::new(MemoryCacheProvider::new())));
    let batch: Arc<dyn BatchQueryServiceInterface> = Arc::new(BatchQueryService::new(
        Arc::clone(&store) as Arc<dyn CacheStoreInterface>,
    ));
    let source = Arc::new(FakeSource::default());
    let dashboard = DashboardService::new(batch, Arc::clone(&source) as Arc<dyn DashboardDataSource>);
    Fixture {
        store,
        source,
        dashboard,
    }
}

const U1_KEYS: [&str; 3] = [
    "U1_dash_subordinates_20",
    "U1_dash_records_today_2024-05-14_20",
    "U1_dash_stats_2024-05-14",
];
#[tokio::test]
async fn test_prefix_invalidation_forces_recompute() {
    let fx = fixture();

    let first = fx.dashboard.fetch_dashboard("U1", options()).await.unwrap();
    assert!(first.is_complete());
    assert_eq!(fx.source.calls(), 3);
    for key in U1_KEYS {
        assert!(fx.store.exists(key).await, "{key} should be cached");
    }

    let cached = fx.dashboard.fetch_dashboard("U1", options()).await.unwrap();
    assert_eq!(cached, first);
    assert_eq!(fx.source.calls(), 3);

    // An external write invalidates the principal's views
    assert!(fx.store.delete_by_prefix("U1_dash_").await);
    for key in U1_KEYS {
        assert!(!fx.store.exists(key).await);
    }

    let recomputed = fx.dashboard.fetch_dashboard("U1", options()).await.unwrap();
    assert_eq!(recomputed, first);
    assert_eq!(fx.source.calls(), 6);
    for key in U1_KEYS {
        assert!(fx.store.exists(key).await);
    }
}

#[tokio::test]
async fn test_sections_are_populated() {
    let fx = fixture();
    let dashboard = fx.dashboard.fetch_dashboard("U1", options()).await.unwrap();

    assert_eq!(dashboard.subordinates.len(), 2);
    assert_eq!(dashboard.records.total_count, 7);
    assert_eq!(dashboard.stats.today.count, 1);
    assert_eq!(dashboard.stats.month.count, 2);
    assert!((dashboard.stats.month.total_hours - 14.5).abs() < f64::EPSILON);
    assert_eq!(dashboard.stats.projects.len(), 1);
    assert_eq!(*fx.source.last_day.lock().unwrap(), Some(Some(as_of())));
}

#[tokio::test]
async fn test_all_records_use_their_own_key() {
    let fx = fixture();
    let opts = DashboardOptions {
        recent_only: false,
        ..options()
    };
    fx.dashboard.fetch_dashboard("U1", opts).await.unwrap();

    assert!(fx.store.exists("U1_dash_records_all_20").await);
    assert!(!fx.store.exists("U1_dash_records_today_2024-05-14_20").await);
    assert_eq!(*fx.source.last_day.lock().unwrap(), Some(None));
}

#[tokio::test]
async fn test_failed_section_degrades_to_default() {
    let fx = fixture();
    fx.source.stats_broken.store(true, Ordering::SeqCst);

    let dashboard = fx.dashboard.fetch_dashboard("U1", options()).await.unwrap();
    assert_eq!(dashboard.degraded_sections, vec!["stats".to_string()]);
    assert_eq!(dashboard.stats, Default::default());
    assert_eq!(dashboard.subordinates.len(), 2);
    // The failure is not cached; the next call retries it
    assert!(!fx.store.exists("U1_dash_stats_2024-05-14").await);
}

#[tokio::test]
async fn test_invalidate_dashboard_is_per_principal() {
    let fx = fixture();
    fx.dashboard.fetch_dashboard("U1", options()).await.unwrap();
    fx.dashboard.fetch_dashboard("U2", options()).await.unwrap();

    assert!(fx.dashboard.invalidate_dashboard("U1").await);
    assert!(!fx.store.exists("U1_dash_stats_2024-05-14").await);
    assert!(fx.store.exists("U2_dash_stats_2024-05-14").await);
}

#[tokio::test]
async fn test_without_cache_always_recomputes() {
    let fx = fixture();
    let opts = DashboardOptions {
        use_cache: false,
        ..options()
    };
    fx.dashboard.fetch_dashboard("U1", opts).await.unwrap();
    fx.dashboard.fetch_dashboard("U1", opts).await.unwrap();

    assert_eq!(fx.source.calls(), 6);
    assert!(!fx.store.exists("U1_dash_stats_2024-05-14").await);
}

#[tokio::test]
async fn test_invalid_requests_rejected() {
    let fx = fixture();
    let err = fx.dashboard.fetch_dashboard(" ", options()).await.unwrap_err();
    assert!(err.is_invalid_argument());

    let opts = DashboardOptions {
        limit_per_section: 0,
        ..options()
    };
    let err = fx.dashboard.fetch_dashboard("U1", opts).await.unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(fx.source.calls(), 0);
}

#[test]
fn test_dashboard_prefix() {
    assert_eq!(dashboard_prefix("U1"), "U1_dash_");
}

#[test]
fn test_keys_follow_options() {
    assert_eq!(dashboard_keys("U1", &options()), U1_KEYS.map(String::from));
}

#[tokio::test]
async fn test_larger_limit_is_not_served_a_smaller_cached_slice() {
    let fx = fixture();
    let narrow = DashboardOptions {
        limit_per_section: 1,
        ..options()
    };

    let first = fx.dashboard.fetch_dashboard("U1", narrow).await.unwrap();
    assert_eq!(first.subordinates.len(), 1);

    let wide = fx.dashboard.fetch_dashboard("U1", options()).await.unwrap();
    assert_eq!(wide.subordinates.len(), 2);

    // Both variants live under the principal's prefix
    assert!(fx.dashboard.invalidate_dashboard("U1").await);
    assert!(!fx.store.exists("U1_dash_subordinates_1").await);
    assert!(!fx.store.exists("U1_dash_subordinates_20").await);
}

#[tokio::test]
async fn test_reference_day_is_part_of_the_key() {
    let fx = fixture();
    fx.dashboard.fetch_dashboard("U1", options()).await.unwrap();
    let next_day = DashboardOptions {
        as_of: as_of().succ_opt(),
        ..options()
    };
    fx.dashboard.fetch_dashboard("U1", next_day).await.unwrap();

    // Subordinates do not depend on the day and stay cached
    assert_eq!(fx.source.calls(), 5);
    assert!(fx.store.exists("U1_dash_stats_2024-05-15").await);
    assert_eq!(*fx.source.last_day.lock().unwrap(), Some(as_of().succ_opt()));
}
