//! Application bootstrap
//!
//! Composition root: builds the cache store from configuration, starts its
//! health monitor and hands out the services that run on top of it.

use fcache_application::ports::data_source::DashboardDataSource;
use fcache_application::ports::services::BatchQueryServiceInterface;
use fcache_application::use_cases::{BatchQueryService, DashboardService};
use fcache_domain::error::Result;
use fcache_domain::ports::infrastructure::CacheStoreInterface;
use fcache_infrastructure::cache::{CacheStore, build_cache_store, spawn_health_monitor};
use fcache_infrastructure::config::AppConfig;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Application context with the cache store and the services built on it
pub struct AppContext {
    /// Application configuration
    pub config: Arc<AppConfig>,
    store: Arc<CacheStore>,
    batch: Arc<BatchQueryService>,
    shutdown: CancellationToken,
    monitor: Option<JoinHandle<()>>,
}

impl AppContext {
    /// The fallback-aware cache store
    pub fn store(&self) -> Arc<CacheStore> {
        Arc::clone(&self.store)
    }

    /// Batch orchestrator using `[batch].operation_timeout_ms` as its default deadline
    pub fn batch(&self) -> Arc<dyn BatchQueryServiceInterface> {
        Arc::clone(&self.batch) as Arc<dyn BatchQueryServiceInterface>
    }

    /// Dashboard service over `source`
    pub fn dashboard(&self, source: Arc<dyn DashboardDataSource>) -> DashboardService {
        DashboardService::new(self.batch(), source)
    }

    /// Whether the background health monitor is running
    pub fn is_monitoring(&self) -> bool {
        self.monitor.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the health monitor and wait for it
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.monitor.take() {
            if let Err(e) = handle.await {
                debug!(error = %e, "cache health monitor ended abnormally");
            }
        }
    }
}

/// Initialize the application context from configuration
///
/// The health monitor probes at `[cache].health_check_interval_secs` and is
/// only started for an enabled cache.
pub async fn init_app(config: AppConfig) -> Result<AppContext> {
    let config = Arc::new(config);
    let store = build_cache_store(&config.cache).await?;

    let batch = Arc::new(
        BatchQueryService::new(Arc::clone(&store) as Arc<dyn CacheStoreInterface>)
            .with_default_timeout(config.batch.operation_timeout()),
    );

    let shutdown = CancellationToken::new();
    let monitor = config.cache.enabled.then(|| {
        spawn_health_monitor(
            Arc::clone(&store),
            config.cache.health_check_interval(),
            shutdown.clone(),
        )
    });

    info!(
        mode = %store.mode(),
        operation_timeout_ms = config.batch.operation_timeout_ms,
        monitoring = monitor.is_some(),
        "application context initialized"
    );

    Ok(AppContext {
        config,
        store,
        batch,
        shutdown,
        monitor,
    })
}
