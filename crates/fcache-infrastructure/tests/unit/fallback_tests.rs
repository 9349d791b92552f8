//! Remote outages and the switch to local fallback

use crate::test_utils::remote_store;
use fcache_domain::ports::infrastructure::{CacheStoreExt, CacheStoreInterface};
use fcache_domain::ports::providers::{CacheEntryConfig, CacheProvider};
use fcache_domain::value_objects::ConnectionMode;
use std::sync::Arc;
use std::time::Duration;

fn ttl(secs: u64) -> CacheEntryConfig {
    CacheEntryConfig::new().with_ttl_secs(secs)
}

#[tokio::test]
async fn test_value_survives_outage_between_set_and_get() {
    let (store, remote, _) = remote_store(3);
    assert!(store.set("k", &"v", ttl(60)).await.unwrap());

    remote.go_offline();
    assert_eq!(store.get::<String>("k").await.as_deref(), Some("v"));
    assert_eq!(store.mode(), ConnectionMode::LocalFallback);
}

#[tokio::test]
async fn test_set_during_outage_is_readable() {
    let (store, remote, _) = remote_store(3);
    remote.go_offline();

    // Remote write failed, local write happened
    assert!(!store.set("k", &"v", ttl(60)).await.unwrap());
    assert_eq!(store.get::<String>("k").await.as_deref(), Some("v"));
}

#[tokio::test]
async fn test_fallback_is_sticky_after_remote_returns() {
    let (store, remote, _) = remote_store(3);
    remote.go_offline();
    store.get::<u8>("k").await;
    assert_eq!(store.mode(), ConnectionMode::LocalFallback);

    remote.go_online();
    let calls = remote.calls();
    store.set("k", &1u8, ttl(60)).await.unwrap();
    assert_eq!(store.get::<u8>("k").await, Some(1));

    assert_eq!(store.mode(), ConnectionMode::LocalFallback);
    assert_eq!(remote.calls(), calls, "fallback mode must not touch the remote");
}

#[tokio::test]
async fn test_concurrent_failures_transition_once() {
    let (store, remote, _) = remote_store(3);
    let store = Arc::new(store);
    remote.go_offline();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..16 {
        let store = Arc::clone(&store);
        tasks.spawn(async move { store.get::<u8>(&format!("k{i}")).await });
    }
    while let Some(result) = tasks.join_next().await {
        assert_eq!(result.unwrap(), None);
    }

    assert_eq!(store.stats().await.fallback_transitions, 1);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_remote_times_out_into_fallback() {
    let (store, remote, _) = remote_store(3);
    store.set("k", &"v", ttl(60)).await.unwrap();

    remote.stall();
    assert_eq!(store.get::<String>("k").await.as_deref(), Some("v"));
    assert_eq!(store.mode(), ConnectionMode::LocalFallback);
}

#[tokio::test(start_paused = true)]
async fn test_entries_expire_in_fallback_mode() {
    let (store, remote, _) = remote_store(3);
    remote.go_offline();
    store.set("k", &"v", ttl(5)).await.unwrap();

    tokio::time::advance(Duration::from_secs(6)).await;
    assert_eq!(store.get::<String>("k").await, None);
}

#[tokio::test]
async fn test_invalidations_during_outage_are_recorded() {
    let (store, remote, local) = remote_store(3);
    for key in ["p:1", "p:2", "q:1"] {
        store.set(key, &1u8, ttl(60)).await.unwrap();
    }
    remote.go_offline();

    assert!(!store.delete_by_prefix("p:").await);
    assert!(!store.delete("q:1").await);

    // Applied locally right away
    assert_eq!(local.size().await.unwrap(), 0);
    assert_eq!(store.pending_invalidations(), 2);
    assert_eq!(store.stats().await.pending_invalidations, 2);
}

#[tokio::test]
async fn test_stats_in_fallback_report_local_backend() {
    let (store, remote, _) = remote_store(3);
    remote.go_offline();
    store.get::<u8>("k").await;

    let stats = store.stats().await;
    assert_eq!(stats.mode, ConnectionMode::LocalFallback);
    assert_eq!(stats.backend, "memory");
    assert_eq!(stats.remote_entries, None);
}
