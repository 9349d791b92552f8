//! Cache store behavior with a healthy backend

use crate::test_utils::{SwitchableRemote, remote_store};
use fcache_domain::ports::infrastructure::{CacheStoreExt, CacheStoreInterface};
use fcache_domain::ports::providers::{CacheEntryConfig, CacheProvider};
use fcache_domain::value_objects::ConnectionMode;
use fcache_infrastructure::cache::CacheStore;
use fcache_providers::cache::MemoryCacheProvider;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn ttl(secs: u64) -> CacheEntryConfig {
    CacheEntryConfig::new().with_ttl_secs(secs)
}

#[tokio::test]
async fn test_set_then_get_through_remote() {
    let (store, remote, local) = remote_store(3);
    assert!(store.set("k", &json!({"a": 1}), ttl(60)).await.unwrap());

    assert_eq!(store.get_value("k").await, Some(json!({"a": 1})));
    assert_eq!(store.mode(), ConnectionMode::RemoteActive);
    // Written through to both backends
    assert!(remote.backing().exists("k").await.unwrap());
    assert!(local.exists("k").await.unwrap());
}

#[tokio::test]
async fn test_zero_ttl_is_rejected_not_coerced() {
    let (store, remote, _) = remote_store(3);
    let err = store
        .set("k", &1u8, CacheEntryConfig::new().with_ttl(Duration::ZERO))
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(!remote.backing().exists("k").await.unwrap());
}

#[tokio::test]
async fn test_absent_ttl_uses_configured_default() {
    let local = MemoryCacheProvider::new();
    let store = CacheStore::local_only(Arc::new(local.clone()))
        .with_default_ttl(Duration::from_secs(2));
    tokio::time::pause();

    store.set("k", &1u8, CacheEntryConfig::new()).await.unwrap();
    tokio::time::advance(Duration::from_secs(3)).await;
    assert_eq!(store.get::<u8>("k").await, None);
}

#[tokio::test(start_paused = true)]
async fn test_entries_expire_in_remote_mode() {
    let (store, _, _) = remote_store(3);
    store.set("k", &"v", ttl(5)).await.unwrap();

    tokio::time::advance(Duration::from_secs(6)).await;
    assert_eq!(store.get::<String>("k").await, None);
    assert!(!store.exists("k").await);
}

#[tokio::test(start_paused = true)]
async fn test_entries_expire_in_local_mode() {
    let store = CacheStore::local_only(Arc::new(MemoryCacheProvider::new()));
    store.set("k", &"v", ttl(5)).await.unwrap();

    tokio::time::advance(Duration::from_secs(4)).await;
    assert_eq!(store.get::<String>("k").await.as_deref(), Some("v"));
    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(store.get::<String>("k").await, None);
}

#[tokio::test]
async fn test_delete_by_prefix_leaves_other_keys() {
    let (store, _, _) = remote_store(3);
    for key in ["p:1", "p:2", "q:1"] {
        store.set(key, &key, ttl(60)).await.unwrap();
    }

    assert!(store.delete_by_prefix("p:").await);
    assert!(!store.exists("p:1").await);
    assert!(!store.exists("p:2").await);
    assert_eq!(store.get::<String>("q:1").await.as_deref(), Some("q:1"));
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (store, _, _) = remote_store(3);
    store.set("k", &1u8, ttl(60)).await.unwrap();

    assert!(store.delete("k").await);
    assert!(store.delete("k").await);
    assert!(store.delete("never-set").await);
    assert_eq!(store.get::<u8>("k").await, None);
}

#[tokio::test]
async fn test_clear_is_scoped_to_namespace() {
    let remote = SwitchableRemote::new();
    // Another process's key on the shared server
    remote
        .backing()
        .set_json("other:k", "1", ttl(60))
        .await
        .unwrap();

    let store = CacheStore::with_remote(
        Arc::new(remote.clone()),
        Arc::new(MemoryCacheProvider::new()),
    )
    .with_namespace("mine");
    store.set("k", &1u8, ttl(60)).await.unwrap();
    assert!(remote.backing().exists("mine:k").await.unwrap());

    assert!(store.clear().await);
    assert!(!remote.backing().exists("mine:k").await.unwrap());
    assert!(remote.backing().exists("other:k").await.unwrap());
    assert_eq!(store.get::<u8>("k").await, None);
}

#[tokio::test]
async fn test_clear_without_namespace_flushes_everything() {
    let (store, remote, local) = remote_store(3);
    store.set("a", &1u8, ttl(60)).await.unwrap();
    store.set("b", &2u8, ttl(60)).await.unwrap();

    assert!(store.clear().await);
    assert_eq!(remote.backing().size().await.unwrap(), 0);
    assert_eq!(local.size().await.unwrap(), 0);
}

#[tokio::test]
async fn test_ping_reports_without_changing_mode() {
    let (store, remote, _) = remote_store(3);
    assert!(store.ping().await);

    remote.go_offline();
    assert!(!store.ping().await);
    assert_eq!(store.mode(), ConnectionMode::RemoteActive);
}

#[tokio::test]
async fn test_stats_reflect_reads_and_backend() {
    let (store, _, _) = remote_store(3);
    store.set("k", &1u8, ttl(60)).await.unwrap();
    store.get::<u8>("k").await;
    store.get::<u8>("missing").await;

    let stats = store.stats().await;
    assert_eq!(stats.backend, "switchable");
    assert_eq!(stats.mode, ConnectionMode::RemoteActive);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.local_entries, 1);
    assert_eq!(stats.remote_entries, Some(1));
    assert_eq!(stats.fallback_transitions, 0);
}

#[tokio::test]
async fn test_store_usable_as_trait_object() {
    let store: Arc<dyn CacheStoreInterface> =
        Arc::new(CacheStore::local_only(Arc::new(MemoryCacheProvider::new())));
    store.set("k", &vec![1, 2, 3], ttl(60)).await.unwrap();
    assert_eq!(store.get::<Vec<i32>>("k").await, Some(vec![1, 2, 3]));
}
