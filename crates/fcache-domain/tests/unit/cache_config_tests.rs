//! Tests for cache entry configuration and provider statistics

use fcache_domain::constants::DEFAULT_CACHE_TTL_SECS;
use fcache_domain::ports::providers::{CacheEntryConfig, CacheStats};
use std::time::Duration;

#[test]
fn test_default_config_defers_ttl() {
    let config = CacheEntryConfig::default();
    assert_eq!(config.ttl, None);
    assert_eq!(
        config.effective_ttl(),
        Duration::from_secs(DEFAULT_CACHE_TTL_SECS)
    );
}

#[test]
fn test_or_default_ttl_keeps_explicit_value() {
    let explicit = CacheEntryConfig::new().with_ttl_secs(10);
    let resolved = explicit.or_default_ttl(Duration::from_secs(60));
    assert_eq!(resolved.ttl, Some(Duration::from_secs(10)));

    let deferred = CacheEntryConfig::new().or_default_ttl(Duration::from_secs(60));
    assert_eq!(deferred.ttl, Some(Duration::from_secs(60)));
}

#[test]
fn test_zero_ttl_is_rejected() {
    let config = CacheEntryConfig::new().with_ttl(Duration::ZERO);
    let err = config.validate().unwrap_err();
    assert!(err.is_invalid_argument());

    assert!(CacheEntryConfig::new().validate().is_ok());
    assert!(CacheEntryConfig::new().with_ttl_secs(1).validate().is_ok());
}

#[test]
fn test_hit_rate() {
    let stats = CacheStats {
        hits: 3,
        misses: 1,
        ..CacheStats::default()
    };
    assert!((stats.calculate_hit_rate() - 0.75).abs() < f64::EPSILON);
    assert!(CacheStats::new().calculate_hit_rate().abs() < f64::EPSILON);
}
