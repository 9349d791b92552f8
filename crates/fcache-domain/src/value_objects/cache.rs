//! Cache store value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which backend the cache store is currently serving from
///
/// `RemoteActive → LocalFallback` happens on the first remote failure and is
/// sticky; only the periodic health probe moves the store back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionMode {
    /// No remote backend configured; the in-process store is authoritative
    LocalOnly,
    /// Remote backend healthy and serving reads
    RemoteActive,
    /// Remote backend failed; reads and writes go to the in-process store
    LocalFallback,
}

impl ConnectionMode {
    /// Stable identifier used in logs and stats
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocalOnly => "local_only",
            Self::RemoteActive => "remote_active",
            Self::LocalFallback => "local_fallback",
        }
    }

    /// Whether reads are served by the remote backend
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteActive)
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational statistics exposed on maintenance endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStoreStats {
    /// Name of the backend currently serving reads
    pub backend: String,
    /// Current connection mode
    pub mode: ConnectionMode,
    /// Owner namespace applied to every key, if any
    pub namespace: Option<String>,
    /// Entries held by the in-process store
    pub local_entries: u64,
    /// Live entries in the in-process store
    pub active_entries: u64,
    /// Expired entries not yet reclaimed from the in-process store
    pub expired_entries: u64,
    /// Entries reported by the remote backend, when reachable
    pub remote_entries: Option<u64>,
    /// Reads answered with a value
    pub hits: u64,
    /// Reads answered with nothing
    pub misses: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
    /// Number of times the store entered fallback mode
    pub fallback_transitions: u64,
    /// Invalidations waiting to be replayed on the remote backend
    pub pending_invalidations: usize,
}
