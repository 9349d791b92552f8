//! Invalidations recorded while the remote is unreachable
//!
//! Writes and deletes made in fallback mode never reach Redis. Unless they are
//! replayed before the store switches back, Redis would keep serving values
//! this process already replaced or removed.
//!
//! Per-key entries and identical prefixes replace their earlier occurrence, so
//! the log grows with the number of distinct keys touched, not with traffic.

use crate::constants::CACHE_PENDING_INVALIDATIONS_LIMIT;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// One remote-side effect owed to the remote backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingInvalidation {
    /// Copy the current local value to the remote, or delete it there if gone
    Rewrite {
        /// Qualified key
        key: String,
        /// Absolute deadline of the local write; `None` if it overflowed the clock
        expires_at: Option<Instant>,
        /// TTL the value was written with, used when there is no deadline
        ttl: Duration,
    },
    /// Delete one qualified key
    Delete(String),
    /// Delete every key under a qualified prefix
    DeletePrefix(String),
    /// Owner-scoped clear, only ever recorded by an explicit `clear`
    Clear,
}

impl PendingInvalidation {
    /// Rewrite entry for a value written now with `ttl`
    pub fn rewrite(key: impl Into<String>, ttl: Duration) -> Self {
        Self::Rewrite {
            key: key.into(),
            expires_at: Instant::now().checked_add(ttl),
            ttl,
        }
    }

    /// TTL still owed to a rewrite at `now`; zero once the deadline passed
    pub fn remaining_ttl(&self, now: Instant) -> Option<Duration> {
        match self {
            Self::Rewrite {
                expires_at: Some(deadline),
                ..
            } => Some(deadline.saturating_duration_since(now)),
            Self::Rewrite {
                expires_at: None,
                ttl,
                ..
            } => Some(*ttl),
            _ => None,
        }
    }

    fn key(&self) -> Option<&str> {
        match self {
            Self::Rewrite { key, .. } | Self::Delete(key) => Some(key),
            _ => None,
        }
    }

    /// Whether replaying `self` makes an earlier `other` redundant
    fn supersedes(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::DeletePrefix(a), Self::DeletePrefix(b)) => a == b,
            _ => self.key().is_some() && self.key() == other.key(),
        }
    }
}

#[derive(Debug, Default)]
struct Log {
    ops: Vec<PendingInvalidation>,
    /// Entries were dropped and no scoped clear can stand in for them
    overflowed: bool,
}

/// Ordered replay log
#[derive(Debug)]
pub(crate) struct PendingInvalidations {
    log: Mutex<Log>,
    limit: usize,
    /// Whether a `Clear` is owner-scoped and may replace an overflowing log
    scoped_clear: bool,
}

impl Default for PendingInvalidations {
    fn default() -> Self {
        Self::new(CACHE_PENDING_INVALIDATIONS_LIMIT, false)
    }
}

impl PendingInvalidations {
    pub(crate) fn new(limit: usize, scoped_clear: bool) -> Self {
        Self {
            log: Mutex::new(Log::default()),
            limit: limit.max(1),
            scoped_clear,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Log> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an invalidation
    ///
    /// A clear supersedes everything before it. Past the limit, a log whose
    /// clear is owner-scoped collapses into a clear; otherwise it is marked
    /// overflowed and the store refuses to leave fallback until an explicit
    /// `clear`.
    pub(crate) fn record(&self, op: PendingInvalidation) {
        Self::push(&mut self.lock(), op, self.limit, self.scoped_clear);
    }

    /// Record `op` only if `still_pending` holds, checked under the log lock
    ///
    /// Recovery switches modes under the same lock, so a `false` here means
    /// the remote is active again and the caller must write it directly.
    pub(crate) fn record_if(
        &self,
        op: PendingInvalidation,
        still_pending: impl FnOnce() -> bool,
    ) -> bool {
        let mut log = self.lock();
        if !still_pending() {
            return false;
        }
        Self::push(&mut log, op, self.limit, self.scoped_clear);
        true
    }

    fn push(log: &mut Log, op: PendingInvalidation, limit: usize, scoped_clear: bool) {
        if op == PendingInvalidation::Clear {
            log.ops.clear();
            log.overflowed = false;
            log.ops.push(op);
            return;
        }
        if log.overflowed {
            return;
        }

        log.ops.retain(|existing| !op.supersedes(existing));
        if log.ops.len() >= limit {
            if scoped_clear {
                tracing::warn!(
                    limit,
                    "too many pending cache invalidations, collapsing into a clear"
                );
                log.ops.clear();
                log.ops.push(PendingInvalidation::Clear);
            } else {
                tracing::warn!(
                    limit,
                    "too many pending cache invalidations; remote stays out of use until the cache is cleared"
                );
                log.ops.clear();
                log.overflowed = true;
                return;
            }
        }
        log.ops.push(op);
    }

    /// Drain the log for replay
    pub(crate) fn take(&self) -> Vec<PendingInvalidation> {
        std::mem::take(&mut self.lock().ops)
    }

    /// Put back operations whose replay did not complete, ahead of newer ones
    pub(crate) fn restore_front(&self, unreplayed: Vec<PendingInvalidation>) {
        let mut log = self.lock();
        let newer = std::mem::take(&mut log.ops);
        let mut merged = unreplayed;
        merged.retain(|old| !newer.iter().any(|new| new.supersedes(old)));
        merged.extend(newer);
        log.ops = merged;
    }

    /// Run `f` while holding the lock, if nothing is owed to the remote
    pub(crate) fn when_empty<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        let log = self.lock();
        (log.ops.is_empty() && !log.overflowed).then(f)
    }

    /// Whether invalidations were lost and only a clear can resync the remote
    pub(crate) fn is_overflowed(&self) -> bool {
        self.lock().overflowed
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().ops.len()
    }
}
