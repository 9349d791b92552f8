//! Connection mode state machine

use fcache_domain::value_objects::ConnectionMode;
use std::sync::atomic::{AtomicU8, AtomicU32, AtomicU64, Ordering};

const LOCAL_ONLY: u8 = 0;
const REMOTE_ACTIVE: u8 = 1;
const LOCAL_FALLBACK: u8 = 2;

fn encode(mode: ConnectionMode) -> u8 {
    match mode {
        ConnectionMode::LocalOnly => LOCAL_ONLY,
        ConnectionMode::RemoteActive => REMOTE_ACTIVE,
        ConnectionMode::LocalFallback => LOCAL_FALLBACK,
    }
}

fn decode(raw: u8) -> ConnectionMode {
    match raw {
        REMOTE_ACTIVE => ConnectionMode::RemoteActive,
        LOCAL_FALLBACK => ConnectionMode::LocalFallback,
        _ => ConnectionMode::LocalOnly,
    }
}

/// Lock-free connection mode
///
/// Transitions are compare-and-swap, so among any number of concurrent
/// callers observing the same failure exactly one performs the transition.
/// Callers log only when a transition method returns `true`.
#[derive(Debug)]
pub(crate) struct ModeState {
    current: AtomicU8,
    fallback_transitions: AtomicU64,
    probe_streak: AtomicU32,
}

impl ModeState {
    pub(crate) fn new(initial: ConnectionMode) -> Self {
        Self {
            current: AtomicU8::new(encode(initial)),
            fallback_transitions: AtomicU64::new(0),
            probe_streak: AtomicU32::new(0),
        }
    }

    pub(crate) fn get(&self) -> ConnectionMode {
        decode(self.current.load(Ordering::Acquire))
    }

    /// `RemoteActive → LocalFallback`; `true` only for the caller that switched
    pub(crate) fn enter_fallback(&self) -> bool {
        let switched = self
            .current
            .compare_exchange(
                REMOTE_ACTIVE,
                LOCAL_FALLBACK,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if switched {
            self.fallback_transitions.fetch_add(1, Ordering::Relaxed);
            self.probe_streak.store(0, Ordering::Relaxed);
        }
        switched
    }

    /// `LocalFallback → RemoteActive`; `true` only for the caller that switched
    pub(crate) fn restore_remote(&self) -> bool {
        let switched = self
            .current
            .compare_exchange(
                LOCAL_FALLBACK,
                REMOTE_ACTIVE,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if switched {
            self.probe_streak.store(0, Ordering::Relaxed);
        }
        switched
    }

    /// Count one successful probe and return the current streak
    pub(crate) fn record_probe_success(&self) -> u32 {
        self.probe_streak
            .fetch_add(1, Ordering::AcqRel)
            .saturating_add(1)
    }

    pub(crate) fn reset_probe_streak(&self) {
        self.probe_streak.store(0, Ordering::Relaxed);
    }

    pub(crate) fn fallback_transitions(&self) -> u64 {
        self.fallback_transitions.load(Ordering::Relaxed)
    }
}
