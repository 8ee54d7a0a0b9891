//! Exclusion for the initialisation/recovery engine.
//!
//! A replay requested while another is running gets [`Error::Busy`]
//! straight away. It is neither queued nor silently dropped.
//!
//! [`Error::Busy`]: crate::Error::Busy

use core::sync::atomic::{AtomicBool, Ordering};

/// A non-counting lock around the register replay.
#[derive(Debug, Default)]
pub struct InitLock {
    held: AtomicBool,
}

impl InitLock {
    /// Create an unlocked lock.
    pub const fn new() -> InitLock {
        InitLock {
            held: AtomicBool::new(false),
        }
    }

    /// Take the lock. Returns `false` if a replay is already running.
    pub fn try_acquire(&self) -> bool {
        self.held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Give the lock back.
    pub fn release(&self) {
        self.held.store(false, Ordering::Release);
    }

    /// Whether a replay is running.
    pub fn is_locked(&self) -> bool {
        self.held.load(Ordering::Relaxed)
    }
}
