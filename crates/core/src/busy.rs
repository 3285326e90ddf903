//! Single in-flight mutation guard.
//!
//! At most one mutating ledger operation runs at a time. Callers that find
//! the flag set are turned away instead of queued.

use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide "an operation is running" flag.
#[derive(Debug, Default)]
pub struct BusyFlag {
    busy: AtomicBool,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag if it is clear. Returns `None` when another holder exists.
    ///
    /// The flag is cleared when the returned guard drops, including during a
    /// panic unwind.
    pub fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard { flag: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Holds the busy flag until dropped.
#[derive(Debug)]
pub struct BusyGuard<'a> {
    flag: &'a BusyFlag,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.busy.store(false, Ordering::Release);
    }
}
