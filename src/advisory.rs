//! Advisory lock: caller-driven mutual exclusion for multi-step sections.
//!
//! No data operation acquires this lock. It exists so cooperating callers can
//! bracket a sequence (read, compute, write) as one critical section. Acquire
//! blocks without timeout; there is intentionally no try variant. The lock is
//! not reentrant: acquiring it twice on one thread deadlocks.

use parking_lot::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub(crate) struct AdvisoryLock {
    inner: Mutex<()>,
}

impl AdvisoryLock {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(()),
        }
    }

    #[inline]
    pub(crate) fn acquire(&self) -> AdvisoryGuard<'_> {
        AdvisoryGuard {
            _held: self.inner.lock(),
        }
    }

    #[inline]
    pub(crate) fn is_held(&self) -> bool {
        self.inner.is_locked()
    }
}

/// Holding this value holds the lock; dropping it releases.
#[must_use = "the advisory lock is released as soon as the guard is dropped"]
pub(crate) struct AdvisoryGuard<'a> {
    _held: MutexGuard<'a, ()>,
}
