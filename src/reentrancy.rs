//! Debug-only reentrancy guard.
//!
//! `Dictionary` runs the caller's equality predicate (and `read`/`write`
//! closures) while holding its internal lock. If that code calls back into
//! the same dictionary on the same thread, the non-reentrant lock would
//! deadlock. In debug builds the guard turns that into a panic with a clear
//! message; other threads are unaffected and simply wait for the lock. In
//! release builds this compiles to a no-op.

#[cfg(not(debug_assertions))]
use core::marker::PhantomData;
#[cfg(debug_assertions)]
use core::sync::atomic::{AtomicUsize, Ordering};

/// Per-instance owner tracker. Call `check()` before blocking on the lock
/// and `enter()` once it is held.
#[derive(Debug)]
pub(crate) struct DebugReentrancy {
    // Tag of the thread currently inside, or 0.
    #[cfg(debug_assertions)]
    owner: AtomicUsize,
}

#[cfg(debug_assertions)]
fn thread_tag() -> usize {
    thread_local! {
        static TAG: u8 = const { 0 };
    }
    TAG.with(|t| t as *const u8 as usize)
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            owner: AtomicUsize::new(0),
        }
    }

    /// Panics in debug builds if the current thread is already inside.
    #[inline]
    pub(crate) fn check(&self) {
        #[cfg(debug_assertions)]
        {
            assert!(
                self.owner.load(Ordering::Relaxed) != thread_tag(),
                "reentrancy detected: dictionary used from inside its own predicate or closure"
            );
        }
    }

    /// Mark the current thread as inside. Only call while holding the lock.
    #[inline]
    pub(crate) fn enter(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            self.owner.store(thread_tag(), Ordering::Relaxed);
            return ReentrancyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return ReentrancyGuard { _z: PhantomData };
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by `DebugReentrancy::enter`.
pub(crate) struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            self.owner.owner.store(0, Ordering::Relaxed);
        }
    }
}
