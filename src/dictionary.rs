//! Dictionary: thread-safe public container over `ScanMap`.

use crate::advisory::{AdvisoryGuard, AdvisoryLock};
use crate::equality::{DefaultEq, KeyEq};
use crate::error::Result;
use crate::reentrancy::{DebugReentrancy, ReentrancyGuard};
use crate::scan_map::ScanMap;
use core::fmt;
use core::ops::{Deref, DerefMut};
use parking_lot::{Mutex, MutexGuard};
use tracing::trace;

/// Array-backed dictionary shareable across threads.
///
/// Each data operation is atomic with respect to the others. For a sequence
/// of operations that must appear atomic (read-modify-write), cooperating
/// callers bracket it with [`protect`](Self::protect). The advisory lock and
/// the internal lock are independent, so operations made while protected
/// still go through the normal per-operation locking.
///
/// The equality predicate runs under the internal lock and must not call
/// back into the same dictionary.
pub struct Dictionary<K, V, E = DefaultEq> {
    map: Mutex<ScanMap<K, V, E>>,
    advisory: AdvisoryLock,
    reentrancy: DebugReentrancy,
}

// Field order matters: the reentrancy mark is cleared before the map unlocks.
struct Locked<'a, K, V, E> {
    _entered: ReentrancyGuard<'a>,
    map: MutexGuard<'a, ScanMap<K, V, E>>,
}

impl<K, V, E> Deref for Locked<'_, K, V, E> {
    type Target = ScanMap<K, V, E>;
    fn deref(&self) -> &Self::Target {
        &self.map
    }
}

impl<K, V, E> DerefMut for Locked<'_, K, V, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.map
    }
}

impl<K, V> Dictionary<K, V>
where
    K: PartialEq,
{
    pub fn new() -> Self {
        Self::with_eq(DefaultEq)
    }
}

impl<K, V> Default for Dictionary<K, V>
where
    K: PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, E> Dictionary<K, V, E>
where
    E: KeyEq<K>,
{
    /// Empty dictionary (capacity 1) using `eq` for every key comparison.
    pub fn with_eq(eq: E) -> Self {
        Self::from_map(ScanMap::with_eq(eq))
    }

    /// Wrap an existing map with fresh locks.
    pub fn from_map(map: ScanMap<K, V, E>) -> Self {
        Self {
            map: Mutex::new(map),
            advisory: AdvisoryLock::new(),
            reentrancy: DebugReentrancy::new(),
        }
    }

    fn lock(&self) -> Locked<'_, K, V, E> {
        self.reentrancy.check();
        let map = self.map.lock();
        Locked {
            _entered: self.reentrancy.enter(),
            map,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// See [`ScanMap::set`].
    pub fn set(&self, key: K, value: V) -> Option<V> {
        self.lock().set(key, value)
    }

    pub fn get(&self, key: &K) -> Result<V>
    where
        V: Clone,
    {
        self.lock().get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.lock().contains_key(key)
    }

    pub fn pop(&self, key: &K) -> Result<V> {
        self.lock().pop(key)
    }

    pub fn index(&self, key: &K) -> Option<usize> {
        self.lock().index(key)
    }

    pub fn popindex(&self, index: isize) -> Result<(K, V)> {
        self.lock().popindex(index)
    }

    pub fn clear(&self) {
        self.lock().clear()
    }

    /// Deep copy with its own buffer (same capacity) and its own, unheld locks.
    pub fn copy(&self) -> Self
    where
        K: Clone,
        V: Clone,
        E: Clone,
    {
        let map = self.lock().copy();
        trace!(len = map.len(), "dictionary copied");
        Self::from_map(map)
    }

    /// Merge `other` into `self`; `other`'s values win for shared keys.
    ///
    /// `other` is snapshotted before `self` is locked, so the two locks are
    /// never held together. Concurrent `a.update(&b)` and `b.update(&a)`
    /// cannot deadlock, and `a.update(&a)` leaves `a` unchanged.
    pub fn update<E2>(&self, other: &Dictionary<K, V, E2>)
    where
        K: Clone,
        V: Clone,
        E2: KeyEq<K>,
    {
        let incoming = other.snapshot();
        self.lock().update_from(incoming.iter().map(|(k, v)| (k, v)));
    }

    /// Copy of every entry in position order.
    pub fn snapshot(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Run `f` with shared access to the map under the internal lock.
    pub fn read<R>(&self, f: impl FnOnce(&ScanMap<K, V, E>) -> R) -> R {
        f(&self.lock())
    }

    /// Run `f` with exclusive access to the map under the internal lock.
    /// The whole closure is one atomic operation.
    pub fn write<R>(&self, f: impl FnOnce(&mut ScanMap<K, V, E>) -> R) -> R {
        f(&mut self.lock())
    }

    /// Acquire the advisory lock, blocking until it is free.
    ///
    /// The returned guard dereferences to the dictionary so the protected
    /// section can keep calling operations through it. Not reentrant.
    pub fn protect(&self) -> Protected<'_, K, V, E> {
        Protected {
            dict: self,
            _guard: self.advisory.acquire(),
        }
    }

    /// Whether some caller currently holds the advisory lock.
    pub fn is_protected(&self) -> bool {
        self.advisory.is_held()
    }

    /// Consume the dictionary and return its map.
    pub fn into_map(self) -> ScanMap<K, V, E> {
        self.map.into_inner()
    }

    /// Tear the dictionary down. Taking `self` by value means no borrow,
    /// including a [`Protected`] guard, can outlive this call.
    pub fn destroy(self) {
        let map = self.into_map();
        trace!(len = map.len(), capacity = map.capacity(), "dictionary destroyed");
        drop(map);
    }
}

/// Held advisory lock on a [`Dictionary`]. Released by [`release`](Self::release)
/// or on drop.
#[must_use = "the advisory lock is released as soon as the guard is dropped"]
pub struct Protected<'a, K, V, E = DefaultEq> {
    dict: &'a Dictionary<K, V, E>,
    _guard: AdvisoryGuard<'a>,
}

impl<K, V, E> Protected<'_, K, V, E> {
    pub fn release(self) {}
}

impl<K, V, E> Deref for Protected<'_, K, V, E> {
    type Target = Dictionary<K, V, E>;
    fn deref(&self) -> &Self::Target {
        self.dict
    }
}

impl<K, V, E> From<ScanMap<K, V, E>> for Dictionary<K, V, E>
where
    E: KeyEq<K>,
{
    fn from(map: ScanMap<K, V, E>) -> Self {
        Self::from_map(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Dictionary<K, V>
where
    K: PartialEq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(iter.into_iter().collect())
    }
}

impl<K: Clone, V: Clone, E: KeyEq<K> + Clone> Clone for Dictionary<K, V, E> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, E> fmt::Debug for Dictionary<K, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // try_lock: formatting must not deadlock inside read/write closures.
        match self.map.try_lock() {
            Some(map) => f.debug_tuple("Dictionary").field(&*map).finish(),
            None => f.write_str("Dictionary(<locked>)"),
        }
    }
}
