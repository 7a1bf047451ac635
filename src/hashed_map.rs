//! HashedMap: the same dictionary contract with a hash index over positions.
//!
//! This is an explicit alternative to `ScanMap`, not a drop-in swap: it
//! requires `K: Eq + Hash` (the hash must agree with equality) and changes
//! the lookup cost from a linear scan to O(1) average. Storage, insertion
//! order, errors and the growth/shrink policy are identical, so the two
//! report the same `capacity()` after the same sequence of operations.
//! Removal stays O(n): compaction shifts positions and the index is
//! rewritten for every shifted entry.

use crate::error::{DictError, Result};
use crate::storage::{resolve_index, EntryBuffer};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashTable;
use std::collections::hash_map::RandomState;

#[derive(Debug, Clone)]
struct Slot<K, V> {
    key: K,
    value: V,
    hash: u64,
}

pub struct HashedMap<K, V, S = RandomState> {
    hasher: S,
    // Maps hash -> position in `entries`.
    index: HashTable<usize>,
    entries: EntryBuffer<Slot<K, V>>,
}

impl<K, V> HashedMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K, V> Default for HashedMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> HashedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::new(),
            entries: EntryBuffer::new(),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    fn position<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let slots = self.entries.as_slice();
        self.index
            .find(hash, |&pos| slots[pos].key.borrow() == q)
            .copied()
    }

    /// Remove the slot at `pos` from both the index and the buffer, then
    /// shift every index entry that pointed past it.
    fn remove_at(&mut self, pos: usize) -> Slot<K, V> {
        let hash = self.entries.as_slice()[pos].hash;
        self.index
            .find_entry(hash, |&p| p == pos)
            .expect("every live position is indexed")
            .remove();
        let slot = self.entries.remove(pos);
        for p in self.index.iter_mut() {
            if *p > pos {
                *p -= 1;
            }
        }
        slot
    }

    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        if let Some(pos) = self.position(&key) {
            let slot = &mut self.entries.as_mut_slice()[pos];
            return Some(core::mem::replace(&mut slot.value, value));
        }
        self.append(key, value);
        None
    }

    fn append(&mut self, key: K, value: V) {
        let hash = self.make_hash(&key);
        let pos = self.entries.len();
        self.entries.push(Slot { key, value, hash });
        let slots = self.entries.as_slice();
        self.index.insert_unique(hash, pos, |&p| slots[p].hash);
    }

    pub fn get<Q>(&self, q: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.get_ref(q).cloned()
    }

    pub fn get_ref<Q>(&self, q: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.is_empty() {
            return Err(DictError::Empty);
        }
        let pos = self.position(q).ok_or(DictError::KeyNotFound)?;
        Ok(&self.entries.as_slice()[pos].value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.position(q).is_some()
    }

    pub fn pop<Q>(&mut self, q: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.is_empty() {
            return Err(DictError::Empty);
        }
        let pos = self.position(q).ok_or(DictError::KeyNotFound)?;
        Ok(self.remove_at(pos).value)
    }

    pub fn index<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.position(q)
    }

    pub fn popindex(&mut self, index: isize) -> Result<(K, V)> {
        let pos = resolve_index(index, self.len())?;
        let slot = self.remove_at(pos);
        Ok((slot.key, slot.value))
    }

    pub fn entry_at(&self, pos: usize) -> Option<(&K, &V)> {
        self.entries.as_slice().get(pos).map(|s| (&s.key, &s.value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.index.shrink_to_fit(|_| 0);
    }

    pub fn copy(&self) -> Self
    where
        K: Clone,
        V: Clone,
        S: Clone,
    {
        self.clone()
    }

    /// Merge `other` into `self` in `other`'s order; `other`'s values win.
    pub fn update<S2>(&mut self, other: &HashedMap<K, V, S2>)
    where
        K: Clone,
        V: Clone,
    {
        for slot in other.entries.as_slice() {
            match self.position(&slot.key) {
                Some(pos) => self.entries.as_mut_slice()[pos].value = slot.value.clone(),
                None => self.append(slot.key.clone(), slot.value.clone()),
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.entries.as_slice().iter().map(|s| (&s.key, &s.value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> + '_ {
        self.entries
            .as_mut_slice()
            .iter_mut()
            .map(|s| (&s.key, &mut s.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.as_slice().iter().map(|s| &s.key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.as_slice().iter().map(|s| &s.value)
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for HashedMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            index: self.index.clone(),
            entries: self.entries.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.as_slice().iter().map(|s| (&s.key, &s.value)))
            .finish()
    }
}

impl<K, V, S> Extend<(K, V)> for HashedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for HashedMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::new();
        m.extend(iter);
        m
    }
}

/// Owning iterator in position order.
pub struct IntoIter<K, V> {
    it: std::vec::IntoIter<Slot<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|s| (s.key, s.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V, S> IntoIterator for HashedMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            it: self.entries.into_vec().into_iter(),
        }
    }
}
