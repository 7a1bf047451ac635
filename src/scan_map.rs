//! ScanMap: unsynchronised array-backed dictionary with linear-scan lookup.

use crate::equality::{DefaultEq, KeyEq};
use crate::error::{DictError, Result};
use crate::storage::{resolve_index, EntryBuffer};
use core::fmt;

/// Entries live contiguously in insertion order; every lookup walks them
/// with the map's equality predicate. Removal compacts the tail, so
/// positions shift after `pop`/`popindex`.
pub struct ScanMap<K, V, E = DefaultEq> {
    entries: EntryBuffer<(K, V)>,
    eq: E,
}

impl<K, V> ScanMap<K, V>
where
    K: PartialEq,
{
    pub fn new() -> Self {
        Self::with_eq(DefaultEq)
    }
}

impl<K, V> Default for ScanMap<K, V>
where
    K: PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over entries in position order.
pub struct Iter<'a, K, V> {
    it: core::slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(k, v)| (k, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over entries with mutable values. Keys stay immutable.
pub struct IterMut<'a, K, V> {
    it: core::slice::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(k, v)| (&*k, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V, E> ScanMap<K, V, E>
where
    E: KeyEq<K>,
{
    /// Empty map (capacity 1) comparing keys with `eq` for its whole life.
    pub fn with_eq(eq: E) -> Self {
        Self {
            entries: EntryBuffer::new(),
            eq,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    /// Logical slot count as decided by the growth policy.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub fn key_eq(&self) -> &E {
        &self.eq
    }

    fn position(&self, key: &K) -> Option<usize> {
        self.entries
            .as_slice()
            .iter()
            .position(|(k, _)| self.eq.key_eq(k, key))
    }

    /// Overwrite the value of a matching key in place, or append a new entry.
    /// Returns the previous value when the key was already present.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        match self.position(&key) {
            Some(pos) => Some(core::mem::replace(
                &mut self.entries.as_mut_slice()[pos].1,
                value,
            )),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Copy of the value stored under `key`.
    pub fn get(&self, key: &K) -> Result<V>
    where
        V: Clone,
    {
        self.get_ref(key).cloned()
    }

    pub fn get_ref(&self, key: &K) -> Result<&V> {
        if self.is_empty() {
            return Err(DictError::Empty);
        }
        let pos = self.position(key).ok_or(DictError::KeyNotFound)?;
        Ok(&self.entries.as_slice()[pos].1)
    }

    pub fn get_mut(&mut self, key: &K) -> Result<&mut V> {
        if self.is_empty() {
            return Err(DictError::Empty);
        }
        let pos = self.position(key).ok_or(DictError::KeyNotFound)?;
        Ok(&mut self.entries.as_mut_slice()[pos].1)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    /// Remove the entry for `key` and return its value.
    pub fn pop(&mut self, key: &K) -> Result<V> {
        if self.is_empty() {
            return Err(DictError::Empty);
        }
        let pos = self.position(key).ok_or(DictError::KeyNotFound)?;
        Ok(self.entries.remove(pos).1)
    }

    /// Position of the first entry matching `key`; `None` when absent,
    /// including on an empty map.
    pub fn index(&self, key: &K) -> Option<usize> {
        self.position(key)
    }

    /// Remove and return the entry at `index`. Negative indices count from
    /// the end, so `-1` is the most recently appended live entry.
    pub fn popindex(&mut self, index: isize) -> Result<(K, V)> {
        let pos = resolve_index(index, self.len())?;
        Ok(self.entries.remove(pos))
    }

    /// Entry at `pos` without removing it.
    pub fn entry_at(&self, pos: usize) -> Option<(&K, &V)> {
        self.entries.as_slice().get(pos).map(|(k, v)| (k, v))
    }

    /// Drop every entry and return to a single-slot buffer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Independent deep copy with the same capacity and predicate.
    pub fn copy(&self) -> Self
    where
        K: Clone,
        V: Clone,
        E: Clone,
    {
        self.clone()
    }

    /// Merge `other` into `self`, entry by entry in `other`'s order.
    ///
    /// Keys are matched with `self`'s predicate. Shared keys take `other`'s
    /// value in place; new keys are appended, growing as needed per key.
    pub fn update<E2>(&mut self, other: &ScanMap<K, V, E2>)
    where
        K: Clone,
        V: Clone,
        E2: KeyEq<K>,
    {
        self.update_from(other.iter());
    }

    pub(crate) fn update_from<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (&'a K, &'a V)>,
        K: Clone + 'a,
        V: Clone + 'a,
    {
        for (k, v) in entries {
            match self.position(k) {
                Some(pos) => self.entries.as_mut_slice()[pos].1 = v.clone(),
                None => self.entries.push((k.clone(), v.clone())),
            }
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.entries.as_slice().iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.entries.as_mut_slice().iter_mut(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.as_slice().iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.as_slice().iter().map(|(_, v)| v)
    }
}

impl<K: Clone, V: Clone, E: Clone> Clone for ScanMap<K, V, E> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            eq: self.eq.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, E> fmt::Debug for ScanMap<K, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.as_slice().iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K, V, E> Extend<(K, V)> for ScanMap<K, V, E>
where
    E: KeyEq<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ScanMap<K, V>
where
    K: PartialEq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::new();
        m.extend(iter);
        m
    }
}

impl<K, V, E> IntoIterator for ScanMap<K, V, E> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_vec().into_iter()
    }
}

impl<'a, K, V, E> IntoIterator for &'a ScanMap<K, V, E>
where
    E: KeyEq<K>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn entries<K: Clone, V: Clone, E: KeyEq<K>>(m: &ScanMap<K, V, E>) -> Vec<(K, V)> {
        m.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Fresh map: no entries, one slot, and every lookup-style failure is
    /// reported as `Empty` rather than `KeyNotFound`.
    #[test]
    fn construct_is_empty_with_one_slot() {
        let mut m: ScanMap<i32, &str> = ScanMap::new();
        assert_eq!(m.len(), 0);
        assert_eq!(m.capacity(), 1);
        assert!(m.is_empty());
        assert_eq!(m.get(&1), Err(DictError::Empty));
        assert_eq!(m.pop(&1), Err(DictError::Empty));
        assert_eq!(m.popindex(0), Err(DictError::Empty));
        assert_eq!(m.popindex(-1), Err(DictError::Empty));
        assert_eq!(m.index(&1), None);
    }

    #[test]
    fn set_overwrites_in_place() {
        let mut m = ScanMap::with_eq(|a: &i32, b: &i32| a == b);
        assert_eq!(m.set(1, "a"), None);
        assert_eq!(m.set(1, "b"), Some("a"));
        assert_eq!(m.get(&1), Ok("b"));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn set_new_key_appends() {
        let mut m: ScanMap<i32, i32> = ScanMap::new();
        for k in 0..10 {
            let before = m.len();
            m.set(k, k * 10);
            assert_eq!(m.len(), before + 1);
            assert_eq!(m.get(&k), Ok(k * 10));
            assert!(m.len() <= m.capacity());
        }
        assert_eq!(
            m.keys().copied().collect::<Vec<_>>(),
            (0..10).collect::<Vec<_>>()
        );
    }

    #[test]
    fn get_missing_key_on_non_empty() {
        let mut m: ScanMap<i32, i32> = ScanMap::new();
        m.set(1, 1);
        assert_eq!(m.get(&2), Err(DictError::KeyNotFound));
        assert_eq!(m.pop(&2), Err(DictError::KeyNotFound));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn pop_removes_and_compacts() {
        let mut m: ScanMap<i32, &str> = ScanMap::new();
        m.set(1, "a");
        m.set(2, "b");
        assert_eq!(m.pop(&1), Ok("a"));
        assert_eq!(m.len(), 1);
        assert_eq!(m.index(&1), None);
        assert_eq!(m.index(&2), Some(0));
    }

    #[test]
    fn popindex_negative_and_positive() {
        let mut m: ScanMap<i32, &str> = ScanMap::new();
        m.set(1, "a");
        m.set(2, "b");
        assert_eq!(m.popindex(-1), Ok((2, "b")));
        assert_eq!(entries(&m), vec![(1, "a")]);

        m.set(3, "c");
        m.set(4, "d");
        assert_eq!(
            m.popindex(3),
            Err(DictError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            m.popindex(-4),
            Err(DictError::IndexOutOfRange { index: -4, len: 3 })
        );
        assert_eq!(m.popindex(1), Ok((3, "c")));
        assert_eq!(entries(&m), vec![(1, "a"), (4, "d")]);
    }

    #[test]
    fn popindex_minus_one_matches_last() {
        let build = || {
            let mut m: ScanMap<u8, u8> = ScanMap::new();
            for k in 0..7 {
                m.set(k, k + 100);
            }
            m
        };
        let mut a = build();
        let mut b = build();
        let n = a.len() as isize;
        assert_eq!(a.popindex(-1), b.popindex(n - 1));
        assert_eq!(entries(&a), entries(&b));
        assert_eq!(a.capacity(), b.capacity());
    }

    #[test]
    fn clear_resets_and_is_idempotent() {
        let mut m: ScanMap<i32, i32> = (0..20).map(|k| (k, k)).collect();
        assert!(m.capacity() > 1);
        m.clear();
        assert_eq!((m.len(), m.capacity()), (0, 1));
        m.clear();
        assert_eq!((m.len(), m.capacity()), (0, 1));
        m.set(5, 5);
        assert_eq!(m.get(&5), Ok(5));
    }

    #[test]
    fn copy_is_independent() {
        let mut a: ScanMap<i32, String> = ScanMap::new();
        a.set(1, "one".to_string());
        a.set(2, "two".to_string());
        a.set(3, "three".to_string());

        let mut b = a.copy();
        assert_eq!(b.capacity(), a.capacity());
        assert_eq!(entries(&b), entries(&a));

        b.pop(&2).unwrap();
        b.set(1, "uno".to_string());
        b.set(9, "nine".to_string());

        assert_eq!(a.len(), 3);
        assert_eq!(a.get(&1).unwrap(), "one");
        assert_eq!(a.get(&2).unwrap(), "two");
        assert!(!a.contains_key(&9));
    }

    #[test]
    fn update_merges_with_other_winning() {
        let mut a: ScanMap<i32, &str> = ScanMap::new();
        a.set(1, "a");
        a.set(2, "b");
        let mut b: ScanMap<i32, &str> = ScanMap::new();
        b.set(2, "x");
        b.set(3, "y");

        a.update(&b);
        assert_eq!(entries(&a), vec![(1, "a"), (2, "x"), (3, "y")]);
        // other is untouched
        assert_eq!(entries(&b), vec![(2, "x"), (3, "y")]);
    }

    /// Growth may fire several times inside a single update.
    #[test]
    fn update_grows_incrementally() {
        let mut a: ScanMap<u32, u32> = ScanMap::new();
        let b: ScanMap<u32, u32> = (0..14).map(|k| (k, k)).collect();
        a.update(&b);
        assert_eq!(a.len(), 14);
        assert_eq!(a.capacity(), 16);
        assert_eq!(a.capacity(), b.capacity());
    }

    /// The map's own predicate decides matches, including during update
    /// where the other map uses a different predicate.
    #[test]
    fn custom_predicate_drives_all_lookups() {
        let ci = |a: &String, b: &String| a.eq_ignore_ascii_case(b);
        let mut m = ScanMap::with_eq(ci);
        m.set("Alpha".to_string(), 1);
        m.set("ALPHA".to_string(), 2);
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(&"alpha".to_string()), Ok(2));
        assert_eq!(m.index(&"aLpHa".to_string()), Some(0));

        let mut other: ScanMap<String, i32> = ScanMap::new();
        other.set("alpha".to_string(), 3);
        other.set("beta".to_string(), 4);
        m.update(&other);
        assert_eq!(m.len(), 2);
        // Stored key keeps its original spelling; only the value changes.
        assert_eq!(m.entry_at(0), Some((&"Alpha".to_string(), &3)));
        assert_eq!(m.pop(&"BETA".to_string()), Ok(4));
    }

    #[test]
    fn zero_is_equal_comparator() {
        use crate::equality::ZeroIsEqual;
        let mut m = ScanMap::with_eq(ZeroIsEqual(|a: &i32, b: &i32| a - b));
        m.set(7, "a");
        m.set(7, "b");
        m.set(-7, "c");
        assert_eq!(m.len(), 2);
        assert_eq!(m.get(&7), Ok("b"));
        assert_eq!(m.index(&-7), Some(1));
    }

    /// Lookup stops at the first match and never calls the predicate on
    /// entries past it.
    #[test]
    fn scan_stops_at_first_match() {
        let calls = Cell::new(0);
        let eq = |a: &u32, b: &u32| {
            calls.set(calls.get() + 1);
            a == b
        };
        let mut m = ScanMap::with_eq(eq);
        for k in 0..5 {
            m.set(k, ());
        }
        calls.set(0);
        assert_eq!(m.index(&1), Some(1));
        assert_eq!(calls.get(), 2);

        calls.set(0);
        assert_eq!(m.index(&42), None);
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn get_mut_and_iter_mut_update_values() {
        let mut m: ScanMap<&str, i32> = ScanMap::new();
        m.set("a", 1);
        m.set("b", 2);
        *m.get_mut(&"a").unwrap() += 10;
        for (_k, v) in m.iter_mut() {
            *v *= 2;
        }
        assert_eq!(m.get(&"a"), Ok(22));
        assert_eq!(m.get(&"b"), Ok(4));
        assert_eq!(m.values().sum::<i32>(), 26);
        assert_eq!(m.get_mut(&"z"), Err(DictError::KeyNotFound));
    }

    #[test]
    fn into_iter_yields_insertion_order() {
        let m: ScanMap<i32, char> = [(3, 'c'), (1, 'a'), (2, 'b'), (1, 'z')]
            .into_iter()
            .collect();
        let borrowed: Vec<_> = (&m).into_iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(borrowed, vec![(3, 'c'), (1, 'z'), (2, 'b')]);
        assert_eq!(m.iter().len(), 3);
        let owned: Vec<_> = m.into_iter().collect();
        assert_eq!(owned, vec![(3, 'c'), (1, 'z'), (2, 'b')]);
    }

    #[test]
    fn debug_formats_as_map() {
        let mut m: ScanMap<i32, &str> = ScanMap::new();
        m.set(1, "a");
        m.set(2, "b");
        assert_eq!(format!("{:?}", m), r#"{1: "a", 2: "b"}"#);
    }
}
