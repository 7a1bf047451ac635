#![cfg(test)]

// Property tests for ScanMap and HashedMap kept inside the crate so they can
// see the growth helpers and compare capacities exactly.

use crate::error::DictError;
use crate::growth;
use crate::hashed_map::HashedMap;
use crate::scan_map::ScanMap;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Set(u8, i32),
    Get(u8),
    Pop(u8),
    Index(u8),
    PopIndex(isize),
    Clear,
    Update(Vec<(u8, i32)>),
    CopyThenMutate(u8),
}

// Small key space so sets overwrite and pops hit often.
fn arb_key() -> impl Strategy<Value = u8> {
    0u8..12
}

prop_compose! {
    fn arb_ops()(ops in proptest::collection::vec(
        prop_oneof![
            4 => (arb_key(), any::<i32>()).prop_map(|(k, v)| Op::Set(k, v)),
            1 => arb_key().prop_map(Op::Get),
            2 => arb_key().prop_map(Op::Pop),
            1 => arb_key().prop_map(Op::Index),
            2 => (-14isize..14).prop_map(Op::PopIndex),
            1 => Just(Op::Clear),
            1 => proptest::collection::vec((arb_key(), any::<i32>()), 0..8).prop_map(Op::Update),
            1 => arb_key().prop_map(Op::CopyThenMutate),
        ], 1..120)) -> Vec<Op> { ops }
}

/// Ordered reference model that tracks the capacity the policy predicts.
#[derive(Clone, Debug)]
struct Model {
    entries: Vec<(u8, i32)>,
    capacity: usize,
}

impl Model {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            capacity: growth::INITIAL_CAPACITY,
        }
    }

    fn pos(&self, k: u8) -> Option<usize> {
        self.entries.iter().position(|(kk, _)| *kk == k)
    }

    fn set(&mut self, k: u8, v: i32) {
        match self.pos(k) {
            Some(p) => self.entries[p].1 = v,
            None => {
                self.entries.push((k, v));
                if self.entries.len() == self.capacity {
                    self.capacity = growth::grown_capacity(self.capacity);
                }
            }
        }
    }

    fn remove(&mut self, p: usize) -> (u8, i32) {
        let e = self.entries.remove(p);
        if growth::should_shrink(self.capacity, self.entries.len()) {
            self.capacity = growth::shrunk_capacity(self.entries.len());
        }
        e
    }

    fn lookup_err(&self, k: u8) -> Result<usize, DictError> {
        if self.entries.is_empty() {
            return Err(DictError::Empty);
        }
        self.pos(k).ok_or(DictError::KeyNotFound)
    }

    fn normalise(&self, i: isize) -> Result<usize, DictError> {
        let len = self.entries.len();
        if len == 0 {
            return Err(DictError::Empty);
        }
        let n = if i < 0 { len as isize + i } else { i };
        if n < 0 || n as usize >= len {
            return Err(DictError::IndexOutOfRange { index: i, len });
        }
        Ok(n as usize)
    }
}

fn scan_entries(m: &ScanMap<u8, i32>) -> Vec<(u8, i32)> {
    m.iter().map(|(k, v)| (*k, *v)).collect()
}

fn hashed_entries(m: &HashedMap<u8, i32>) -> Vec<(u8, i32)> {
    m.iter().map(|(k, v)| (*k, *v)).collect()
}

// Property: ScanMap is equivalent to the ordered model.
// Invariants exercised after every operation:
// - entries (order, keys, values) equal the model's;
// - `capacity()` equals the policy-predicted capacity;
// - `1 <= capacity` and `len <= capacity`;
// - error kinds match (Empty before KeyNotFound / IndexOutOfRange);
// - a copy mutated afterwards never changes the source.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_scan_map_matches_model(ops in arb_ops()) {
        let mut sut: ScanMap<u8, i32> = ScanMap::new();
        let mut model = Model::new();

        for op in ops {
            match op {
                Op::Set(k, v) => {
                    let had = model.pos(k).is_some();
                    let before = sut.len();
                    sut.set(k, v);
                    model.set(k, v);
                    prop_assert_eq!(sut.len(), if had { before } else { before + 1 });
                    prop_assert_eq!(sut.get(&k), Ok(v));
                }
                Op::Get(k) => {
                    let want = model.lookup_err(k).map(|p| model.entries[p].1);
                    prop_assert_eq!(sut.get(&k), want);
                }
                Op::Pop(k) => {
                    let want = model.lookup_err(k).map(|p| model.remove(p).1);
                    prop_assert_eq!(sut.pop(&k), want);
                    prop_assert_eq!(sut.index(&k), None);
                }
                Op::Index(k) => {
                    prop_assert_eq!(sut.index(&k), model.pos(k));
                }
                Op::PopIndex(i) => {
                    let want = model.normalise(i).map(|p| model.remove(p));
                    prop_assert_eq!(sut.popindex(i), want);
                }
                Op::Clear => {
                    sut.clear();
                    model = Model::new();
                }
                Op::Update(pairs) => {
                    let other: ScanMap<u8, i32> = pairs.iter().copied().collect();
                    let other_entries = scan_entries(&other);
                    let before_keys: Vec<u8> = model.entries.iter().map(|(k, _)| *k).collect();
                    for (k, v) in &other_entries {
                        model.set(*k, *v);
                    }
                    sut.update(&other);
                    for (k, v) in &other_entries {
                        prop_assert_eq!(sut.get(k), Ok(*v));
                    }
                    let mut union = before_keys;
                    for (k, _) in &other_entries {
                        if !union.contains(k) {
                            union.push(*k);
                        }
                    }
                    prop_assert_eq!(sut.len(), union.len());
                }
                Op::CopyThenMutate(k) => {
                    let before = scan_entries(&sut);
                    let mut copy = sut.copy();
                    prop_assert_eq!(copy.capacity(), sut.capacity());
                    let _ = copy.pop(&k);
                    copy.set(k.wrapping_add(100), -1);
                    let _ = copy.popindex(0);
                    prop_assert_eq!(scan_entries(&sut), before);
                }
            }

            prop_assert_eq!(scan_entries(&sut), model.entries.clone());
            prop_assert_eq!(sut.capacity(), model.capacity);
            prop_assert!(sut.capacity() >= 1);
            prop_assert!(sut.len() <= sut.capacity());
            prop_assert_eq!(sut.is_empty(), model.entries.is_empty());
        }
    }
}

// Property: HashedMap and ScanMap agree on every observable after the same
// operation sequence, including capacity and entry order.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_hashed_map_parity(ops in arb_ops()) {
        let mut scan: ScanMap<u8, i32> = ScanMap::new();
        let mut hashed: HashedMap<u8, i32> = HashedMap::new();

        for op in ops {
            match op {
                Op::Set(k, v) => {
                    prop_assert_eq!(scan.set(k, v), hashed.set(k, v));
                }
                Op::Get(k) => {
                    prop_assert_eq!(scan.get(&k), hashed.get(&k));
                }
                Op::Pop(k) => {
                    prop_assert_eq!(scan.pop(&k), hashed.pop(&k));
                }
                Op::Index(k) => {
                    prop_assert_eq!(scan.index(&k), hashed.index(&k));
                }
                Op::PopIndex(i) => {
                    prop_assert_eq!(scan.popindex(i), hashed.popindex(i));
                }
                Op::Clear => {
                    scan.clear();
                    hashed.clear();
                }
                Op::Update(pairs) => {
                    let so: ScanMap<u8, i32> = pairs.iter().copied().collect();
                    let ho: HashedMap<u8, i32> = pairs.iter().copied().collect();
                    scan.update(&so);
                    hashed.update(&ho);
                }
                Op::CopyThenMutate(k) => {
                    let mut sc = scan.copy();
                    let mut hc = hashed.copy();
                    prop_assert_eq!(sc.pop(&k), hc.pop(&k));
                    prop_assert_eq!(scan_entries(&sc), hashed_entries(&hc));
                }
            }

            prop_assert_eq!(scan_entries(&scan), hashed_entries(&hashed));
            prop_assert_eq!(scan.capacity(), hashed.capacity());
            for (pos, (k, _)) in scan_entries(&scan).into_iter().enumerate() {
                prop_assert_eq!(hashed.index(&k), Some(pos));
            }
        }
    }
}
