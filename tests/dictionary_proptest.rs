// Dictionary property tests.
//
// Property 1: update semantics.
//  - For every key in `b`, `a`'s value after update equals `b`'s value.
//  - For every key only in `a`, the value is unchanged.
//  - len(a) == |keys(a) ∪ keys(b)|; `b` is untouched.
//
// Property 2: set/pop round trip.
//  - set on an absent key grows len by one; pop returns the value, shrinks
//    len by one and leaves the key absent.
//  - popindex(-1) removes the same entry as popindex(len - 1).
use proptest::prelude::*;
use scan_dict::Dictionary;
use std::collections::HashMap;

fn arb_pairs() -> impl Strategy<Value = Vec<(u8, i32)>> {
    proptest::collection::vec((0u8..24, any::<i32>()), 0..30)
}

proptest! {
    #[test]
    fn prop_update_semantics(a_pairs in arb_pairs(), b_pairs in arb_pairs()) {
        let a: Dictionary<u8, i32> = a_pairs.iter().copied().collect();
        let b: Dictionary<u8, i32> = b_pairs.iter().copied().collect();
        let a_before: HashMap<u8, i32> = a.snapshot().into_iter().collect();
        let b_map: HashMap<u8, i32> = b.snapshot().into_iter().collect();
        let b_before = b.snapshot();

        a.update(&b);

        for (k, v) in &b_map {
            prop_assert_eq!(a.get(k), Ok(*v));
        }
        for (k, v) in &a_before {
            if !b_map.contains_key(k) {
                prop_assert_eq!(a.get(k), Ok(*v));
            }
        }
        let union = a_before.keys().chain(b_map.keys()).collect::<std::collections::HashSet<_>>();
        prop_assert_eq!(a.len(), union.len());
        prop_assert!(a.len() <= a.capacity());
        prop_assert_eq!(b.snapshot(), b_before);
    }

    #[test]
    fn prop_set_pop_round_trip(pairs in arb_pairs(), k in 100u8..200, v in any::<i32>()) {
        let d: Dictionary<u8, i32> = pairs.into_iter().collect();
        let n = d.len();
        prop_assert_eq!(d.set(k, v), None);
        prop_assert_eq!(d.len(), n + 1);
        prop_assert_eq!(d.get(&k), Ok(v));
        prop_assert_eq!(d.pop(&k), Ok(v));
        prop_assert_eq!(d.len(), n);
        prop_assert_eq!(d.index(&k), None);

        if n > 0 {
            let e = d.copy();
            prop_assert_eq!(d.popindex(-1), e.popindex(n as isize - 1));
            prop_assert_eq!(d.snapshot(), e.snapshot());
            prop_assert_eq!(d.capacity(), e.capacity());
        }
    }
}
