//! Key equality predicates.
//!
//! A map fixes its predicate at construction and uses it for every key
//! comparison it makes afterwards. Only equality is required; there is no
//! ordering and no hashing on this path.

/// Decides whether two keys name the same entry.
///
/// Implementations should be pure: the same pair must always produce the
/// same answer for the lifetime of the map.
pub trait KeyEq<K: ?Sized> {
    fn key_eq(&self, a: &K, b: &K) -> bool;
}

impl<K: ?Sized, F> KeyEq<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

/// Equality through `K: PartialEq`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultEq;

impl<K: ?Sized + PartialEq> KeyEq<K> for DefaultEq {
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Adapter for C-style tri-state comparators where `0` means "same key",
/// as returned by `strcmp`-like functions. Any non-zero result is a mismatch.
#[derive(Debug, Clone, Copy)]
pub struct ZeroIsEqual<F>(pub F);

impl<K: ?Sized, F> KeyEq<K> for ZeroIsEqual<F>
where
    F: Fn(&K, &K) -> i32,
{
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        (self.0)(a, b) == 0
    }
}
