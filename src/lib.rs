//! scan-dict: an array-backed dictionary keyed by an injected equality
//! predicate, with explicit growth policy and advisory locking.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small-to-medium key/value store that needs nothing from its
//!   keys beyond an equality test, with costs that are easy to predict.
//! - Layers:
//!   - `EntryBuffer<T>`: contiguous storage carrying an explicit logical
//!     capacity; growth and shrink follow the constants in [`growth`].
//!   - [`ScanMap<K, V, E>`]: the dictionary proper. Entries stay in
//!     insertion order; every lookup is a linear scan with `E: KeyEq<K>`.
//!   - [`Dictionary<K, V, E>`]: wraps `ScanMap` behind an internal mutex so
//!     each operation is atomic, plus an advisory lock (`protect`) that
//!     callers use to make several operations atomic together.
//!   - [`HashedMap<K, V, S>`]: opt-in alternative for `K: Eq + Hash` with
//!     the same contract and O(1) average lookup.
//!
//! Constraints
//! - No ordering, no hashing on the default path: the predicate only
//!   answers "same key or not".
//! - Positions are contiguous `[0, len)` and shift when an entry is
//!   removed; never keep an index across a mutation.
//! - Capacity always satisfies `1 <= capacity` and `len <= capacity`.
//! - Misuse (empty map, missing key, bad index) is a [`DictError`], never a
//!   process exit.
//!
//! Growth policy
//! - Append that fills the buffer: `capacity = ⌊(capacity + 1) × 1.2⌋`.
//! - Removal leaving `capacity > 1.2 × len`: `capacity = len + 1`.
//! - `clear`: `capacity = 1`.
//!
//! Locking
//! - `ScanMap`/`HashedMap` are plain `&mut` structures with no locking.
//! - `Dictionary` takes its internal lock per operation. The advisory lock
//!   is never taken internally; it only serialises cooperating callers.
//! - The predicate runs under the internal lock. Calling back into the same
//!   `Dictionary` from it is a bug; debug builds panic instead of deadlocking.
//! - `Dictionary::destroy` takes `self`, so teardown cannot race with an
//!   in-flight operation or an outstanding `Protected` guard.
//!
//! Notes and non-goals
//! - Not a replacement for `HashMap` at scale: `ScanMap` is O(n) per lookup.
//! - No persistence, serialization or iteration stability under concurrent
//!   mutation.

mod advisory;
pub mod dictionary;
pub mod equality;
mod error;
pub mod growth;
pub mod hashed_map;
mod reentrancy;
pub mod scan_map;
mod scan_map_proptest;
mod storage;

// Public surface
pub use dictionary::{Dictionary, Protected};
pub use equality::{DefaultEq, KeyEq, ZeroIsEqual};
pub use error::{DictError, Result};
pub use hashed_map::HashedMap;
pub use scan_map::ScanMap;
