//! Growth and shrink policy for the entry buffer.
//!
//! The ratios are part of the contract: they decide exactly when a buffer
//! reallocates, so they are spelled out here instead of deferring to `Vec`'s
//! own amortisation.
//!
//! - Grow: when an append makes `len == capacity`, the new capacity is
//!   `⌊(capacity + 1) × GROW_RATIO⌋`, computed in `f64` and truncated.
//! - Shrink: after a removal, if `capacity > GROW_RATIO × len` (again in
//!   `f64`), the capacity drops to `len + 1`.
//! - Clear: capacity resets to [`INITIAL_CAPACITY`].

/// Multiplicative factor used for both growth and the shrink threshold.
pub const GROW_RATIO: f64 = 1.2;

/// Capacity of a freshly constructed or cleared buffer.
pub const INITIAL_CAPACITY: usize = 1;

/// Capacity after growing a full buffer of `capacity` slots.
#[inline]
pub fn grown_capacity(capacity: usize) -> usize {
    ((capacity + 1) as f64 * GROW_RATIO) as usize
}

/// Whether a buffer of `capacity` slots holding `len` entries should shrink.
#[inline]
pub fn should_shrink(capacity: usize, len: usize) -> bool {
    capacity as f64 > GROW_RATIO * len as f64
}

/// Capacity after shrinking around `len` live entries.
#[inline]
pub fn shrunk_capacity(len: usize) -> usize {
    len + 1
}
