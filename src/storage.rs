//! EntryBuffer: owned contiguous storage whose capacity follows `growth`.

use crate::error::{DictError, Result};
use crate::growth;
use tracing::trace;

/// Normalise a possibly negative position against `len`.
///
/// Negative positions count from the end (`-1` is the last entry). Fails with
/// `Empty` on an empty buffer before looking at the index.
pub(crate) fn resolve_index(index: isize, len: usize) -> Result<usize> {
    if len == 0 {
        return Err(DictError::Empty);
    }
    let pos = if index >= 0 {
        index
    } else {
        (len as isize).wrapping_add(index)
    };
    if pos < 0 || pos as usize >= len {
        return Err(DictError::IndexOutOfRange { index, len });
    }
    Ok(pos as usize)
}

/// Contiguous slots `[0, len)` plus a logical capacity.
///
/// The backing `Vec` always has at least `capacity` physical slots, so an
/// append below the logical capacity never reallocates. Positions are not
/// stable across removals; callers must not hold indices across mutation.
#[derive(Debug)]
pub(crate) struct EntryBuffer<T> {
    slots: Vec<T>,
    capacity: usize,
}

impl<T> EntryBuffer<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::with_capacity(growth::INITIAL_CAPACITY),
            capacity: growth::INITIAL_CAPACITY,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        &self.slots
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.slots
    }

    /// Append at the end, growing once the buffer becomes full.
    pub(crate) fn push(&mut self, item: T) {
        debug_assert!(self.slots.len() < self.capacity);
        self.slots.push(item);
        if self.slots.len() == self.capacity {
            let from = self.capacity;
            self.capacity = growth::grown_capacity(from);
            // Allocation failure here aborts through the global handler.
            self.slots.reserve_exact(self.capacity - self.slots.len());
            trace!(from, to = self.capacity, len = self.slots.len(), "entry buffer grew");
        }
    }

    /// Remove the slot at `pos`, compacting the tail and shrinking if the
    /// buffer became too sparse. `pos` must be in bounds.
    pub(crate) fn remove(&mut self, pos: usize) -> T {
        let item = self.slots.remove(pos);
        let len = self.slots.len();
        if growth::should_shrink(self.capacity, len) {
            let from = self.capacity;
            self.capacity = growth::shrunk_capacity(len);
            self.slots.shrink_to(self.capacity);
            trace!(from, to = self.capacity, len, "entry buffer shrank");
        }
        item
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.capacity = growth::INITIAL_CAPACITY;
        self.slots.shrink_to(self.capacity);
        trace!("entry buffer cleared");
    }

    pub(crate) fn into_vec(self) -> Vec<T> {
        self.slots
    }
}

impl<T: Clone> Clone for EntryBuffer<T> {
    /// Independent buffer sized to the source's logical capacity.
    fn clone(&self) -> Self {
        let mut slots = Vec::with_capacity(self.capacity);
        slots.extend_from_slice(&self.slots);
        trace!(capacity = self.capacity, len = slots.len(), "entry buffer copied");
        Self {
            slots,
            capacity: self.capacity,
        }
    }
}

impl<T> Default for EntryBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}
