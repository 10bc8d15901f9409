//! Array-backed min-heap over bin indices, keyed by `bins[idx].err`. Slot 0
//! stores the current size; slot 1 is the root. Lazy tombstone deletion is
//! handled by the caller (see `quant::quantize`'s merge loop); this type
//! only maintains heap order.

use super::histogram::Bin;

pub(crate) struct Heap {
    slots: Vec<usize>,
}

impl Heap {
    pub(crate) fn with_capacity(cap: usize) -> Self {
        let mut slots = Vec::with_capacity(cap + 1);
        slots.push(0);
        Heap { slots }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots[0]
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn peek(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.slots[1])
        }
    }

    pub(crate) fn push(&mut self, bins: &[Bin], bin_idx: usize) {
        self.slots.push(bin_idx);
        self.slots[0] += 1;
        let mut k = self.slots[0];
        while k > 1 {
            let parent = k / 2;
            if bins[self.slots[parent]].err <= bins[self.slots[k]].err {
                break;
            }
            self.slots.swap(parent, k);
            k = parent;
        }
    }

    /// Replaces the root with the last element and sifts down, shrinking
    /// the heap by one. Used both for ordinary pop and for discarding a
    /// tombstoned root.
    pub(crate) fn pop_replace_with_last(&mut self, bins: &[Bin]) {
        let size = self.slots[0];
        if size == 0 {
            return;
        }
        self.slots[1] = self.slots[size];
        self.slots.truncate(size + 1);
        self.slots[0] = size - 1;
        self.sift_down(bins, 1);
    }

    /// Re-sifts the root downward; used after the candidate at the root is
    /// revalidated with a fresh `err` in place.
    pub(crate) fn sift_down_root(&mut self, bins: &[Bin]) {
        self.sift_down(bins, 1);
    }

    fn sift_down(&mut self, bins: &[Bin], mut k: usize) {
        let size = self.slots[0];
        loop {
            let left = 2 * k;
            let right = left + 1;
            let mut smallest = k;
            if left <= size && bins[self.slots[left]].err < bins[self.slots[smallest]].err {
                smallest = left;
            }
            if right <= size && bins[self.slots[right]].err < bins[self.slots[smallest]].err {
                smallest = right;
            }
            if smallest == k {
                break;
            }
            self.slots.swap(k, smallest);
            k = smallest;
        }
    }
}
