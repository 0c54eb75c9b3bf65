//! Binary min-heap for the path search frontier
//!
//! Items carry their score at push time and a slot table maps each item to
//! its position in the backing array, so re-scoring an already queued item
//! is O(log n) instead of a linear scan.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Binary min-heap keyed by an `f32` score supplied at the call sites.
#[derive(Debug, Default)]
pub struct MinHeap<T: Copy + Eq + Hash> {
    entries: Vec<(T, f32)>,
    slots: FxHashMap<T, usize>,
}

impl<T: Copy + Eq + Hash> MinHeap<T> {
    /// Create an empty heap
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            slots: FxHashMap::default(),
        }
    }

    /// Number of queued items
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when `item` is currently queued
    #[must_use]
    pub fn contains(&self, item: T) -> bool {
        self.slots.contains_key(&item)
    }

    /// Queue `item` with the given score.
    ///
    /// An item must be queued at most once; call [`MinHeap::reschedule`] to
    /// change the score of an item that is already queued.
    pub fn push(&mut self, item: T, score: f32) {
        let slot = self.entries.len();
        self.entries.push((item, score));
        self.slots.insert(item, slot);
        self.sift_up(slot);
    }

    /// Remove and return the lowest-scored item
    pub fn pop(&mut self) -> Option<T> {
        if self.entries.is_empty() {
            return None;
        }
        let (item, _) = self.entries[0];
        self.slots.remove(&item);
        if let Some(last) = self.entries.pop() {
            if !self.entries.is_empty() {
                self.slots.insert(last.0, 0);
                self.entries[0] = last;
                self.sift_down(0);
            }
        }
        Some(item)
    }

    /// Lower the score of a queued item and restore heap order.
    ///
    /// Scores only ever improve during a search, so sifting toward the root
    /// is sufficient. Unknown items are ignored.
    pub fn reschedule(&mut self, item: T, score: f32) {
        if let Some(&slot) = self.slots.get(&item) {
            self.entries[slot].1 = score;
            self.sift_up(slot);
        }
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.entries[slot].1 < self.entries[parent].1 {
                self.swap_slots(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        loop {
            let left = slot * 2 + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < self.entries.len() && self.entries[left].1 < self.entries[smallest].1 {
                smallest = left;
            }
            if right < self.entries.len() && self.entries[right].1 < self.entries[smallest].1 {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap_slots(slot, smallest);
            slot = smallest;
        }
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.slots.insert(self.entries[a].0, a);
        self.slots.insert(self.entries[b].0, b);
    }
}
