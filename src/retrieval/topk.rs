//! Bounded collector for the k smallest distances.

use std::cmp::Ordering;

/// Distance to one store entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Ranked {
    /// Distance from the query.
    pub distance: f64,
    /// Position of the entry in the store.
    pub index: usize,
}

/// Ascending by distance; equal distances keep store order.
fn ranked_cmp_asc(a: &Ranked, b: &Ranked) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.index.cmp(&b.index))
}

/// Top-K container with O(k) insertion cost.
pub(crate) struct TopK {
    k: usize,
    items: Vec<Ranked>,
}

impl TopK {
    /// Creates a collector keeping at most `k` items.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            items: Vec::with_capacity(k),
        }
    }

    /// Pushes a candidate, evicting the current worst if at capacity.
    pub fn push(&mut self, item: Ranked) {
        if self.k == 0 {
            return;
        }
        if self.items.len() < self.k {
            self.items.push(item);
            return;
        }

        let mut worst_idx = 0usize;
        for (idx, current) in self.items.iter().enumerate().skip(1) {
            if ranked_cmp_asc(current, &self.items[worst_idx]) == Ordering::Greater {
                worst_idx = idx;
            }
        }

        if ranked_cmp_asc(&item, &self.items[worst_idx]) == Ordering::Less {
            self.items[worst_idx] = item;
        }
    }

    /// Returns the kept items sorted by ascending distance.
    pub fn into_sorted_asc(mut self) -> Vec<Ranked> {
        self.items.sort_by(ranked_cmp_asc);
        self.items
    }
}
