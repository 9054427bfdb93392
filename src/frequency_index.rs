//! A sparse cumulative frequency index over `[0, max_ord)`.
//!
//! The index is a segment tree whose nodes are created on demand the first time an ordinal below
//! them is updated, so memory grows with the number of touched ordinals (times the tree depth)
//! rather than with `max_ord`. Nodes live in a single arena and refer to their children by
//! index; the root is always at index `0`, which doubles as the "no child" marker.

use crate::{Count, Ordinal};

/// Index of a node inside the arena.
type NodeId = u32;

/// Marks a missing child. The root is never anybody's child, so its index is free to reuse.
const NIL: NodeId = 0;

#[derive(Clone, Copy, Debug, Default)]
struct Node {
    /// The sum of the counts of all the ordinals covered by this node.
    sum: Count,
    left: NodeId,
    right: NodeId,
}

#[derive(Clone, Debug)]
pub struct FrequencyIndex {
    /// The size of the domain: ordinals are in `[0, max_ord)`.
    max_ord: Ordinal,

    nodes: Vec<Node>,
}

impl FrequencyIndex {
    /// Creates an empty index over `[0, max_ord)`.
    ///
    /// # Panics
    /// If `max_ord` is zero.
    pub fn new(max_ord: Ordinal) -> Self {
        assert!(max_ord > 0, "the domain of a frequency index can't be empty");
        Self {
            max_ord,
            nodes: vec![Node::default()],
        }
    }

    pub fn max_ord(&self) -> Ordinal {
        self.max_ord
    }

    /// Returns the number of allocated nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the sum of all counts.
    #[inline(always)]
    pub fn total(&self) -> Count {
        self.nodes[0].sum
    }

    /// Adds `delta` to the count of `ordinal`. A negative delta must not bring the count below
    /// zero.
    ///
    /// # Panics
    /// If the arena would need more than 2^32 nodes.
    pub fn update(&mut self, ordinal: Ordinal, delta: i64) {
        debug_assert!(ordinal < self.max_ord, "ordinal {ordinal} out of range");
        debug_assert!(delta >= 0 || self.count(ordinal) >= delta.unsigned_abs());

        let (mut lo, mut hi) = (0, self.max_ord);
        let mut node = 0_usize;

        loop {
            self.nodes[node].sum = self.nodes[node].sum.wrapping_add_signed(delta);
            if hi - lo == 1 {
                break;
            }
            let mid = lo + (hi - lo) / 2;
            let go_left = ordinal < mid;
            let child = match go_left {
                true => self.nodes[node].left,
                false => self.nodes[node].right,
            };
            let child = match child {
                NIL => self.alloc_child(node, go_left),
                id => id,
            };
            if go_left {
                hi = mid;
            } else {
                lo = mid;
            }
            node = child as usize;
        }
    }

    /// Returns the sum of the counts of all the ordinals `<= ordinal`.
    pub fn prefix_sum(&self, ordinal: Ordinal) -> Count {
        if ordinal >= self.max_ord - 1 {
            return self.total();
        }

        let (mut lo, mut hi) = (0, self.max_ord);
        let mut node = &self.nodes[0];
        let mut acc = 0;

        loop {
            if hi - lo == 1 {
                return acc + node.sum;
            }
            let mid = lo + (hi - lo) / 2;
            if ordinal < mid {
                if node.left == NIL {
                    return acc;
                }
                node = &self.nodes[node.left as usize];
                hi = mid;
            } else {
                if node.left != NIL {
                    acc += self.nodes[node.left as usize].sum;
                }
                if node.right == NIL {
                    return acc;
                }
                node = &self.nodes[node.right as usize];
                lo = mid;
            }
        }
    }

    /// Returns the sum of the counts of all the ordinals `< ordinal`.
    #[inline(always)]
    pub fn sum_below(&self, ordinal: Ordinal) -> Count {
        match ordinal {
            0 => 0,
            _ => self.prefix_sum(ordinal - 1),
        }
    }

    /// Returns the count of a single ordinal.
    pub fn count(&self, ordinal: Ordinal) -> Count {
        let (mut lo, mut hi) = (0, self.max_ord);
        let mut node = &self.nodes[0];

        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            let child = if ordinal < mid {
                hi = mid;
                node.left
            } else {
                lo = mid;
                node.right
            };
            if child == NIL {
                return 0;
            }
            node = &self.nodes[child as usize];
        }
        node.sum
    }

    /// Returns the smallest ordinal whose prefix sum exceeds `position`, or `None` if `position`
    /// is not below the total.
    pub fn find(&self, position: Count) -> Option<Ordinal> {
        self.find_scaled(position, 0, 1)
    }

    /// Like [`find`](Self::find), but over the weights `base + scale · count(o)`, i.e. as if every
    /// ordinal carried an implicit extra weight of `base` and the counts were multiplied by
    /// `scale`.
    pub fn find_scaled(&self, mut position: Count, base: Count, scale: Count) -> Option<Ordinal> {
        let weight = |node: NodeId, width: Ordinal| -> Count {
            let sum = match node {
                NIL => 0,
                id => self.nodes[id as usize].sum,
            };
            base * width + scale * sum
        };

        if position >= base * self.max_ord + scale * self.total() {
            return None;
        }

        let (mut lo, mut hi) = (0, self.max_ord);
        let mut node = Some(0 as NodeId);

        while hi - lo > 1 {
            let Some(id) = node else {
                // untouched subtree: only the implicit weights are left
                return Some(lo + position / base);
            };
            let current = &self.nodes[id as usize];
            let mid = lo + (hi - lo) / 2;
            let left_weight = weight(current.left, mid - lo);
            let (next, went_left) = match position < left_weight {
                true => (current.left, true),
                false => (current.right, false),
            };
            if went_left {
                hi = mid;
            } else {
                position -= left_weight;
                lo = mid;
            }
            node = (next != NIL).then_some(next);
        }
        Some(lo)
    }

    /// Returns the `(ordinal, count)` pairs with a non-zero count, in increasing ordinal order.
    pub fn entries(&self) -> Vec<(Ordinal, Count)> {
        let mut entries = Vec::new();
        let mut stack = vec![(0 as NodeId, 0, self.max_ord)];

        while let Some((node, lo, hi)) = stack.pop() {
            let current = &self.nodes[node as usize];
            if current.sum == 0 {
                continue;
            }
            if hi - lo == 1 {
                entries.push((lo, current.sum));
                continue;
            }
            let mid = lo + (hi - lo) / 2;
            // right first, so that the left subtree is popped first
            if current.right != NIL {
                stack.push((current.right, mid, hi));
            }
            if current.left != NIL {
                stack.push((current.left, lo, mid));
            }
        }
        entries
    }

    fn alloc_child(&mut self, parent: usize, left: bool) -> NodeId {
        let id = NodeId::try_from(self.nodes.len()).expect("frequency index arena is full");
        self.nodes.push(Node::default());
        match left {
            true => self.nodes[parent].left = id,
            false => self.nodes[parent].right = id,
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense_prefix(counts: &[Count], ordinal: usize) -> Count {
        counts[..=ordinal].iter().sum()
    }

    #[test]
    fn prefix_sums_match_a_dense_table() {
        let mut index = FrequencyIndex::new(37);
        let mut dense = vec![0; 37];
        for (ord, delta) in [(3, 5), (0, 1), (36, 2), (17, 4), (3, -2), (18, 1), (17, -4)] {
            index.update(ord, delta);
            dense[ord as usize] = (dense[ord as usize] as i64 + delta) as Count;
        }
        for ord in 0..37 {
            assert_eq!(index.prefix_sum(ord), dense_prefix(&dense, ord as usize), "ordinal {ord}");
            assert_eq!(index.count(ord), dense[ord as usize]);
        }
        assert_eq!(index.total(), dense.iter().sum::<Count>());
        assert_eq!(index.sum_below(0), 0);
        assert_eq!(index.entries(), vec![(0, 1), (3, 3), (18, 1), (36, 2)]);
    }

    #[test]
    fn prefix_sums_are_monotone_and_end_at_total() {
        let mut index = FrequencyIndex::new(1 << 10);
        for ord in (0..1 << 10).step_by(7) {
            index.update(ord, (ord % 5) as i64);
        }
        let mut last = 0;
        for ord in 0..1 << 10 {
            let sum = index.prefix_sum(ord);
            assert!(last <= sum);
            last = sum;
        }
        assert_eq!(index.prefix_sum((1 << 10) - 1), index.total());
    }

    #[test]
    fn huge_domain_stays_sparse() {
        let mut index = FrequencyIndex::new(1 << 32);
        index.update(0, 1);
        index.update((1 << 32) - 1, 3);
        index.update(1 << 31, 2);

        assert_eq!(index.total(), 6);
        assert_eq!(index.prefix_sum((1 << 31) - 1), 1);
        assert_eq!(index.prefix_sum(1 << 31), 3);
        assert_eq!(index.count((1 << 32) - 1), 3);
        // every update walks at most 33 levels
        assert!(index.node_count() <= 1 + 3 * 32);
    }

    #[test]
    fn find_inverts_prefix_sums() {
        let mut index = FrequencyIndex::new(100);
        index.update(10, 3);
        index.update(11, 1);
        index.update(90, 2);

        assert_eq!(index.find(0), Some(10));
        assert_eq!(index.find(2), Some(10));
        assert_eq!(index.find(3), Some(11));
        assert_eq!(index.find(4), Some(90));
        assert_eq!(index.find(5), Some(90));
        assert_eq!(index.find(6), None);
    }

    #[test]
    fn find_scaled_accounts_for_implicit_weights() {
        let mut index = FrequencyIndex::new(8);
        index.update(2, 1);
        // weights with base 1 and scale 3: [1, 1, 4, 1, 1, 1, 1, 1], total 11
        let expected = [0, 1, 2, 2, 2, 2, 3, 4, 5, 6, 7];
        for (position, ordinal) in expected.iter().enumerate() {
            assert_eq!(index.find_scaled(position as Count, 1, 3), Some(*ordinal));
        }
        assert_eq!(index.find_scaled(11, 1, 3), None);

        let empty = FrequencyIndex::new(1 << 32);
        assert_eq!(empty.find_scaled(12345, 1, 1), Some(12345));
    }
}
