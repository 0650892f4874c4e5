//! Range and order-statistic queries.
//!
//! [`rank`](Tree::rank), [`count`](Tree::count) and [`select`](Tree::select) read the cached subtree
//! sizes and so are only available on [`SizeAvlTree`](crate::SizeAvlTree). Range listing only
//! needs the ordering and works on any tree.

use core::borrow::Borrow;

use crate::{arena::Handle, Hook, NodeRef, SizeHook, Tree};

impl<K: Ord, H: Hook> Tree<K, H> {
    fn range_lca_raw<Q>(&self, low: &Q, high: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut opt_cur = self.root;

        while let Some(cur) = opt_cur {
            let node = self.node(cur);
            let key: &Q = node.key.borrow();

            if low <= key && key <= high {
                break;
            }

            opt_cur = if low < key { node.left() } else { node.right() };
        }

        opt_cur
    }

    /// Returns the split node of `low..=high`: the shallowest node whose key lies in the range.
    ///
    /// Every key in the range is stored in the subtree rooted at this node. Returns `None` if no key
    /// lies in the range.
    pub fn range_lca<Q>(&self, low: &Q, high: &Q) -> Option<NodeRef<'_, K, H>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let lca = self.range_lca_raw(low, high)?;
        Some(NodeRef::new(self, lca))
    }

    /// Returns every key `k` with `low <= k <= high`, in ascending order.
    ///
    /// This operation completes in _O(log(n) + m)_ time, where `m` is the number of keys returned.
    pub fn list<Q>(&self, low: &Q, high: &Q) -> Vec<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut keys = Vec::new();

        if low <= high {
            if let Some(lca) = self.range_lca_raw(low, high) {
                self.collect_range(lca, low, high, &mut keys);
            }
        }

        keys
    }

    // Appends the in-range keys of the subtree rooted at `node`, skipping children that cannot
    // hold any.
    fn collect_range<'tree, Q>(
        &'tree self,
        node: Handle,
        low: &Q,
        high: &Q,
        out: &mut Vec<&'tree K>,
    ) where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.node(node);
        let key: &Q = node.key.borrow();

        if key >= low {
            if let Some(left) = node.left() {
                self.collect_range(left, low, high, out);
            }
        }

        if low <= key && key <= high {
            out.push(&node.key);
        }

        if key <= high {
            if let Some(right) = node.right() {
                self.collect_range(right, low, high, out);
            }
        }
    }
}

impl<K: Ord> Tree<K, SizeHook> {
    /// Returns the number of keys less than or equal to `key`, counting duplicates.
    ///
    /// For a key in the tree this is its one-based position in sorted order.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut rank = 0;
        let mut opt_cur = self.root;

        while let Some(cur) = opt_cur {
            let node = self.node(cur);
            let node_key: &Q = node.key.borrow();

            if key < node_key {
                opt_cur = node.left();
            } else {
                // `cur` and its whole left subtree are <= `key`. Equal keys may also sit to the
                // right, so keep descending.
                rank += 1 + self.stats(node.left()).size;
                opt_cur = node.right();
            }
        }

        rank
    }

    // Returns the number of keys strictly less than `key`.
    fn rank_below<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut rank = 0;
        let mut opt_cur = self.root;

        while let Some(cur) = opt_cur {
            let node = self.node(cur);
            let node_key: &Q = node.key.borrow();

            if key <= node_key {
                opt_cur = node.left();
            } else {
                rank += 1 + self.stats(node.left()).size;
                opt_cur = node.right();
            }
        }

        rank
    }

    /// Returns the number of keys `k` with `low <= k <= high`, counting duplicates.
    ///
    /// Always equal to `self.list(low, high).len()`, but completes in _O(log(n))_ time.
    pub fn count<Q>(&self, low: &Q, high: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if low > high {
            return 0;
        }

        self.rank(high) - self.rank_below(low)
    }

    /// Returns the key at zero-based position `index` in sorted order.
    ///
    /// `tree.select(tree.rank(k) - 1)` is `k` for every `k` in the tree.
    pub fn select(&self, mut index: usize) -> Option<&K> {
        let mut opt_cur = self.root;

        while let Some(cur) = opt_cur {
            let node = self.node(cur);
            let left_size = self.stats(node.left()).size;

            if index < left_size {
                opt_cur = node.left();
            } else if index == left_size {
                return Some(&node.key);
            } else {
                index -= left_size + 1;
                opt_cur = node.right();
            }
        }

        None
    }
}
