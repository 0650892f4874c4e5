use core::borrow::Borrow;

use crate::{arena::Handle, node::Dir, Hook, KeyNotFound, Tree};

impl<K, H: Hook> Tree<K, H> {
    // Rotates `down` in direction `dir`: its `!dir` child moves up into its place and `down`
    // becomes that child's `dir` child. Returns the node that moved up.
    //
    // Both nodes are refreshed, `down` first, since its new children are already final.
    fn rotate(&mut self, down: Handle, dir: Dir) -> Handle {
        let up = self
            .node(down)
            .child(!dir)
            .expect("rotation requires a child on the opposite side");

        let parent = self.node(down).parent;
        self.replace_child_or_set_root(parent, down, Some(up));
        self.node_mut(up).parent = parent;

        // `across` goes from the `dir` child of `up` to the `!dir` child of `down`.
        let across = self.node_mut(up).set_child(dir, Some(down));
        self.node_mut(down).set_child(!dir, across);
        if let Some(across) = across {
            self.node_mut(across).parent = Some(down);
        }
        self.node_mut(down).parent = Some(up);

        self.refresh(down);
        self.refresh(up);

        tracing::trace!(?dir, ?down, ?up, "rotated");

        up
    }

    #[inline]
    pub(crate) fn rotate_left(&mut self, x: Handle) -> Handle {
        self.rotate(x, Dir::Left)
    }

    #[inline]
    pub(crate) fn rotate_right(&mut self, x: Handle) -> Handle {
        self.rotate(x, Dir::Right)
    }

    // Walks from `start` to the root, refreshing every node on the way and rotating wherever the
    // subtree heights differ by two or more.
    //
    // A raw insertion or deletion only disturbs the path from the edit point to the root, so one
    // upward pass restores every invariant.
    pub(crate) fn rebalance(&mut self, start: Option<Handle>) {
        let mut opt_cur = start;
        let mut rotations = 0_usize;

        while let Some(cur) = opt_cur {
            self.refresh(cur);

            let left = self.node(cur).left();
            let right = self.node(cur).right();
            let left_height = self.height_of(left);
            let right_height = self.height_of(right);

            if left_height >= right_height + 2 {
                let left = left.expect("a left-heavy node has a left child");
                let node = self.node(left);
                if self.height_of(node.left()) < self.height_of(node.right()) {
                    self.rotate_left(left);
                    rotations += 1;
                }
                self.rotate_right(cur);
                rotations += 1;
            } else if right_height >= left_height + 2 {
                let right = right.expect("a right-heavy node has a right child");
                let node = self.node(right);
                if self.height_of(node.right()) < self.height_of(node.left()) {
                    self.rotate_right(right);
                    rotations += 1;
                }
                self.rotate_left(cur);
                rotations += 1;
            }

            // After a rotation `cur` has moved down, so this revisits the node that replaced it.
            opt_cur = self.node(cur).parent;
        }

        tracing::trace!(rotations, "rebalanced");
    }
}

impl<K: Ord, H: Hook> Tree<K, H> {
    /// Inserts `key` into the tree.
    ///
    /// Keys equal to one already present are kept as separate nodes.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn insert(&mut self, key: K) {
        let node = self.insert_raw(key);
        self.rebalance(Some(node));
    }

    /// Removes one node holding `key` and returns its key.
    ///
    /// This operation completes in _O(log(n))_ time.
    ///
    /// # Errors
    ///
    /// Returns [`KeyNotFound`] if no node holds `key`; the tree is left unchanged.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<K, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (removed, parent) = match self.delete_raw(key) {
            Ok(removed) => removed,
            Err(e) => {
                tracing::debug!(len = self.len(), "delete: key not found");
                return Err(e);
            }
        };

        // The removed node's former parent is the lowest node whose subtree shrank. If there is
        // none, the removed node was the root and its sole child (if any) is intact.
        self.rebalance(parent);

        Ok(removed)
    }
}
