use crate::{arena::Handle, Hook, InvariantViolation, Stats, Tree};

impl<K: Ord, H: Hook> Tree<K, H> {
    /// Walks the whole tree and verifies its representation invariants:
    ///
    /// 1. Every key in a node's left subtree is `<=` its key, which is `<=` every key in its
    ///    right subtree.
    /// 2. The heights of every node's subtrees differ by at most one.
    /// 3. Every cached height (and, for [`SizeHook`](crate::SizeHook) trees, every cached size)
    ///    matches a recomputation from scratch.
    /// 4. Parent links mirror child links, and every stored node is reachable from the root.
    ///
    /// This is a testing aid. It runs in _O(n)_ time.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_representation_invariant(&self) -> Result<(), InvariantViolation> {
        let result = self.check_tree();

        if let Err(violation) = &result {
            tracing::debug!(%violation, len = self.len(), "representation invariant violated");
        }

        result
    }

    fn check_tree(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root else {
            return match self.len() {
                0 => Ok(()),
                stored => Err(InvariantViolation::NodeCount {
                    reachable: 0,
                    stored,
                }),
            };
        };

        if self.node(root).parent.is_some() {
            return Err(InvariantViolation::RootHasParent);
        }

        let mut reachable = 0;
        self.check_subtree(root, &mut reachable)?;

        if reachable != self.len() {
            return Err(InvariantViolation::NodeCount {
                reachable,
                stored: self.len(),
            });
        }

        Ok(())
    }

    // Checks the subtree rooted at `handle` and returns its recomputed statistics along with its
    // minimum and maximum keys.
    fn check_subtree(
        &self,
        handle: Handle,
        reachable: &mut usize,
    ) -> Result<(Stats, &K, &K), InvariantViolation> {
        *reachable += 1;
        let node = self.node(handle);

        let mut left = Stats::EMPTY;
        let mut min = &node.key;
        if let Some(child) = node.left() {
            if self.node(child).parent != Some(handle) {
                return Err(InvariantViolation::BrokenParentLink);
            }

            let (stats, child_min, child_max) = self.check_subtree(child, reachable)?;
            if *child_max > node.key {
                return Err(InvariantViolation::Ordering);
            }
            left = stats;
            min = child_min;
        }

        let mut right = Stats::EMPTY;
        let mut max = &node.key;
        if let Some(child) = node.right() {
            if self.node(child).parent != Some(handle) {
                return Err(InvariantViolation::BrokenParentLink);
            }

            let (stats, child_min, child_max) = self.check_subtree(child, reachable)?;
            if *child_min < node.key {
                return Err(InvariantViolation::Ordering);
            }
            right = stats;
            max = child_max;
        }

        let difference = left.height - right.height;
        if difference.abs() > 1 {
            return Err(InvariantViolation::Unbalanced { difference });
        }

        let actual = Stats {
            height: 1 + left.height.max(right.height),
            size: 1 + left.size + right.size,
        };

        if node.stats.height != actual.height {
            return Err(InvariantViolation::StaleHeight {
                cached: node.stats.height,
                actual: actual.height,
            });
        }

        if H::TRACKS_SIZE && node.stats.size != actual.size {
            return Err(InvariantViolation::StaleSize {
                cached: node.stats.size,
                actual: actual.size,
            });
        }

        Ok((actual, min, max))
    }
}
