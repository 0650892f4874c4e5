use core::iter::FusedIterator;

use crate::{arena::Handle, Hook, Tree};

/// An iterator over the keys of a [`Tree`] in ascending order.
///
/// Created by [`Tree::iter`].
pub struct Iter<'tree, K, H: Hook> {
    tree: &'tree Tree<K, H>,
    front_cur: Option<Handle>,
    len: usize,
}

impl<'tree, K, H: Hook> Iter<'tree, K, H> {
    pub(crate) fn new(tree: &'tree Tree<K, H>) -> Self {
        Iter {
            tree,
            front_cur: tree.root.map(|root| tree.min_in_subtree(root)),
            len: tree.len(),
        }
    }
}

impl<'tree, K, H: Hook> Iterator for Iter<'tree, K, H> {
    type Item = &'tree K;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.front_cur?;

        self.front_cur = self.tree.successor(cur);
        self.len -= 1;

        Some(&self.tree.node(cur).key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, H: Hook> ExactSizeIterator for Iter<'_, K, H> {}

impl<K, H: Hook> FusedIterator for Iter<'_, K, H> {}

impl<K, H: Hook> Clone for Iter<'_, K, H> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front_cur: self.front_cur,
            len: self.len,
        }
    }
}
