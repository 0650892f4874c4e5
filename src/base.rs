//! Unbalanced binary search tree primitives.
//!
//! The raw mutations here keep only the ordering invariant. Cached statistics above the edit point
//! are stale when they return; the balancer restores them.

use core::{borrow::Borrow, cmp::Ordering, mem};

use crate::{
    arena::Handle,
    node::{Dir, Node},
    Hook, KeyNotFound, NodeRef, Tree,
};

impl<K, H: Hook> Tree<K, H> {
    // Returns the minimum node in the subtree rooted at `root`.
    pub(crate) fn min_in_subtree(&self, root: Handle) -> Handle {
        let mut cur = root;
        while let Some(left) = self.node(cur).left() {
            cur = left;
        }
        cur
    }

    pub(crate) fn max_in_subtree(&self, root: Handle) -> Handle {
        let mut cur = root;
        while let Some(right) = self.node(cur).right() {
            cur = right;
        }
        cur
    }

    // Returns the in-order successor of `node`.
    pub(crate) fn successor(&self, node: Handle) -> Option<Handle> {
        if let Some(right) = self.node(node).right() {
            return Some(self.min_in_subtree(right));
        }

        // Ascend while `cur` is a right child.
        let mut cur = node;
        while let Some(parent) = self.node(cur).parent {
            if self.node(parent).left() == Some(cur) {
                return Some(parent);
            }
            cur = parent;
        }

        None
    }

    pub(crate) fn which_child(&self, parent: Handle, child: Handle) -> Dir {
        if self.node(parent).left() == Some(child) {
            Dir::Left
        } else {
            debug_assert_eq!(
                self.node(parent).right(),
                Some(child),
                "`child` must be a child of `parent`"
            );
            Dir::Right
        }
    }

    // Points whichever link of `parent` names `old_child` at `new_child` instead, or makes
    // `new_child` the root if `parent` is `None`.
    //
    // `new_child`'s parent link is not updated.
    pub(crate) fn replace_child_or_set_root(
        &mut self,
        parent: Option<Handle>,
        old_child: Handle,
        new_child: Option<Handle>,
    ) {
        match parent {
            Some(parent) => {
                let dir = self.which_child(parent, old_child);
                self.node_mut(parent).set_child(dir, new_child);
            }
            None => self.root = new_child,
        }
    }

    /// Returns the node holding the smallest key, or `None` if the tree is empty.
    pub fn find_min(&self) -> Option<NodeRef<'_, K, H>> {
        let min = self.min_in_subtree(self.root?);
        Some(NodeRef::new(self, min))
    }

    /// Returns the node holding the largest key, or `None` if the tree is empty.
    pub fn find_max(&self) -> Option<NodeRef<'_, K, H>> {
        let max = self.max_in_subtree(self.root?);
        Some(NodeRef::new(self, max))
    }
}

impl<K: Ord, H: Hook> Tree<K, H> {
    pub(crate) fn find_raw<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut opt_cur = self.root;

        loop {
            let cur = opt_cur?;
            let node = self.node(cur);

            match key.cmp(node.key.borrow()) {
                Ordering::Less => opt_cur = node.left(),
                Ordering::Equal => return Some(cur),
                Ordering::Greater => opt_cur = node.right(),
            }
        }
    }

    /// Returns the first node found holding `key`.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn find<Q>(&self, key: &Q) -> Option<NodeRef<'_, K, H>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find_raw(key)?;
        Some(NodeRef::new(self, node))
    }

    /// Returns `true` if at least one node holds `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_raw(key).is_some()
    }

    /// Returns the node holding the smallest key strictly greater than `key`.
    ///
    /// Returns `None` if `key` is not in the tree or no larger key is.
    pub fn next_larger<Q>(&self, key: &Q) -> Option<NodeRef<'_, K, H>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut opt_cur = self.successor(self.find_raw(key)?);

        // Equal keys are adjacent in order; skip past them.
        while let Some(cur) = opt_cur {
            let cur_key: &Q = self.node(cur).key.borrow();
            if cur_key > key {
                break;
            }
            opt_cur = self.successor(cur);
        }

        opt_cur.map(|node| NodeRef::new(self, node))
    }

    // Links a new leaf holding `key` below the first empty slot on its search path and returns it.
    //
    // Equal keys descend to the right, so the new node follows every key equal to it.
    pub(crate) fn insert_raw(&mut self, key: K) -> Handle {
        let mut slot = None;
        let mut opt_cur = self.root;

        while let Some(cur) = opt_cur {
            let node = self.node(cur);
            let dir = if key < node.key { Dir::Left } else { Dir::Right };
            slot = Some((cur, dir));
            opt_cur = node.child(dir);
        }

        let parent = slot.map(|(parent, _)| parent);
        let new = self.nodes.alloc(Node::new(key, parent));

        match slot {
            Some((parent, dir)) => {
                self.node_mut(parent).set_child(dir, Some(new));
            }
            None => self.root = Some(new),
        }

        new
    }

    // Unlinks a node holding `key`. Returns the key and the removed node's former parent.
    //
    // A node with two children is not unlinked itself: it swaps keys with its successor, which has
    // no left child, and the successor's node is removed instead.
    pub(crate) fn delete_raw<Q>(&mut self, key: &Q) -> Result<(K, Option<Handle>), KeyNotFound>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let found = self.find_raw(key).ok_or(KeyNotFound)?;

        let removed = match (self.node(found).left(), self.node(found).right()) {
            (Some(_), Some(right)) => {
                let successor = self.min_in_subtree(right);
                let (found_node, successor_node) = self.nodes.get_pair_mut(found, successor);
                mem::swap(&mut found_node.key, &mut successor_node.key);
                successor
            }
            _ => found,
        };

        let node = self.node(removed);
        let parent = node.parent;
        let child = node.left().or(node.right());

        // Elevate the sole child (which may be None) into the removed node's place.
        self.replace_child_or_set_root(parent, removed, child);
        if let Some(child) = child {
            self.node_mut(child).parent = parent;
        }

        Ok((self.nodes.take(removed).key, parent))
    }
}
