//! A size-augmented AVL tree, usable as an ordered multiset index with order-statistic queries.
//!
//! [`Tree`] keeps a binary search tree height-balanced under arbitrary insertions and deletions.
//! What it caches on each node is chosen by its [`Hook`]:
//!
//! - [`AvlTree`] (`Tree<K, HeightHook>`) caches subtree height only.
//! - [`SizeAvlTree`] (`Tree<K, SizeHook>`) additionally caches subtree size, which enables
//!   [`rank`](Tree::rank), [`count`](Tree::count) and [`select`](Tree::select) in _O(log(n))_.
//!
//! Equal keys are stored as distinct nodes. An inserted key is placed after every key equal to it.
//!
//! ```
//! use rank_avl::SizeAvlTree;
//!
//! let mut tree: SizeAvlTree<u32> = [23, 8, 4, 16, 15, 42].into_iter().collect();
//!
//! assert_eq!(tree.rank(&16), 4);
//! assert_eq!(tree.count(&15, &23), 3);
//! assert_eq!(tree.list(&15, &23), [&15, &16, &23]);
//!
//! assert_eq!(tree.delete(&8), Ok(8));
//! assert_eq!(tree.rank(&16), 3);
//! ```
#![forbid(unsafe_code)]

// Conventions used in comments:
// - `h(x)` is the cached height of node `x`; an absent child has height -1.
// - `s(x)` is the cached size of the subtree rooted at `x`; an absent child has size 0.
// - A node is left-heavy (right-heavy) when `h(left) >= h(right) + 2` (or the mirror).
//
// The structure is stored in an arena: nodes refer to their children and parent by `Handle`.
// Whichever node a parent's child slot names is owned by that parent; the parent link is only a
// back reference and is `None` exactly at the root.

use core::{fmt, marker::PhantomData};

mod arena;
mod balance;
mod base;
mod debug;
mod error;
mod hook;
mod invariants;
mod iter;
mod node;
mod order;

#[cfg(any(test, feature = "model"))]
pub mod model;

#[cfg(test)]
mod tests;

use arena::{Arena, Handle};
use node::Node;

pub use error::{InvariantViolation, KeyNotFound};
pub use hook::{HeightHook, Hook, SizeHook};
pub use iter::Iter;
pub use node::Stats;

/// A plain AVL tree, caching only subtree heights.
pub type AvlTree<K> = Tree<K, HeightHook>;

/// An AVL tree that also caches subtree sizes, supporting order-statistic queries.
pub type SizeAvlTree<K> = Tree<K, SizeHook>;

/// A self-balancing binary search tree over keys of type `K`.
///
/// See the [crate documentation](crate) for an overview.
pub struct Tree<K, H: Hook = HeightHook> {
    root: Option<Handle>,
    nodes: Arena<Node<K>>,
    _hook: PhantomData<H>,
}

impl<K, H: Hook> Tree<K, H> {
    /// Returns a new empty tree.
    pub const fn new() -> Self {
        Tree {
            root: None,
            nodes: Arena::new(),
            _hook: PhantomData,
        }
    }

    /// Returns `true` if the tree contains no keys.
    pub fn is_empty(&self) -> bool {
        let empty = self.len() == 0;
        debug_assert_eq!(empty, self.root.is_none());
        empty
    }

    /// Returns the number of keys in the tree, counting duplicates.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the height of the tree: `-1` when empty, `0` for a single key.
    pub fn height(&self) -> i32 {
        self.stats(self.root).height
    }

    /// Returns the root node.
    pub fn root(&self) -> Option<NodeRef<'_, K, H>> {
        self.root.map(|root| NodeRef::new(self, root))
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
    }

    /// Returns an iterator over the keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K, H> {
        Iter::new(self)
    }

    // Support methods ========================================================

    #[inline]
    fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<K> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    fn stats(&self, node: Option<Handle>) -> Stats {
        node.map(|n| self.node(n).stats).unwrap_or(Stats::EMPTY)
    }

    #[inline]
    fn height_of(&self, node: Option<Handle>) -> i32 {
        self.stats(node).height
    }

    // Recomputes the cached statistics of `handle` from its children.
    fn refresh(&mut self, handle: Handle) {
        let node = self.node(handle);
        let left = self.stats(node.left());
        let right = self.stats(node.right());
        H::refresh(&mut self.node_mut(handle).stats, left, right);
    }
}

impl<K, H: Hook> Default for Tree<K, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, H: Hook> FromIterator<K> for Tree<K, H> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Tree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, H: Hook> Extend<K> for Tree<K, H> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: fmt::Debug, H: Hook> fmt::Debug for Tree<K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'tree, K, H: Hook> IntoIterator for &'tree Tree<K, H> {
    type Item = &'tree K;
    type IntoIter = Iter<'tree, K, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A shared reference to one node of a [`Tree`].
pub struct NodeRef<'tree, K, H: Hook> {
    tree: &'tree Tree<K, H>,
    handle: Handle,
}

impl<'tree, K, H: Hook> NodeRef<'tree, K, H> {
    fn new(tree: &'tree Tree<K, H>, handle: Handle) -> Self {
        NodeRef { tree, handle }
    }

    fn node(&self) -> &'tree Node<K> {
        self.tree.node(self.handle)
    }

    fn relative(&self, link: Option<Handle>) -> Option<Self> {
        link.map(|handle| NodeRef::new(self.tree, handle))
    }

    /// Returns the key stored in this node.
    pub fn key(&self) -> &'tree K {
        &self.node().key
    }

    /// Returns the height of the subtree rooted at this node.
    pub fn height(&self) -> i32 {
        self.node().stats.height
    }

    pub fn parent(&self) -> Option<Self> {
        self.relative(self.node().parent)
    }

    pub fn left(&self) -> Option<Self> {
        self.relative(self.node().left())
    }

    pub fn right(&self) -> Option<Self> {
        self.relative(self.node().right())
    }

    /// Returns the in-order successor of this node, which may hold an equal key.
    pub fn successor(&self) -> Option<Self> {
        self.relative(self.tree.successor(self.handle))
    }
}

impl<'tree, K> NodeRef<'tree, K, SizeHook> {
    /// Returns the number of nodes in the subtree rooted at this node.
    pub fn size(&self) -> usize {
        self.node().stats.size
    }
}

impl<K, H: Hook> Clone for NodeRef<'_, K, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, H: Hook> Copy for NodeRef<'_, K, H> {}

impl<K: fmt::Debug, H: Hook> fmt::Debug for NodeRef<'_, K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("stats", &self.node().stats)
            .finish()
    }
}
