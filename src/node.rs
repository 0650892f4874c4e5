use core::{mem, ops::Not};

use crate::arena::Handle;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// Statistics cached on every node and recomputed whenever its children change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Stats {
    pub(crate) height: i32,
    pub(crate) size: usize,
}

impl Stats {
    /// Statistics of an absent subtree.
    pub const EMPTY: Stats = Stats {
        height: -1,
        size: 0,
    };

    pub(crate) const LEAF: Stats = Stats { height: 0, size: 1 };

    /// Height of the subtree, `-1` for an absent one.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of nodes in the subtree.
    ///
    /// Only maintained by [`SizeHook`](crate::SizeHook) trees.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }
}

pub(crate) struct Node<K> {
    pub(crate) key: K,
    // `None` iff this is the root.
    pub(crate) parent: Option<Handle>,
    children: [Option<Handle>; 2],
    pub(crate) stats: Stats,
}

impl<K> Node<K> {
    pub(crate) fn new(key: K, parent: Option<Handle>) -> Self {
        Self {
            key,
            parent,
            children: [None; 2],
            stats: Stats::LEAF,
        }
    }

    #[inline]
    pub(crate) fn child(&self, dir: Dir) -> Option<Handle> {
        self.children[dir as usize]
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.child(Dir::Left)
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.child(Dir::Right)
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Dir, child: Option<Handle>) -> Option<Handle> {
        mem::replace(&mut self.children[dir as usize], child)
    }
}
