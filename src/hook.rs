//! Per-node bookkeeping run by the balancer.
//!
//! Every time a node's children change, either through a rotation or while the rebalancing walk
//! passes over it, the tree's [`Hook`] recomputes that node's [`Stats`] from its children's.

use crate::Stats;

mod sealed {
    pub trait Sealed {}
}

/// Recomputes a node's cached statistics from those of its children.
///
/// This trait is sealed; the two implementations are [`HeightHook`] and [`SizeHook`].
pub trait Hook: sealed::Sealed {
    /// Whether [`Stats::size`] is kept up to date.
    const TRACKS_SIZE: bool;

    /// Refreshes `node` given the statistics of its left and right subtrees.
    fn refresh(node: &mut Stats, left: Stats, right: Stats);
}

/// Plain AVL bookkeeping: only height is maintained.
#[derive(Debug)]
pub enum HeightHook {}

/// Order-statistic bookkeeping: height and subtree size are maintained together.
#[derive(Debug)]
pub enum SizeHook {}

impl sealed::Sealed for HeightHook {}
impl sealed::Sealed for SizeHook {}

impl Hook for HeightHook {
    const TRACKS_SIZE: bool = false;

    #[inline]
    fn refresh(node: &mut Stats, left: Stats, right: Stats) {
        node.height = 1 + left.height.max(right.height);
    }
}

impl Hook for SizeHook {
    const TRACKS_SIZE: bool = true;

    #[inline]
    fn refresh(node: &mut Stats, left: Stats, right: Stats) {
        node.height = 1 + left.height.max(right.height);
        node.size = 1 + left.size + right.size;
    }
}
