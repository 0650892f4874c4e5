use thiserror::Error;

/// Returned by [`Tree::delete`](crate::Tree::delete) when no node holds the requested key.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("key not found")]
pub struct KeyNotFound;

/// A broken representation invariant, reported by
/// [`Tree::check_representation_invariant`](crate::Tree::check_representation_invariant).
///
/// Any of these indicates a bug in this crate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("the root node has a parent link")]
    RootHasParent,

    #[error("a child's parent link does not point back at its parent")]
    BrokenParentLink,

    #[error("a key is out of order with respect to its ancestor")]
    Ordering,

    #[error("subtree heights differ by {difference}")]
    Unbalanced { difference: i32 },

    #[error("cached height is {cached}, recomputed height is {actual}")]
    StaleHeight { cached: i32, actual: i32 },

    #[error("cached size is {cached}, recomputed size is {actual}")]
    StaleSize { cached: usize, actual: usize },

    #[error("{reachable} nodes are reachable from the root, but {stored} are stored")]
    NodeCount { reachable: usize, stored: usize },
}
