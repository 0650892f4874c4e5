use std::ops::Range;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::model;

use super::*;

fn check<K: Ord, H: Hook>(tree: &Tree<K, H>) {
    if let Err(violation) = tree.check_representation_invariant() {
        panic!("{violation}");
    }
}

fn keys<K: Copy>(list: Vec<&K>) -> Vec<K> {
    list.into_iter().copied().collect()
}

// 23, 8, 4, 16, 15, 42 inserted in that order.
fn sample_tree() -> SizeAvlTree<u32> {
    let mut tree: SizeAvlTree<u32> = SizeAvlTree::new();

    for (i, key) in [23, 8, 4, 16, 15, 42].into_iter().enumerate() {
        tree.insert(key);
        check(&tree);
        assert_eq!(tree.len(), i + 1);
    }

    tree
}

fn insert_find_all<H: Hook>(keys: &[u32]) {
    let mut tree: Tree<u32, H> = Tree::new();

    for &key in keys {
        tree.insert(key);
        check(&tree);
    }

    for key in keys {
        let node = tree.find(key).expect("item not found");
        assert_eq!(node.key(), key);
    }
}

fn insert_delete_all<H: Hook>(keys: &[u32]) {
    let mut tree: Tree<u32, H> = Tree::new();

    for &key in keys {
        tree.insert(key);
        check(&tree);
    }

    for key in keys {
        assert_eq!(tree.delete(key), Ok(*key));
        check(&tree);
    }
    assert!(tree.is_empty());

    for &key in keys {
        tree.insert(key);
        check(&tree);
    }

    for key in keys.iter().rev() {
        assert_eq!(tree.delete(key), Ok(*key));
        check(&tree);
    }
    assert!(tree.is_empty());
}

fn permutations(n: u32) -> Vec<Vec<u32>> {
    if n == 0 {
        return vec![vec![]];
    }

    let mut out = Vec::new();
    for perm in permutations(n - 1) {
        for i in 0..=perm.len() {
            let mut p = perm.clone();
            p.insert(i, n - 1);
            out.push(p);
        }
    }
    out
}

#[test]
fn zero_elems_find() {
    insert_find_all::<HeightHook>(&[]);
    insert_find_all::<SizeHook>(&[]);
}

#[test]
fn small_permutations_find() {
    for n in 1..=6 {
        for perm in permutations(n) {
            insert_find_all::<HeightHook>(&perm);
            insert_find_all::<SizeHook>(&perm);
        }
    }
}

#[test]
fn small_permutations_delete() {
    for n in 1..=6 {
        for perm in permutations(n) {
            insert_delete_all::<HeightHook>(&perm);
            insert_delete_all::<SizeHook>(&perm);
        }
    }
}

#[test]
fn ascending_inserts_stay_balanced() {
    let tree: SizeAvlTree<u32> = (0..1024).collect();
    check(&tree);

    // log2(1024) = 10, and an AVL tree is never more than ~1.44 times taller than that.
    assert!((10..=14).contains(&tree.height()), "height {}", tree.height());
    assert_eq!(tree.root().map(|root| root.size()), Some(1024));
}

#[test]
fn find_missing() {
    let mut tree: SizeAvlTree<u32> = SizeAvlTree::new();
    assert!(tree.find(&3).is_none());

    tree.insert(4);
    assert!(tree.find(&3).is_none());
    assert!(!tree.contains(&3));
    assert!(tree.contains(&4));
}

#[test]
fn insert_duplicates() {
    let mut tree: SizeAvlTree<u32> = SizeAvlTree::new();

    for (key, rank_of_5) in [(5, 1), (3, 2), (4, 3), (4, 4)] {
        tree.insert(key);
        check(&tree);
        assert_eq!(tree.find(&key).map(|node| *node.key()), Some(key));
        assert_eq!(tree.rank(&5), rank_of_5);
    }

    assert_eq!(tree.rank(&3), 1);
    assert_eq!(tree.rank(&4), 3);
    assert_eq!(tree.count(&4, &4), 2);
    assert_eq!(keys(tree.list(&0, &10)), [3, 4, 4, 5]);
    assert_eq!(tree.next_larger(&4).map(|node| *node.key()), Some(5));

    assert_eq!(tree.delete(&4), Ok(4));
    check(&tree);
    assert_eq!(tree.count(&4, &4), 1);
    assert!(tree.contains(&4));
}

#[test]
fn sample_ranks() {
    let tree = sample_tree();

    for (key, rank) in [(23, 5), (8, 2), (4, 1), (16, 4), (15, 3), (42, 6)] {
        assert_eq!(tree.rank(&key), rank, "rank({key})");
        assert_eq!(tree.select(rank - 1), Some(&key), "select({})", rank - 1);
    }

    assert_eq!(tree.rank(&3), 0);
    assert_eq!(tree.rank(&43), 6);
    assert_eq!(tree.rank(&20), 4);
    assert_eq!(tree.select(6), None);
}

#[test]
fn sample_count() {
    let tree = sample_tree();

    let cases = [
        ((4, 42), 6),
        ((3, 42), 6),
        ((4, 43), 6),
        ((3, 43), 6),
        ((15, 23), 3),
        ((14, 23), 3),
        ((15, 24), 3),
        ((14, 24), 3),
        ((16, 50), 3),
        ((41, 43), 1),
        ((42, 43), 1),
        ((41, 42), 1),
        ((24, 41), 0),
        ((1, 16), 4),
        ((3, 5), 1),
        ((4, 5), 1),
        ((3, 4), 1),
        ((5, 7), 0),
        ((14, 14), 0),
        ((16, 16), 1),
        ((16, 15), 0),
        ((16, 10), 0),
        ((20, 15), 0),
    ];

    for ((low, high), count) in cases {
        assert_eq!(tree.count(&low, &high), count, "count({low}, {high})");
        assert_eq!(tree.list(&low, &high).len(), count, "list({low}, {high})");
    }
}

#[test]
fn sample_list() {
    let tree = sample_tree();

    assert_eq!(keys(tree.list(&4, &42)), [4, 8, 15, 16, 23, 42]);
    assert_eq!(keys(tree.list(&3, &43)), [4, 8, 15, 16, 23, 42]);
    assert_eq!(keys(tree.list(&15, &23)), [15, 16, 23]);
    assert_eq!(keys(tree.list(&14, &24)), [15, 16, 23]);
    assert_eq!(keys(tree.list(&16, &50)), [16, 23, 42]);
    assert_eq!(keys(tree.list(&41, &43)), [42]);
    assert_eq!(keys(tree.list(&1, &16)), [4, 8, 15, 16]);
    assert_eq!(keys(tree.list(&3, &5)), [4]);
    assert_eq!(keys(tree.list(&16, &16)), [16]);

    assert!(tree.list(&24, &41).is_empty());
    assert!(tree.list(&5, &7).is_empty());
    assert!(tree.list(&14, &14).is_empty());
    assert!(tree.list(&16, &15).is_empty());
    assert!(tree.list(&20, &15).is_empty());
}

#[test]
fn sample_range_lca() {
    let tree = sample_tree();

    for (low, high) in [(4, 42), (15, 23), (1, 16), (41, 43), (16, 16)] {
        let lca = tree.range_lca(&low, &high).expect("range is not empty");
        let key = *lca.key();
        assert!(low <= key && key <= high);

        // All in-range keys live under the split node, and its parent is out of range.
        assert!(lca.size() >= tree.count(&low, &high));
        if let Some(parent) = lca.parent() {
            assert!(*parent.key() < low || *parent.key() > high);
        }
    }

    assert!(tree.range_lca(&24, &41).is_none());
}

#[test]
fn sample_next_larger() {
    let tree = sample_tree();

    assert_eq!(tree.next_larger(&8).map(|node| *node.key()), Some(15));
    assert_eq!(tree.next_larger(&16).map(|node| *node.key()), Some(23));
    assert_eq!(tree.next_larger(&23).map(|node| *node.key()), Some(42));
    assert!(tree.next_larger(&42).is_none());
    assert!(tree.next_larger(&20).is_none());
}

#[test]
fn sample_find_min() {
    let mut tree: SizeAvlTree<u32> = SizeAvlTree::new();
    assert!(tree.find_min().is_none());

    tree.insert(5);
    assert_eq!(tree.find_min().map(|node| *node.key()), Some(5));

    let tree = sample_tree();
    assert_eq!(tree.find_min().map(|node| *node.key()), Some(4));
    assert_eq!(tree.find_max().map(|node| *node.key()), Some(42));
}

#[test]
fn delete_leaf() {
    let mut tree = sample_tree();

    assert_eq!(tree.delete(&15), Ok(15));
    check(&tree);
    assert!(tree.find(&15).is_none());

    for (key, rank) in [(23, 4), (8, 2), (4, 1), (16, 3), (42, 5)] {
        assert_eq!(tree.rank(&key), rank, "rank({key})");
    }
}

#[test]
fn delete_one_child() {
    let mut tree = sample_tree();

    // 23 has only a right child, 42.
    assert_eq!(tree.delete(&23), Ok(23));
    check(&tree);
    assert!(tree.find(&23).is_none());

    for (key, rank) in [(8, 2), (4, 1), (16, 4), (15, 3), (42, 5)] {
        assert_eq!(tree.rank(&key), rank, "rank({key})");
    }
}

#[test]
fn delete_two_children() {
    let mut tree = sample_tree();

    assert_eq!(tree.delete(&8), Ok(8));
    check(&tree);
    assert!(tree.find(&8).is_none());

    for (key, rank) in [(23, 4), (4, 1), (16, 3), (15, 2), (42, 5)] {
        assert_eq!(tree.rank(&key), rank, "rank({key})");
    }
}

#[test]
fn delete_root() {
    let mut tree = sample_tree();
    assert_eq!(tree.root().map(|root| *root.key()), Some(16));

    assert_eq!(tree.delete(&16), Ok(16));
    check(&tree);
    assert!(tree.find(&16).is_none());
    assert_eq!(tree.find(&42).map(|node| *node.key()), Some(42));
    assert_eq!(tree.len(), 5);

    for (key, rank) in [(23, 4), (8, 2), (4, 1), (15, 3), (42, 5)] {
        assert_eq!(tree.rank(&key), rank, "rank({key})");
    }
}

#[test]
fn delete_missing() {
    let mut tree = sample_tree();

    assert_eq!(tree.delete(&17), Err(KeyNotFound));
    check(&tree);
    assert_eq!(tree.len(), 6);

    let mut empty: AvlTree<u32> = AvlTree::new();
    assert_eq!(empty.delete(&1), Err(KeyNotFound));
}

#[test]
fn delete_last_node() {
    let mut tree: SizeAvlTree<u32> = SizeAvlTree::new();

    tree.insert(1);
    assert_eq!(tree.delete(&1), Ok(1));
    check(&tree);
    assert!(tree.is_empty());
    assert!(tree.find_min().is_none());
    assert_eq!(tree.height(), -1);

    tree.insert(2);
    check(&tree);
    assert_eq!(tree.rank(&2), 1);
}

#[test]
fn insert_delete_round_trip() {
    let mut tree = sample_tree();

    for key in [0, 15, 16, 100] {
        tree.insert(key);
        check(&tree);
        assert_eq!(tree.len(), 7);

        assert_eq!(tree.delete(&key), Ok(key));
        check(&tree);
        assert_eq!(tree.len(), 6);
    }

    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [4, 8, 15, 16, 23, 42]);
}

#[test]
fn node_links() {
    let tree = sample_tree();
    let root = tree.root().expect("tree is not empty");

    assert!(root.parent().is_none());
    assert_eq!(root.size(), 6);
    assert_eq!(root.height(), tree.height());

    for child in [root.left(), root.right()].into_iter().flatten() {
        let parent = child.parent().expect("child has a parent");
        assert_eq!(parent.key(), root.key());
        assert!(child.height() < root.height());
    }

    let mut walked = Vec::new();
    let mut cur = tree.find_min();
    while let Some(node) = cur {
        walked.push(*node.key());
        cur = node.successor();
    }
    assert_eq!(walked, [4, 8, 15, 16, 23, 42]);
}

#[test]
fn plain_tree_skips_size() {
    let mut tree: AvlTree<u32> = (0..100).collect();
    check(&tree);

    for key in (0..100).step_by(3) {
        assert_eq!(tree.delete(&key), Ok(key));
        check(&tree);
    }

    assert_eq!(tree.len(), 66);
    assert_eq!(keys(tree.list(&10, &15)), [10, 11, 13, 14]);
}

#[test]
fn invariant_checker_catches_stale_height() {
    let mut tree = sample_tree();
    let root = tree.root.expect("tree is not empty");
    tree.node_mut(root).stats.height += 1;

    assert!(matches!(
        tree.check_representation_invariant(),
        Err(InvariantViolation::StaleHeight { .. })
    ));
}

#[test]
fn invariant_checker_catches_stale_size() {
    let mut tree = sample_tree();
    let min = tree.min_in_subtree(tree.root.expect("tree is not empty"));
    tree.node_mut(min).stats.size = 7;

    assert_eq!(
        tree.check_representation_invariant(),
        Err(InvariantViolation::StaleSize {
            cached: 7,
            actual: 1
        })
    );
}

#[test]
fn invariant_checker_catches_misordering() {
    let mut tree = sample_tree();
    let min = tree.min_in_subtree(tree.root.expect("tree is not empty"));
    tree.node_mut(min).key = 1000;

    assert_eq!(
        tree.check_representation_invariant(),
        Err(InvariantViolation::Ordering)
    );
}

#[test]
fn invariant_checker_catches_imbalance() {
    // Raw insertions skip rebalancing, so ascending keys build a right spine.
    let mut tree: AvlTree<u32> = AvlTree::new();
    let mut last = None;
    for key in 0..3 {
        last = Some(tree.insert_raw(key));
    }

    let mut opt_cur = last;
    while let Some(cur) = opt_cur {
        tree.refresh(cur);
        opt_cur = tree.node(cur).parent;
    }

    assert_eq!(
        tree.check_representation_invariant(),
        Err(InvariantViolation::Unbalanced { difference: -2 })
    );
}

#[test]
fn clear_and_reuse() {
    let mut tree = sample_tree();
    tree.clear();
    check(&tree);
    assert!(tree.is_empty());
    assert!(tree.iter().next().is_none());

    tree.extend([3, 1, 2]);
    check(&tree);
    assert_eq!(format!("{tree:?}"), "[1, 2, 3]");
}

#[test]
fn iter_is_exact_size() {
    let tree = sample_tree();
    let mut iter = tree.iter();

    assert_eq!(iter.len(), 6);
    iter.next();
    assert_eq!(iter.len(), 5);
    assert_eq!(iter.copied().collect::<Vec<_>>(), [8, 15, 16, 23, 42]);
}

#[test]
fn dotgraph_lists_every_node() {
    let tree = sample_tree();
    let mut out = String::new();
    tree.dotgraph("sample", &mut out)
        .expect("writing to a String cannot fail");

    assert!(out.starts_with("digraph \"graph-sample\""));
    for key in [4, 8, 15, 16, 23, 42] {
        assert!(out.contains(&format!("[label=\"{key}:")), "{key} missing from\n{out}");
    }

    let mut out = String::new();
    AvlTree::<u32>::new()
        .dotgraph("empty", &mut out)
        .expect("writing to a String cannot fail");
    assert_eq!(out, "digraph \"graph-empty\" {}");
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..1000;

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn multiset_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_multiset_equivalence(ops);
    }

    #[test]
    fn rank_is_monotonic(
        keys in proptest::collection::vec(0u32..100, 0..200),
        a in 0u32..120,
        b in 0u32..120,
    ) {
        let tree: SizeAvlTree<u32> = keys.iter().copied().collect();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };

        prop_assert!(tree.rank(&low) <= tree.rank(&high));
        prop_assert_eq!(tree.count(&low, &high), tree.list(&low, &high).len());

        if let Some(min) = tree.find_min() {
            prop_assert_eq!(tree.rank(min.key()), keys.iter().filter(|&&k| k == *min.key()).count());
            if *min.key() > 0 {
                prop_assert_eq!(tree.rank(&(*min.key() - 1)), 0);
            }
        }
    }

    #[test]
    fn plain_tree_stays_balanced(
        inserts in proptest::collection::vec(0u32..64, 0..300),
        deletes in proptest::collection::vec(0u32..64, 0..300),
    ) {
        let mut tree: AvlTree<u32> = AvlTree::new();

        for key in inserts {
            tree.insert(key);
            prop_assert_eq!(tree.check_representation_invariant(), Ok(()));
        }

        for key in deletes {
            let had = tree.contains(&key);
            prop_assert_eq!(tree.delete(&key).is_ok(), had);
            prop_assert_eq!(tree.check_representation_invariant(), Ok(()));
        }
    }
}
