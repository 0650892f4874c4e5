//! Model-based equivalence checking against a sorted `Vec`.
//!
//! Used by the property tests and by the `multiset_equivalence` fuzz target.

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};

use crate::{KeyNotFound, SizeAvlTree};

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    /// Picks a key already in the model, so that duplicates and hits are common.
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue),
    Delete(ItemValue),
    Find(ItemValue),
    FindMin,
    NextLarger(ItemValue),
    Rank(ItemValue),
    Select(usize),
    Count(ItemValue, ItemValue),
    List(ItemValue, ItemValue),
}

impl Op {
    fn finalize(self, sorted: &[u32]) -> FinalOp {
        fn get_value(v: &[u32], i: ItemValue) -> u32 {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as u32
                    } else {
                        v[idx % v.len()]
                    }
                }
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Insert(item) => FinalOp::Insert(get_value(sorted, item)),
            Op::Delete(item) => FinalOp::Delete(get_value(sorted, item)),
            Op::Find(item) => FinalOp::Find(get_value(sorted, item)),
            Op::FindMin => FinalOp::FindMin,
            Op::NextLarger(item) => FinalOp::NextLarger(get_value(sorted, item)),
            Op::Rank(item) => FinalOp::Rank(get_value(sorted, item)),
            Op::Select(index) => FinalOp::Select(index % (sorted.len() + 1)),
            Op::Count(low, high) => FinalOp::Count(get_value(sorted, low), get_value(sorted, high)),
            Op::List(low, high) => FinalOp::List(get_value(sorted, low), get_value(sorted, high)),
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(u32),
    Delete(u32),
    Find(u32),
    FindMin,
    NextLarger(u32),
    Rank(u32),
    Select(usize),
    Count(u32, u32),
    List(u32, u32),
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        4 => value_strategy().prop_map(Op::Insert),
        2 => value_strategy().prop_map(Op::Delete),
        1 => value_strategy().prop_map(Op::Find),
        1 => Just(Op::FindMin),
        1 => value_strategy().prop_map(Op::NextLarger),
        1 => value_strategy().prop_map(Op::Rank),
        1 => (0usize..1000).prop_map(Op::Select),
        1 => (value_strategy(), value_strategy()).prop_map(|(low, high)| Op::Count(low, high)),
        1 => (value_strategy(), value_strategy()).prop_map(|(low, high)| Op::List(low, high)),
    ]
}

/// Applies `ops` to both a [`SizeAvlTree`] and a sorted `Vec` holding the same multiset, panicking
/// on the first disagreement or broken invariant.
pub fn run_multiset_equivalence(ops: Vec<Op>) {
    let mut sorted_values: Vec<u32> = Vec::with_capacity(ops.len());
    let mut tree: SizeAvlTree<u32> = SizeAvlTree::new();

    // Number of values `<= value`, which is also where an equal value is inserted.
    fn upper_bound(v: &[u32], value: u32) -> usize {
        v.partition_point(|&x| x <= value)
    }

    fn lower_bound(v: &[u32], value: u32) -> usize {
        v.partition_point(|&x| x < value)
    }

    for (op_id, op) in ops.into_iter().enumerate() {
        let final_op = op.finalize(&sorted_values);

        match final_op {
            FinalOp::Insert(value) => {
                let idx = upper_bound(&sorted_values, value);
                sorted_values.insert(idx, value);
                tree.insert(value);
            }

            FinalOp::Delete(value) => {
                let from_model = match sorted_values.binary_search(&value) {
                    Ok(idx) => Ok(sorted_values.remove(idx)),
                    Err(_) => Err(KeyNotFound),
                };
                let from_tree = tree.delete(&value);

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Find(value) => {
                let from_model = sorted_values.binary_search(&value).ok().map(|_| value);
                let from_tree = tree.find(&value).map(|node| *node.key());

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::FindMin => {
                let from_model = sorted_values.first().copied();
                let from_tree = tree.find_min().map(|node| *node.key());

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::NextLarger(value) => {
                let from_model = sorted_values
                    .binary_search(&value)
                    .ok()
                    .and_then(|_| sorted_values.get(upper_bound(&sorted_values, value)))
                    .copied();
                let from_tree = tree.next_larger(&value).map(|node| *node.key());

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Rank(value) => {
                let from_model = upper_bound(&sorted_values, value);
                let from_tree = tree.rank(&value);

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Select(index) => {
                let from_model = sorted_values.get(index);
                let from_tree = tree.select(index);

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Count(low, high) => {
                let from_model = if low > high {
                    0
                } else {
                    upper_bound(&sorted_values, high) - lower_bound(&sorted_values, low)
                };
                let from_tree = tree.count(&low, &high);

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
                assert_eq!(from_tree, tree.list(&low, &high).len());
            }

            FinalOp::List(low, high) => {
                let from_model: Vec<&u32> = sorted_values
                    .iter()
                    .filter(|&&x| low <= x && x <= high)
                    .collect();
                let from_tree = tree.list(&low, &high);

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }
        }

        if let Err(violation) = tree.check_representation_invariant() {
            panic!("FinalOp #{op_id}: {final_op:?}: {violation}");
        }
        assert_eq!(sorted_values.len(), tree.len());
        assert!(sorted_values.iter().eq(tree.iter()));
    }
}
