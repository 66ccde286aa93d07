use btree_index::BTree;
use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
enum Operation {
    Insert(i32),
    Delete(i32),
}

fn arb_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => (-200i32..200).prop_map(Operation::Insert),
        2 => (-200i32..200).prop_map(Operation::Delete),
    ]
}

proptest! {
    #[test]
    fn prop_invariants_hold_after_every_operation(
        degree in 2usize..=6,
        ops in prop::collection::vec(arb_operation(), 1..300),
    ) {
        let mut tree = BTree::new(degree).unwrap();
        let mut population = 0usize;

        for op in ops {
            match op {
                Operation::Insert(key) => {
                    tree.insert(key);
                    population += 1;
                }
                Operation::Delete(key) => {
                    if tree.delete(&key) {
                        population -= 1;
                    }
                }
            }
            prop_assert_eq!(tree.validate(), Ok(()));
            prop_assert_eq!(tree.len(), population);
        }
    }

    #[test]
    fn prop_membership(
        degree in 2usize..=6,
        keys in prop::collection::btree_set(-1_000i32..1_000, 0..200),
        lookups in prop::collection::vec(-1_200i32..1_200, 0..50),
    ) {
        let mut tree = BTree::new(degree).unwrap();
        for &key in &keys {
            tree.insert(key);
        }

        for key in &keys {
            prop_assert!(tree.search(key));
        }
        for lookup in &lookups {
            prop_assert_eq!(tree.search(lookup), keys.contains(lookup));
        }
    }

    #[test]
    fn prop_deletion(
        degree in 2usize..=6,
        keys in prop::collection::btree_set(0i32..500, 1..200),
        selector in any::<u64>(),
    ) {
        let mut tree = BTree::new(degree).unwrap();
        tree.extend(keys.iter().copied());

        // Pick a pseudo-random half of the keys to delete
        let (deleted, kept): (BTreeSet<i32>, BTreeSet<i32>) = keys
            .iter()
            .partition(|&&key| (selector.rotate_left(key as u32 % 64) & 1) == 1);

        for key in &deleted {
            prop_assert!(tree.delete(key));
        }
        for key in &deleted {
            prop_assert!(!tree.search(key));
        }
        for key in &kept {
            prop_assert!(tree.search(key));
        }
        prop_assert_eq!(tree.traverse().collect::<BTreeSet<_>>(), kept);
        prop_assert!(tree.check_invariants());
    }

    #[test]
    fn prop_traversal_is_sorted(
        degree in 2usize..=6,
        keys in prop::collection::vec(-50i32..50, 0..300),
    ) {
        let mut tree = BTree::new(degree).unwrap();
        tree.extend(keys.iter().copied());

        let traversed: Vec<i32> = tree.traverse().collect();
        let mut expected = keys.clone();
        expected.sort_unstable();

        prop_assert_eq!(traversed.len(), tree.len());
        prop_assert_eq!(traversed, expected);
    }

    #[test]
    fn prop_height_bound(
        degree in 2usize..=8,
        keys in prop::collection::vec(any::<i32>(), 1..1_000),
    ) {
        let mut tree = BTree::new(degree).unwrap();
        tree.extend(keys.iter().copied());

        let n = keys.len() as f64;
        let bound = ((n + 1.0) / 2.0).ln() / (degree as f64).ln();
        prop_assert!(
            tree.height() as f64 <= bound + 1e-9,
            "height {} exceeds bound {} for n={} t={}",
            tree.height(),
            bound,
            keys.len(),
            degree
        );
    }
}
