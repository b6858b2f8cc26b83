//! End-to-end tests for the aggregation engine.
//!
//! Covers the weighted branching scenarios, the clickstream cube, signed
//! retraction, parallel merge determinism, and the algebraic laws checked
//! by handle identity.

use treecube::aggregate;
use treecube::number::ZddNumber;
use treecube::store::ZddStore;
use treecube::tree::Tree;
use treecube::QueryError;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn count(store: &ZddStore, acc: &ZddNumber, query: &Tree) -> i64 {
    aggregate::count_trees(store, query, acc).unwrap()
}

// ─── Branching scenarios ───────────────────────────────────────────────────────

#[test]
fn branching_sum_weight_one() {
    let store = ZddStore::new();
    let acc = aggregate::sum_subtrees(
        &store,
        [
            (1, Tree::cross([Tree::path(["a", "b"]), Tree::path(["a", "c"])])),
            (1, Tree::cross([Tree::path(["a", "b"]), Tree::path(["a", "d"])])),
        ],
    );

    assert_eq!(count(&store, &acc, &Tree::path(["a"])), 2);
    assert_eq!(count(&store, &acc, &Tree::path(["a", "b"])), 2);
    assert_eq!(count(&store, &acc, &Tree::path(["a", "c"])), 1);
    assert_eq!(count(&store, &acc, &Tree::path(["a", "d"])), 1);
    assert_eq!(
        count(
            &store,
            &acc,
            &Tree::cross([Tree::path(["a", "b"]), Tree::path(["a", "c"])])
        ),
        1
    );
    assert_eq!(
        count(
            &store,
            &acc,
            &Tree::cross([Tree::path(["a", "b"]), Tree::path(["a", "d"])])
        ),
        1
    );
}

#[test]
fn weighted_branching() {
    let store = ZddStore::new();
    let acc = aggregate::sum_subtrees(
        &store,
        [
            (5, Tree::cross([Tree::path(["a", "b"]), Tree::path(["a", "c"])])),
            (3, Tree::cross([Tree::path(["a", "b"]), Tree::path(["a", "d"])])),
        ],
    );

    assert_eq!(count(&store, &acc, &Tree::path(["a"])), 8);
    assert_eq!(count(&store, &acc, &Tree::path(["a", "b"])), 8);
    assert_eq!(count(&store, &acc, &Tree::path(["a", "c"])), 5);
    assert_eq!(
        count(
            &store,
            &acc,
            &Tree::cross([Tree::path(["a", "b"]), Tree::path(["a", "c"])])
        ),
        5
    );
    assert_eq!(count(&store, &acc, &Tree::path(["a", "d"])), 3);
    assert_eq!(
        count(
            &store,
            &acc,
            &Tree::cross([Tree::path(["a", "b"]), Tree::path(["a", "d"])])
        ),
        3
    );
}

// ─── Clickstream cube ──────────────────────────────────────────────────────────

#[test]
fn clickstream_three_events() {
    let store = ZddStore::new();

    let event = |page: &str, gender: &str, day: &str| {
        Tree::cross([
            Tree::path(["www.company.com", page]),
            Tree::path(["gender", gender]),
            Tree::path(["2014", "01", day]),
        ])
    };

    let acc = aggregate::sum_subtrees(
        &store,
        [
            (1, event("page1", "female", "01")),
            (1, event("page1", "male", "02")),
            (1, event("page2", "female", "02")),
        ],
    );

    assert_eq!(count(&store, &acc, &Tree::path(["www.company.com"])), 3);
    assert_eq!(count(&store, &acc, &Tree::path(["www.company.com", "page1"])), 2);
    assert_eq!(count(&store, &acc, &Tree::path(["2014", "01"])), 3);
    assert_eq!(count(&store, &acc, &Tree::path(["gender", "female"])), 2);
    assert_eq!(
        count(
            &store,
            &acc,
            &Tree::cross([Tree::path(["gender", "female"]), Tree::path(["2014", "01"])])
        ),
        2
    );
    assert_eq!(
        count(
            &store,
            &acc,
            &Tree::cross([
                Tree::path(["gender", "female"]),
                Tree::path(["2014", "01", "02"])
            ])
        ),
        1
    );

    // Cross-dimension slices not present in any event count zero.
    assert_eq!(
        count(
            &store,
            &acc,
            &Tree::cross([
                Tree::path(["gender", "male"]),
                Tree::path(["2014", "01", "01"])
            ])
        ),
        0
    );
}

// ─── Signed weights ────────────────────────────────────────────────────────────

#[test]
fn subtraction_retracts_to_nil() {
    let store = ZddStore::new();
    let t = Tree::path(["a", "b"]);

    let acc = aggregate::subtrees(&store, 5, &t);
    let retracted = aggregate::sub(&store, &acc, &aggregate::subtrees(&store, 5, &t));

    assert!(retracted.is_nil());
    assert_eq!(retracted, ZddNumber::nil());
}

#[test]
fn negation_cancels() {
    let store = ZddStore::new();
    let z = aggregate::subtrees(&store, 9, &Tree::path(["a"]));
    let neg = aggregate::sub(&store, &ZddNumber::nil(), &z);
    assert!(aggregate::add(&store, &z, &neg).is_nil());
}

#[test]
fn extreme_weights_count_exactly() {
    let store = ZddStore::new();
    let t = Tree::path(["a"]);

    for w in [i64::MAX, i64::MIN, i64::MIN + 1, 1i64 << 62] {
        let acc = aggregate::subtrees(&store, w, &t);
        assert_eq!(count(&store, &acc, &t), w, "weight {}", w);
        assert_eq!(count(&store, &acc, &Tree::top()), w, "weight {}", w);
    }

    // An extreme weight still cancels exactly.
    let acc = aggregate::sum_subtrees(&store, [(i64::MAX, t.clone()), (-i64::MAX, t.clone())]);
    assert!(acc.is_nil());
}

#[test]
fn negative_counts_are_signed() {
    let store = ZddStore::new();
    let acc = aggregate::sum_subtrees(
        &store,
        [(2, Tree::path(["a"])), (-5, Tree::path(["a"]))],
    );
    assert_eq!(count(&store, &acc, &Tree::path(["a"])), -3);
}

// ─── Aggregation laws ──────────────────────────────────────────────────────────

#[test]
fn add_is_associative_and_commutative() {
    let store = ZddStore::new();
    let z1 = aggregate::subtrees(&store, 3, &Tree::path(["a", "b"]));
    let z2 = aggregate::subtrees(&store, -7, &Tree::path(["a", "c"]));
    let z3 = aggregate::subtrees(&store, 11, &Tree::cross([Tree::path(["a"]), Tree::path(["d"])]));

    assert_eq!(
        aggregate::add(&store, &z1, &z2),
        aggregate::add(&store, &z2, &z1)
    );
    assert_eq!(
        aggregate::add(&store, &aggregate::add(&store, &z1, &z2), &z3),
        aggregate::add(&store, &z1, &aggregate::add(&store, &z2, &z3))
    );
    assert_eq!(aggregate::add(&store, &z1, &ZddNumber::nil()), z1);
}

#[test]
fn linearity_in_the_weight() {
    let store = ZddStore::new();
    let t = Tree::cross([Tree::path(["a", "b"]), Tree::path(["a", "c"])]);
    let unit = aggregate::subtrees(&store, 1, &t);

    for w in [-13i64, -1, 0, 2, 42] {
        let weighted = aggregate::subtrees(&store, w, &t);
        for query in [
            Tree::path(["a"]),
            Tree::path(["a", "b"]),
            Tree::cross([Tree::path(["a", "b"]), Tree::path(["a", "c"])]),
        ] {
            assert_eq!(
                count(&store, &weighted, &query),
                w * count(&store, &unit, &query),
                "weight {}",
                w
            );
        }
    }
}

#[test]
fn counts_distribute_over_merge() {
    let store = ZddStore::new();
    let z1 = aggregate::sum_subtrees(
        &store,
        [(2, Tree::path(["a", "b"])), (3, Tree::path(["c"]))],
    );
    let z2 = aggregate::sum_subtrees(
        &store,
        [(-1, Tree::path(["a", "b"])), (7, Tree::path(["d"]))],
    );
    let merged = aggregate::merge(&store, &z1, &z2);

    for query in [
        Tree::path(["a"]),
        Tree::path(["a", "b"]),
        Tree::path(["c"]),
        Tree::path(["d"]),
        Tree::path(["nowhere"]),
    ] {
        assert_eq!(
            count(&store, &merged, &query),
            count(&store, &z1, &query) + count(&store, &z2, &query)
        );
    }
}

#[test]
fn subtree_membership() {
    let store = ZddStore::new();
    let t = Tree::cross([Tree::path(["a", "b", "c"]), Tree::path(["x", "y"])]);
    let acc = aggregate::subtrees(&store, 1, &t);

    // Every prefix combination is a subtree.
    for query in [
        Tree::top(),
        Tree::path(["a"]),
        Tree::path(["a", "b"]),
        Tree::path(["a", "b", "c"]),
        Tree::path(["x"]),
        Tree::cross([Tree::path(["a", "b"]), Tree::path(["x", "y"])]),
    ] {
        assert!(count(&store, &acc, &query) >= 1);
    }

    // Trees that are not subtrees count zero.
    for query in [
        Tree::path(["b"]),
        Tree::path(["a", "c"]),
        Tree::path(["x", "y", "z"]),
    ] {
        assert_eq!(count(&store, &acc, &query), 0);
    }
}

#[test]
fn non_singleton_queries_are_rejected() {
    let store = ZddStore::new();
    let acc = aggregate::sum_subtrees(&store, [(1, Tree::path(["a"]))]);

    assert_eq!(
        aggregate::count_trees(&store, &Tree::bot(), &acc),
        Err(QueryError::NonSingletonQuery { sets: 0 })
    );
    assert_eq!(
        aggregate::count_trees(
            &store,
            &Tree::sum([Tree::path(["a"]), Tree::path(["b"])]),
            &acc
        ),
        Err(QueryError::NonSingletonQuery { sets: 2 })
    );
}

// ─── Parallel reduction ────────────────────────────────────────────────────────

fn random_path(rng: &mut ChaCha8Rng) -> Tree {
    let labels = ["a", "b", "c", "d", "e", "f"];
    let depth = rng.gen_range(1..=3);
    let segs: Vec<&str> = (0..depth).map(|_| labels[rng.gen_range(0..labels.len())]).collect();
    Tree::path(segs)
}

fn random_observation(rng: &mut ChaCha8Rng) -> (i64, Tree) {
    let parts = rng.gen_range(1..=3);
    let mut paths = Vec::with_capacity(parts);
    for _ in 0..parts {
        paths.push(random_path(rng));
    }
    let weight = rng.gen_range(-5..=5);
    (weight, Tree::cross(paths))
}

#[test]
fn merge_order_is_immaterial() {
    let store = ZddStore::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0xC0FFEE);
    let observations: Vec<(i64, Tree)> = (0..1000).map(|_| random_observation(&mut rng)).collect();

    let sequential = aggregate::sum_subtrees(&store, observations.clone());

    // Reversed fold.
    let mut reversed = observations.clone();
    reversed.reverse();
    assert_eq!(aggregate::sum_subtrees(&store, reversed), sequential);

    // Parallel chunked fold, merged in two different shapes.
    let partials: Vec<ZddNumber> = std::thread::scope(|scope| {
        let workers: Vec<_> = observations
            .chunks(125)
            .map(|chunk| {
                let chunk = chunk.to_vec();
                let store = &store;
                scope.spawn(move || aggregate::sum_subtrees(store, chunk))
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    let left_fold = partials
        .iter()
        .fold(ZddNumber::nil(), |acc, z| aggregate::merge(&store, &acc, z));
    assert_eq!(left_fold, sequential);

    let mut layer = partials;
    while layer.len() > 1 {
        layer = layer
            .chunks(2)
            .map(|pair| match pair {
                [a, b] => aggregate::merge(&store, a, b),
                [a] => a.clone(),
                _ => unreachable!(),
            })
            .collect();
    }
    assert_eq!(layer.pop().unwrap(), sequential);
}

// ─── Structural soundness ──────────────────────────────────────────────────────

#[test]
fn store_invariants_hold_after_workload() {
    let store = ZddStore::new();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let observations: Vec<(i64, Tree)> = (0..200).map(|_| random_observation(&mut rng)).collect();

    let acc = aggregate::sum_subtrees(&store, observations);
    let _ = count(&store, &acc, &Tree::path(["a"]));
    let _ = aggregate::sub(&store, &acc, &acc);

    assert_eq!(store.validate(), Ok(()));
}
