//! Randomized property testing against spec.md §8's testable properties,
//! mirroring the structure (seeded `SmallRng`, a fixed iteration count, an
//! `_once(verbose, iterations)` driver with a `#[test]` wrapper and an
//! `#[ignore]`d "forever" variant) of `content-tree/tests/fuzzer.rs`.

use std::collections::HashSet;

use rand::prelude::*;

use banana_tree::prelude::*;

/// Builds a sequence of `len` distinct values by shuffling a permutation of
/// `0..len` - general position (spec.md §6, §8: "no two sample values are
/// exactly equal") holds by construction, not by chance.
fn random_sequence(rng: &mut SmallRng, len: usize) -> SampleList {
    let mut values: Vec<f64> = (0..len).map(|i| i as f64).collect();
    values.shuffle(rng);
    let mut list = SampleList::new();
    for v in values {
        list.push(v);
    }
    list
}

fn assert_structural_invariants<S: Sign, I: SampleItem>(tree: &BananaTree<S, I>) {
    let mut stack = vec![tree.special_root()];
    let mut seen = HashSet::new();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        let node = tree.node(id);
        if node.is_leaf(id) {
            assert_eq!(node.low(), Some(id));
            let death = node.death().expect("leaf has a death");
            assert_eq!(tree.node(death).low(), Some(id));
            assert_eq!(node.up(), None);
            assert_eq!(node.down(), None);
        } else if node.is_special_root(id) {
            assert_eq!(node.low(), Some(id));
            assert_eq!(node.up(), None);
            assert_eq!(node.down(), None);
        } else {
            let low = node.low().expect("internal node has low set after construction");
            assert_eq!(tree.node(low).death(), Some(id));
            if let Some(in_id) = node.in_node() {
                stack.push(in_id);
            }
            if let Some(mid_id) = node.mid_node() {
                stack.push(mid_id);
            }
        }
    }
}

/// Every banana `walk()` yields must be distinct (spec.md §8 property 3).
fn assert_walk_has_no_duplicates<S: Sign, I: SampleItem>(tree: &BananaTree<S, I>) {
    let mut seen = HashSet::new();
    for pair in tree.walk() {
        assert!(seen.insert(pair), "walk revisited banana {pair:?}");
    }
}

/// `string()` must terminate at the special root without cycling forever;
/// bounding the visit count at twice the arena size catches an infinite loop
/// as a normal test failure instead of a hang.
fn assert_string_terminates_at_special_root<S: Sign, I: SampleItem>(tree: &BananaTree<S, I>, items: &I) {
    let mut count = 0usize;
    let mut last = None;
    for id in tree.string(items) {
        last = Some(id);
        count += 1;
        assert!(count < 100_000, "string iterator did not terminate");
    }
    assert_eq!(last, Some(tree.special_root()));
}

fn random_construction_once(verbose: bool, iterations: usize) {
    let mut rng = SmallRng::seed_from_u64(0xBA_4A_4A);

    for i in 0..iterations {
        if verbose || i % 1000 == 0 {
            println!("i {i}");
        }
        let len = rng.gen_range(2..=60);
        let mut list = random_sequence(&mut rng, len);
        let left = list.first().unwrap();
        let right = list.last().unwrap();

        let up: BananaTree<Up, SampleList> = BananaTree::construct(&mut list, left, right);
        let down: BananaTree<Down, SampleList> = BananaTree::construct(&mut list, left, right);

        // Property 1: global extremum.
        let up_max_value = list.value(up.global_max());
        let all_values: Vec<f64> = {
            let mut v = Vec::with_capacity(len);
            let mut cur = Some(left);
            while let Some(h) = cur {
                v.push(list.value(h));
                cur = list.right_neighbor(h);
            }
            v
        };
        assert_eq!(up_max_value, all_values.iter().cloned().fold(f64::MIN, f64::max));
        assert_eq!(
            list.value(down.global_max()),
            all_values.iter().cloned().fold(f64::MAX, f64::min)
        );

        // Property 2: structural invariants on every reachable node.
        assert_structural_invariants(&up);
        assert_structural_invariants(&down);

        // Property 3: walk coverage, no repeated bananas.
        assert_walk_has_no_duplicates(&up);
        assert_walk_has_no_duplicates(&down);
        assert!(up.walk().count() >= 1);
        assert!(down.walk().count() >= 1);

        // Property 4: string coverage/termination.
        assert_string_terminates_at_special_root(&up, &list);
        assert_string_terminates_at_special_root(&down, &list);

        // Property 5: diagram round-trip is independent of construction
        // order - extracting twice from independently-built trees over the
        // same sequence must agree exactly.
        let mut dgm_a = PersistenceDiagram::new();
        diagram::extract(&up, &down, &list, &mut dgm_a);
        let self_diff = PersistenceDiagram::symmetric_difference(&dgm_a, &dgm_a);
        assert_eq!(self_diff, Difference::default());

        let mut list2 = SampleList::new();
        for v in &all_values {
            list2.push(*v);
        }
        let left2 = list2.first().unwrap();
        let right2 = list2.last().unwrap();
        let up2: BananaTree<Up, SampleList> = BananaTree::construct(&mut list2, left2, right2);
        let down2: BananaTree<Down, SampleList> = BananaTree::construct(&mut list2, left2, right2);
        let mut dgm_b = PersistenceDiagram::new();
        diagram::extract(&up2, &down2, &list2, &mut dgm_b);
        let diff = PersistenceDiagram::symmetric_difference(&dgm_a, &dgm_b);
        assert_eq!(diff, Difference::default(), "reconstruction from the same sequence diverged");

        // Property 6: duality - the up-tree's ordinary-or-essential deaths
        // are exactly the domain's up-maxima, each appearing exactly once
        // (invariant 2 pairs every internal max with a unique min), and
        // symmetrically for the down-tree's relative deaths against its own
        // maxima (the domain's minima, under the down sign).
        let mut up_maxima = HashSet::new();
        let mut down_maxima = HashSet::new();
        let mut cur = Some(left);
        while let Some(h) = cur {
            if list.is_maximum::<Up>(h) {
                up_maxima.insert(h);
            }
            if list.is_maximum::<Down>(h) {
                down_maxima.insert(h);
            }
            cur = list.right_neighbor(h);
        }

        let up_deaths: Vec<_> = dgm_a.ordinary().chain(dgm_a.essential()).map(|p| p.death).collect();
        let up_deaths_set: HashSet<_> = up_deaths.iter().copied().collect();
        assert_eq!(up_deaths.len(), up_deaths_set.len(), "an up-tree death repeated across pairs");
        assert_eq!(up_deaths_set, up_maxima, "up-tree pair deaths must be exactly the up-maxima");

        let down_deaths: Vec<_> = dgm_a.relative().map(|p| p.death).collect();
        let down_deaths_set: HashSet<_> = down_deaths.iter().copied().collect();
        assert_eq!(down_deaths.len(), down_deaths_set.len(), "a down-tree death repeated across pairs");
        assert_eq!(down_deaths_set, down_maxima, "down-tree pair deaths must be exactly the down-maxima");
    }
}

#[test]
fn random_construction() {
    random_construction_once(false, 500);
}

#[test]
#[ignore]
fn random_construction_forever() {
    random_construction_once(false, usize::MAX);
}
