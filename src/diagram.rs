//! Persistence diagram extraction: turns a pair of banana trees (one per
//! sign) into birth/death pairs plus the parent arrows that record how
//! bananas nest. Grounded on `persistence_diagram.cpp` (the diagram
//! container and `symmetric_difference`) and
//! `persistence_data_structure::extract_persistence_diagram` in
//! `banana_tree.cpp` (the up-tree/down-tree walk that populates one).

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::item::SampleItem;
use crate::sign::{Down, Up};
use crate::tree::{map_banana_dfs, BananaTree};

/// Which of the diagram's three point classes a pair belongs to, mirroring
/// `persistence_diagram::diagram_type`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DiagramKind {
    /// A banana fully nested within another: an ordinary birth/death pair
    /// of the up-tree.
    Ordinary,
    /// A banana whose death is the special root: the up-tree's global
    /// extremum, paired with the domain's true global maximum rather than
    /// the synthetic special-root item.
    Essential,
    /// Every banana of the down-tree, paired unconditionally (the down-tree
    /// has no essential/ordinary distinction - everything is relative to
    /// the domain's boundary).
    Relative,
}

/// One birth/death pair, ordered by birth then death position along the
/// domain (cached at insertion time, the same order `persistent_pair`'s
/// `operator<` reads directly off the embedded item).
#[derive(Copy, Clone, Debug)]
pub struct PersistentPair<H> {
    pub birth: H,
    pub death: H,
    birth_order: f64,
    death_order: f64,
}

impl<H> PersistentPair<H> {
    fn key(&self) -> (f64, f64) {
        (self.birth_order, self.death_order)
    }
}

impl<H> PartialEq for PersistentPair<H> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl<H> Eq for PersistentPair<H> {}
impl<H> PartialOrd for PersistentPair<H> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<H> Ord for PersistentPair<H> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.birth_order
            .total_cmp(&other.birth_order)
            .then(self.death_order.total_cmp(&other.death_order))
    }
}

#[derive(Copy, Clone, Debug)]
struct Arrow<H> {
    child: PersistentPair<H>,
    parent: PersistentPair<H>,
}

impl<H> PartialEq for Arrow<H> {
    fn eq(&self, other: &Self) -> bool {
        self.child == other.child && self.parent == other.parent
    }
}
impl<H> Eq for Arrow<H> {}
impl<H> PartialOrd for Arrow<H> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<H> Ord for Arrow<H> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.child.cmp(&other.child).then(self.parent.cmp(&other.parent))
    }
}

/// Point counts produced by [`PersistenceDiagram::symmetric_difference`]:
/// how many points, and how many nesting arrows, differ between two
/// diagrams. Mirrors `persistence_diagram::difference`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct Difference {
    pub points: usize,
    pub arrows: usize,
}

/// A persistence diagram: the three point classes plus the arrows recording
/// which banana nests inside which. `H` is a sample item handle (see
/// [`crate::item::SampleItem`]); unlike the rest of the crate this
/// container is not itself generic over a `SampleItem` impl - it only needs
/// handles and the order keys callers hand it, mirroring how the original
/// stores raw item pointers without otherwise depending on the domain list.
pub struct PersistenceDiagram<H: Copy + Eq> {
    birth_pair_map: Vec<(H, PersistentPair<H>)>,
    ordinary_dgm: BTreeSet<PersistentPair<H>>,
    essential_dgm: BTreeSet<PersistentPair<H>>,
    relative_dgm: BTreeSet<PersistentPair<H>>,
    arrow_map: Vec<(H, H)>,
}

impl<H: Copy + Eq> Default for PersistenceDiagram<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Copy + Eq> PersistenceDiagram<H> {
    pub fn new() -> Self {
        PersistenceDiagram {
            birth_pair_map: Vec::new(),
            ordinary_dgm: BTreeSet::new(),
            essential_dgm: BTreeSet::new(),
            relative_dgm: BTreeSet::new(),
            arrow_map: Vec::new(),
        }
    }

    fn pair_of(&self, birth: H) -> Option<PersistentPair<H>> {
        self.birth_pair_map.iter().find(|(h, _)| *h == birth).map(|(_, p)| *p)
    }

    /// Records a birth/death pair under `kind`, keyed by `birth`. Panics
    /// (debug builds only, mirroring `massert`) if `birth` already has a
    /// pair - the construction that feeds this is expected to visit each
    /// banana's birth exactly once.
    pub fn add_pair<I: SampleItem<Handle = H>>(
        &mut self,
        kind: DiagramKind,
        items: &I,
        birth: H,
        death: H,
    ) {
        debug_assert!(self.pair_of(birth).is_none(), "a point for this birth already exists");
        let pair = PersistentPair {
            birth,
            death,
            birth_order: items.interval_order(birth),
            death_order: items.interval_order(death),
        };
        self.birth_pair_map.push((birth, pair));
        match kind {
            DiagramKind::Ordinary => {
                self.ordinary_dgm.insert(pair);
            }
            DiagramKind::Essential => {
                self.essential_dgm.insert(pair);
            }
            DiagramKind::Relative => {
                self.relative_dgm.insert(pair);
            }
        }
    }

    /// Records that the banana born at `birth_child` nests directly inside
    /// the banana born at `birth_parent`. Both must already have a pair.
    pub fn add_arrow(&mut self, birth_child: H, birth_parent: H) {
        debug_assert!(self.pair_of(birth_child).is_some(), "child needs an associated pair");
        debug_assert!(self.pair_of(birth_parent).is_some(), "parent needs an associated pair");
        self.arrow_map.push((birth_child, birth_parent));
    }

    pub fn clear(&mut self) {
        self.birth_pair_map.clear();
        self.ordinary_dgm.clear();
        self.essential_dgm.clear();
        self.relative_dgm.clear();
        self.arrow_map.clear();
    }

    pub fn get_death(&self, birth: H) -> Option<H> {
        self.pair_of(birth).map(|p| p.death)
    }

    pub fn get_parent(&self, birth: H) -> Option<PersistentPair<H>> {
        let parent_birth = self.arrow_map.iter().find(|(child, _)| *child == birth)?.1;
        self.pair_of(parent_birth)
    }

    pub fn ordinary(&self) -> impl Iterator<Item = &PersistentPair<H>> {
        self.ordinary_dgm.iter()
    }

    pub fn essential(&self) -> impl Iterator<Item = &PersistentPair<H>> {
        self.essential_dgm.iter()
    }

    pub fn relative(&self) -> impl Iterator<Item = &PersistentPair<H>> {
        self.relative_dgm.iter()
    }

    fn all_points_sorted(&self) -> Vec<PersistentPair<H>> {
        let mut points: Vec<PersistentPair<H>> = Vec::with_capacity(
            self.ordinary_dgm.len() + self.essential_dgm.len() + self.relative_dgm.len(),
        );
        points.extend(self.ordinary_dgm.iter().copied());
        points.extend(self.essential_dgm.iter().copied());
        points.extend(self.relative_dgm.iter().copied());
        points.sort();
        points
    }

    fn all_arrows_sorted(&self) -> Vec<Arrow<H>> {
        let mut arrows: Vec<Arrow<H>> = self
            .arrow_map
            .iter()
            .map(|&(child, parent)| Arrow {
                child: self.pair_of(child).expect("arrow child has no pair"),
                parent: self.pair_of(parent).expect("arrow parent has no pair"),
            })
            .collect();
        arrows.sort();
        arrows
    }

    /// Counts points and arrows present in exactly one of `a`/`b`, the same
    /// multiset symmetric difference `std::set_symmetric_difference`
    /// computes over the two sorted sequences.
    pub fn symmetric_difference(a: &Self, b: &Self) -> Difference {
        let points_a = a.all_points_sorted();
        let points_b = b.all_points_sorted();
        let arrows_a = a.all_arrows_sorted();
        let arrows_b = b.all_arrows_sorted();
        Difference {
            points: sorted_symmetric_difference_count(&points_a, &points_b),
            arrows: sorted_symmetric_difference_count(&arrows_a, &arrows_b),
        }
    }
}

fn sorted_symmetric_difference_count<T: Ord>(a: &[T], b: &[T]) -> usize {
    let (mut i, mut j) = (0, 0);
    let mut count = 0;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                count += 1;
                i += 1;
            }
            Ordering::Greater => {
                count += 1;
                j += 1;
            }
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    count + (a.len() - i) + (b.len() - j)
}

/// Populates `dgm` from a fully constructed up-tree/down-tree pair,
/// grounded on `extract_persistence_diagram`. The up-tree's bananas become
/// ordinary pairs (or, for the one banana capped by the special root, the
/// essential pair with the domain's true global maximum); the down-tree's
/// bananas all become relative pairs. Either tree's hooks are skipped
/// entirely - they're synthetic, not part of the sampled function.
pub fn extract<I: SampleItem>(
    up: &BananaTree<Up, I>,
    down: &BananaTree<Down, I>,
    items: &I,
    dgm: &mut PersistenceDiagram<I::Handle>,
) {
    map_banana_dfs(up, |birth, current, _nesting, _depth| {
        let birth_item = up.node(birth).item();
        if birth_item == up.left_hook() || birth_item == up.right_hook() {
            return;
        }
        if current == up.special_root() {
            dgm.add_pair(DiagramKind::Essential, items, birth_item, up.global_max());
        } else {
            let current_item = up.node(current).item();
            dgm.add_pair(DiagramKind::Ordinary, items, birth_item, current_item);
            let parent_birth = up.node(current).birth(current);
            let parent_item = up.node(parent_birth).item();
            dgm.add_arrow(birth_item, parent_item);
        }
    });

    map_banana_dfs(down, |birth, current, _nesting, _depth| {
        let birth_item = down.node(birth).item();
        if birth_item == down.left_hook() || birth_item == down.right_hook() {
            return;
        }
        let current_item = down.node(current).item();
        dgm.add_pair(DiagramKind::Relative, items, birth_item, current_item);
        if current != down.special_root() {
            let parent_birth = down.node(current).birth(current);
            let parent_item = down.node(parent_birth).item();
            dgm.add_arrow(birth_item, parent_item);
        }
    });
}
