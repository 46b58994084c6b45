//! Lazy depth-first enumeration of a tree's bananas via node pointers
//! (`up`/`in`/`mid`), grounded on `walk_iterator::operator++` in
//! `banana_tree_iterators.cpp`. Distinct from [`crate::tree::map_banana_dfs`],
//! which walks the same bananas but via an explicit stack of node ids rather
//! than re-deriving position from the node links at each step.

use crate::item::SampleItem;
use crate::node::BananaNode;
use crate::pool::Id as NodeId;
use crate::sign::Sign;
use crate::tree::BananaTree;

/// Yields `(birth, death)` pairs, one per banana, in the order
/// `walk_iterator` visits them: the tree's outermost banana first (rooted at
/// the special root, whose birth is the domain's real global extremum for
/// this sign - see `construction`'s cleanup step), then its in-trail and
/// mid-trail descendants.
pub struct WalkIter<'a, S: Sign, I: SampleItem> {
    tree: &'a BananaTree<S, I>,
    banana_stack: Vec<(NodeId, NodeId)>,
    current_node: NodeId,
    exhausted: bool,
}

impl<'a, S: Sign, I: SampleItem> WalkIter<'a, S, I> {
    pub(crate) fn new(tree: &'a BananaTree<S, I>) -> Self {
        let root = tree.special_root();
        let birth = tree.node(root).birth(root);
        WalkIter { tree, banana_stack: vec![(birth, root)], current_node: birth, exhausted: false }
    }

    fn node(&self, id: NodeId) -> &BananaNode<I::Handle> {
        self.tree.node(id)
    }

    fn advance(&mut self) {
        let &(birth, death) = self
            .banana_stack
            .last()
            .expect("walk: advance called with an empty banana stack");
        let death_in = self.node(death).in_node();

        if self.current_node == birth && Some(self.current_node) != death_in {
            let next = self.node(birth).in_node().expect("walk: birth has no in-trail");
            let next_birth = self.node(next).birth(next);
            self.banana_stack.push((next_birth, next));
            self.current_node = next_birth;
            return;
        }

        if Some(self.current_node) == death_in {
            self.current_node = self.node(birth).mid_node().expect("walk: birth has no mid-trail");
        } else {
            self.current_node = self.node(self.current_node).up().expect("walk: node has no up");
        }

        if self.current_node == death {
            self.banana_stack.pop();
            if self.banana_stack.is_empty() {
                self.exhausted = true;
            } else {
                self.advance();
            }
        } else {
            let birth = self.node(self.current_node).birth(self.current_node);
            self.banana_stack.push((birth, self.current_node));
            self.current_node = birth;
        }
    }
}

impl<'a, S: Sign, I: SampleItem> Iterator for WalkIter<'a, S, I> {
    type Item = (NodeId, NodeId);

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let result = *self.banana_stack.last().expect("walk: non-exhausted iterator has an empty stack");
        self.advance();
        Some(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sample_list::SampleList;
    use crate::sign::Up;

    #[test]
    fn walk_visits_the_outermost_banana_first() {
        let mut list = SampleList::new();
        let a = list.push(0.0);
        let _b = list.push(2.0);
        let _c = list.push(1.0);
        let right = list.last().unwrap();
        let tree: BananaTree<Up, SampleList> = BananaTree::construct(&mut list, a, right);
        let first = tree.walk().next().expect("walk yields at least the outer banana");
        // The outer banana's birth is the domain's real global minimum (`a`,
        // value 0.0), not the special root itself - `special_root.low` is set
        // to the final `a_candidate` by construction's cleanup step, and
        // `a` is the smaller of the two domain endpoints here.
        let a_node = list.node::<Up>(a).expect("left endpoint has a node");
        assert_eq!(first.0, a_node);
        assert_eq!(first.1, tree.special_root());
    }

    /// Regression case for an interior (non-hook, non-endpoint) global
    /// minimum: before the `special_root.low` fix, the special root's
    /// in-trail loop never stopped at the real minimum and re-visited it as
    /// its own degenerate banana, reporting `(special_root, special_root)`
    /// here instead of `(item@1, special_root)`.
    #[test]
    fn walk_outermost_birth_is_interior_global_minimum() {
        let mut list = SampleList::new();
        let _a = list.push(5.0);
        let b = list.push(0.0);
        let _c = list.push(3.0);
        let left = list.first().unwrap();
        let right = list.last().unwrap();
        let tree: BananaTree<Up, SampleList> = BananaTree::construct(&mut list, left, right);

        let pairs: Vec<_> = tree.walk().collect();
        let first = pairs[0];
        let b_node = list.node::<Up>(b).expect("interior minimum has a node");
        assert_eq!(first.0, b_node);
        assert_eq!(first.1, tree.special_root());
        assert_ne!(first.0, first.1, "outer banana must not be a degenerate self-pair");

        let mut seen = std::collections::HashSet::new();
        for &pair in &pairs {
            assert!(seen.insert(pair), "walk revisited banana {pair:?}");
            assert_ne!(pair.0, pair.1, "no banana should pair a node with itself");
        }
    }

    #[test]
    fn walk_is_finite() {
        let mut list = SampleList::new();
        for v in [0.0, 3.0, 1.0, 4.0, 2.0, 5.0, 0.5] {
            list.push(v);
        }
        let left = list.first().unwrap();
        let right = list.last().unwrap();
        let tree: BananaTree<Up, SampleList> = BananaTree::construct(&mut list, left, right);
        let count = tree.walk().count();
        assert!(count > 0 && count < 1000);
    }
}
