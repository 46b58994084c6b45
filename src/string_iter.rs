//! The flattened left-to-right "string" traversal: visits every node of a
//! banana tree in the order its underlying samples occur along the domain,
//! skipping duplicate sightings of nodes whose banana doesn't open/close at
//! that visit. Grounded on `string_iterator::operator++` in
//! `banana_tree_iterators.cpp` - an 8-case state machine keyed on which link
//! of `current_node` the iterator arrived from (`previous_node`), plus two
//! post-step rules that skip a node's first or last repeated appearance.

use crate::item::SampleItem;
use crate::pool::Id as NodeId;
use crate::sign::Sign;
use crate::tree::BananaTree;

/// Yields node ids left to right along the domain, per `string_iterator`.
pub struct StringIter<'a, S: Sign, I: SampleItem> {
    tree: &'a BananaTree<S, I>,
    items: &'a I,
    previous_node: NodeId,
    current_node: NodeId,
    end_previous: NodeId,
    end_current: NodeId,
    done: bool,
}

impl<'a, S: Sign, I: SampleItem> StringIter<'a, S, I> {
    pub(crate) fn new(tree: &'a BananaTree<S, I>, items: &'a I, leftmost: NodeId) -> Self {
        let root = tree.special_root();
        let previous_node = tree
            .node(leftmost)
            .in_node()
            .expect("string: leftmost node has no in-trail");
        let end_previous = tree
            .node(root)
            .mid_node()
            .expect("string: special root has no mid-trail");
        StringIter {
            tree,
            items,
            previous_node,
            current_node: leftmost,
            end_previous,
            end_current: root,
            done: false,
        }
    }

    fn order(&self, id: NodeId) -> f64 {
        self.items.interval_order(self.tree.node(id).item())
    }

    fn is_at_end(&self) -> bool {
        self.previous_node == self.end_previous && self.current_node == self.end_current
    }

    fn advance(&mut self) {
        let n = self.tree.node(self.current_node);
        if n.is_special_root(self.current_node) {
            if self.previous_node == n.mid_node().expect("string: special root has no mid-trail") {
                return;
            }
            self.previous_node = self.current_node;
            self.current_node = n.in_node().expect("string: special root has no in-trail");
        }

        let n = self.tree.node(self.current_node);
        if n.is_leaf(self.current_node) {
            if self.previous_node == n.in_node().expect("string: leaf has no in-trail") {
                self.previous_node = self.current_node;
                self.current_node = n.mid_node().expect("string: leaf has no mid-trail");
            } else {
                self.previous_node = self.current_node;
                self.current_node = n.in_node().expect("string: leaf has no in-trail");
            }
        } else if Some(self.previous_node) == n.mid_node() && Some(self.previous_node) != n.in_node() {
            self.previous_node = self.current_node;
            self.current_node = n.down().expect("string: internal node has no down");
        } else if Some(self.previous_node) == n.mid_node() && Some(self.previous_node) == n.in_node() {
            if self.order(self.previous_node) < self.order(self.current_node) {
                self.previous_node = self.current_node;
                self.current_node = n.down().expect("string: internal node has no down");
            } else {
                self.previous_node = self.current_node;
                self.current_node = n.up().expect("string: internal node has no up");
            }
        } else if Some(self.previous_node) == n.in_node() && Some(self.previous_node) != n.mid_node() {
            self.previous_node = self.current_node;
            self.current_node = n.up().expect("string: internal node has no up");
        } else if Some(self.previous_node) == n.down() {
            self.previous_node = self.current_node;
            self.current_node = n.mid_node().expect("string: internal node has no mid-trail");
        } else if Some(self.previous_node) == n.up() {
            self.previous_node = self.current_node;
            self.current_node = n.in_node().expect("string: internal node has no in-trail");
        }

        let current = self.tree.node(self.current_node);
        let birth = current.birth(self.current_node);
        if self.order(self.previous_node) < self.order(birth) && self.order(birth) < self.order(self.current_node) {
            self.advance();
            return;
        }
        if birth != self.current_node && self.order(self.previous_node) > self.order(self.current_node) {
            self.advance();
        }
    }
}

impl<'a, S: Sign, I: SampleItem> Iterator for StringIter<'a, S, I> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.current_node;
        if self.is_at_end() {
            self.done = true;
        } else {
            self.advance();
            if self.is_at_end() {
                self.done = true;
            }
        }
        Some(result)
    }
}
