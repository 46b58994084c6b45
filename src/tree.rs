//! The banana tree container: owns one tree for a fixed sign, grounded on
//! `banana_tree<sign>` - the ctors, `construct`, `walk`, `string`, node
//! allocation and the destructor's banana-DFS sweep.

use std::collections::HashSet;
use std::marker::PhantomData;

use crate::construction;
use crate::item::SampleItem;
use crate::node::BananaNode;
use crate::pool::{Arena, Id as NodeId};
use crate::sign::Sign;
use crate::string_iter::StringIter;
use crate::walk::WalkIter;

/// One sign's banana tree (the up-tree or the down-tree), built over a
/// caller-owned domain list `I`. Holds three synthetic items (left hook,
/// right hook, special root) and the index of the global extremum, plus
/// the two domain endpoints the tree was built over.
pub struct BananaTree<S: Sign, I: SampleItem> {
    pub(crate) arena: Arena<BananaNode<I::Handle>>,
    pub(crate) special_root: NodeId,
    pub(crate) left_hook: I::Handle,
    pub(crate) right_hook: I::Handle,
    pub(crate) global_max: I::Handle,
    pub(crate) left_endpoint: I::Handle,
    pub(crate) right_endpoint: I::Handle,
    pub(crate) _sign: PhantomData<S>,
}

impl<S: Sign, I: SampleItem> BananaTree<S, I> {
    /// Builds the sign-`S` banana tree over the closed subsequence
    /// `[left, right]` of `items`. Panics if the subsequence has fewer
    /// than two items.
    pub fn construct(items: &mut I, left: I::Handle, right: I::Handle) -> Self {
        assert!(
            items.right_neighbor(left).is_some(),
            "need at least two items to construct a banana tree"
        );
        construction::construct::<S, I>(items, left, right)
    }

    #[inline]
    pub fn special_root(&self) -> NodeId {
        self.special_root
    }

    #[inline]
    pub fn global_max(&self) -> I::Handle {
        self.global_max
    }

    #[inline]
    pub fn left_hook(&self) -> I::Handle {
        self.left_hook
    }

    #[inline]
    pub fn right_hook(&self) -> I::Handle {
        self.right_hook
    }

    #[inline]
    pub fn left_endpoint(&self) -> I::Handle {
        self.left_endpoint
    }

    #[inline]
    pub fn right_endpoint(&self) -> I::Handle {
        self.right_endpoint
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &BananaNode<I::Handle> {
        self.arena.get(id)
    }

    pub fn walk(&self) -> WalkIter<'_, S, I> {
        WalkIter::new(self)
    }

    /// `string()`'s begin node is the left endpoint's own node, unless that
    /// node is internal (not a leaf), in which case the left hook's node is
    /// used instead - mirroring `banana_tree::string()`.
    pub fn string<'a>(&'a self, items: &'a I) -> StringIter<'a, S, I> {
        let left_node_id = items
            .node::<S>(self.left_endpoint)
            .expect("left endpoint has no node for this sign");
        let leftmost = if self.node(left_node_id).is_leaf(left_node_id) {
            left_node_id
        } else {
            items
                .node::<S>(self.left_hook)
                .expect("left hook has no node for this sign")
        };
        StringIter::new(self, items, leftmost)
    }

    /// `n` lies on the in-trail of the banana it belongs to: strictly
    /// between `n.low` and `n.low.death` on the low side. Always `false`
    /// for a minimum or the special root (neither has a trail of its own).
    pub fn is_on_in_trail(&self, id: NodeId, items: &I) -> bool {
        let (low_id, death_id) = match self.trail_anchor(id) {
            Some(anchor) => anchor,
            None => return false,
        };
        let low = self.node(low_id);
        let death = self.node(death_id);
        items.is_between(low.item(), death.item(), self.node(id).item())
    }

    /// `n` lies on the mid-trail: strictly between `n.low.death` and
    /// `n.low` on the mid side.
    pub fn is_on_mid_trail(&self, id: NodeId, items: &I) -> bool {
        let (low_id, death_id) = match self.trail_anchor(id) {
            Some(anchor) => anchor,
            None => return false,
        };
        let low = self.node(low_id);
        let death = self.node(death_id);
        items.is_between(self.node(id).item(), low.item(), death.item())
    }

    fn trail_anchor(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        let n = self.node(id);
        let low_id = n.low()?;
        if low_id == id {
            return None;
        }
        let death_id = self.node(low_id).death()?;
        if death_id == id {
            return None;
        }
        Some((low_id, death_id))
    }
}

impl<S: Sign, I: SampleItem> Drop for BananaTree<S, I> {
    /// Frees every node the tree owns by sweeping bananas in DFS order,
    /// grounded on `map_banana_dfs` as used by `~banana_tree`. Ids are
    /// deduplicated before freeing: `map_banana_dfs`'s in-trail/mid-trail
    /// walks revisit a banana's own birth node as the terminal step of
    /// descending to it, and in a domain with no interior minimum for this
    /// sign the special root's own birth is itself (see `construction`'s
    /// cleanup step) - freeing by item identity (as the original's
    /// raw-pointer pool does) tolerates the repeat; freeing by this arena's
    /// generation-checked id does not, so we dedup first.
    fn drop(&mut self) {
        if self.arena.is_empty() {
            return;
        }
        let mut seen = HashSet::new();
        map_banana_dfs(self, |birth, current, _nesting, _depth| {
            seen.insert(birth);
            seen.insert(current);
        });
        for id in seen {
            self.arena.free(id);
        }
    }
}

/// Visits every banana of `tree` in depth-first order: the special root
/// first, then its in-trail and mid-trail descendants, recursively.
/// Grounded on `map_banana_dfs` in `banana_tree_algorithms.h` - a
/// non-recursive, explicit-stack traversal distinct from the lazy `walk()`
/// iterator, used here by `Drop` and by `crate::diagram::extract`.
pub(crate) fn map_banana_dfs<S: Sign, I: SampleItem>(
    tree: &BananaTree<S, I>,
    mut visit: impl FnMut(NodeId, NodeId, u32, u32),
) {
    let mut stack: Vec<(NodeId, u32, u32)> = vec![(tree.special_root, 0, 0)];
    while let Some((current, nesting_depth, node_depth)) = stack.pop() {
        let node = tree.node(current);
        let birth = node.birth(current);
        visit(birth, current, nesting_depth, node_depth);

        let mut in_depth = node_depth;
        let mut in_cursor = node.in_node();
        while let Some(in_id) = in_cursor {
            if in_id == birth {
                break;
            }
            in_depth += 1;
            stack.push((in_id, nesting_depth + 1, in_depth));
            in_cursor = tree.node(in_id).down();
        }

        let mut mid_depth = node_depth;
        let mut mid_cursor = node.mid_node();
        while let Some(mid_id) = mid_cursor {
            if mid_id == birth {
                break;
            }
            mid_depth += 1;
            stack.push((mid_id, nesting_depth + 1, mid_depth));
            mid_cursor = tree.node(mid_id).down();
        }
    }
}
