//! The external contract a domain sample list must satisfy to be fed through
//! [`crate::construction`]. Mirrors the "sample item (external)" contract;
//! the core only ever touches a caller's data through this trait and the
//! opaque handles it hands back, the same arm's-length relationship
//! `content-tree`'s `ContentTraits` bound has with whatever content type a
//! caller plugs in.

use crate::pool::Id as NodeId;
use crate::sign::Sign;

/// One node of a doubly linked sequence of observations, ordered along a
/// one-dimensional domain.
///
/// `Self` is the whole list (or however a caller chooses to store it);
/// `Self::Handle` identifies one item within it. The trait never assumes a
/// representation for `Handle` - a concrete implementation is free to use a
/// `Vec` index, an arena id, or a raw pointer, as [`crate::sample_list`]'s
/// `ItemId` does.
pub trait SampleItem {
    /// A cheap, copyable reference to one item in the list.
    type Handle: Copy + Eq + std::fmt::Debug;

    /// The item's position along the domain. Strictly monotone with respect
    /// to list order; ties are a precondition violation (general position).
    fn interval_order(&self, handle: Self::Handle) -> f64;

    /// The sampled function's value at this item.
    fn value(&self, handle: Self::Handle) -> f64;

    fn is_endpoint(&self, handle: Self::Handle) -> bool {
        self.is_left_endpoint(handle) || self.is_right_endpoint(handle)
    }
    fn is_left_endpoint(&self, handle: Self::Handle) -> bool;
    fn is_right_endpoint(&self, handle: Self::Handle) -> bool;

    /// A maximum or a minimum under `S`, or an endpoint (endpoints are
    /// always critical, regardless of sign).
    fn is_critical<S: Sign>(&self, handle: Self::Handle) -> bool {
        self.is_endpoint(handle) || self.is_maximum::<S>(handle) || self.is_minimum::<S>(handle)
    }
    /// A local maximum under the sign's orientation: more extreme than both
    /// neighbors (or the only neighbor it has, at an endpoint).
    fn is_maximum<S: Sign>(&self, handle: Self::Handle) -> bool;
    /// A local minimum under the sign's orientation.
    fn is_minimum<S: Sign>(&self, handle: Self::Handle) -> bool;
    /// An endpoint whose single neighbor is more extreme than it under the
    /// sign (so the endpoint itself behaves like the "down" side of a
    /// banana and needs a hook to be treated as critical).
    fn is_down_type<S: Sign>(&self, handle: Self::Handle) -> bool;

    fn left_neighbor(&self, handle: Self::Handle) -> Option<Self::Handle>;
    fn right_neighbor(&self, handle: Self::Handle) -> Option<Self::Handle>;

    /// The banana-tree node this item owns for sign `S`, if any.
    fn node<S: Sign>(&self, handle: Self::Handle) -> Option<NodeId>;
    /// Associates (or clears, with `None`) this item's node for sign `S`.
    /// Panics if a node is already assigned and `node` is `Some` (an item
    /// owns at most one node per sign).
    fn set_node<S: Sign>(&mut self, handle: Self::Handle, node: Option<NodeId>);

    /// True iff `c` lies strictly between `a` and `b` in `interval_order`,
    /// regardless of which of `a`/`b` sorts first.
    fn is_between(&self, a: Self::Handle, b: Self::Handle, c: Self::Handle) -> bool {
        let (lo, hi) = {
            let oa = self.interval_order(a);
            let ob = self.interval_order(b);
            if oa <= ob { (oa, ob) } else { (ob, oa) }
        };
        let oc = self.interval_order(c);
        lo < oc && oc < hi
    }

    /// Binds `a.next := b` and `b.prev := a`. Deliberately minimal: unlike a
    /// full splice, it does not touch `a`'s old successor or `b`'s old
    /// predecessor, since every construction-time caller already arranges
    /// for those to be `None` (a fresh hook/sentinel) before linking it in.
    fn link(&mut self, a: Self::Handle, b: Self::Handle);
    /// Removes `handle`'s link to its left neighbor, closing the gap.
    fn cut_left(&mut self, handle: Self::Handle);
    /// Removes `handle`'s link to its right neighbor, closing the gap.
    fn cut_right(&mut self, handle: Self::Handle);

    /// Materializes a new item not otherwise reachable by list traversal,
    /// for the tree's own use as a hook or special root. `value` and
    /// `interval_order` are precomputed by the caller (§4.2); the returned
    /// handle is later `link`ed into the list and eventually `cut_left`/
    /// `cut_right` back out during construction cleanup.
    fn alloc_synthetic(&mut self, value: f64, interval_order: f64) -> Self::Handle;
}
