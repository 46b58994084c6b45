//! The banana tree node: a six-link record, one per extremum of the sampled
//! function. See spec §3 for the full invariant list; this module only
//! implements the accessors and the two link-set methods (`pub(crate)`,
//! mirroring the original's package-private pointer mutators).

use crate::item::SampleItem;
use crate::pool::Id as NodeId;
use crate::sign::Sign;

/// Where a node sits relative to the two spines of the tree, initialized by
/// [`crate::construction`] once the tree is fully wired.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum SpineLabel {
    #[default]
    None,
    LeftSpine,
    RightSpine,
    BothSpines,
}

/// One node of a banana tree: an extremum of the sampled function, together
/// with its six links. `H` is the sample item handle type (see
/// [`crate::item::SampleItem`]).
#[derive(Clone, Debug)]
pub struct BananaNode<H> {
    item: H,
    up: Option<NodeId>,
    down: Option<NodeId>,
    in_: Option<NodeId>,
    mid: Option<NodeId>,
    low: Option<NodeId>,
    death: Option<NodeId>,
    spine_label: SpineLabel,
}

impl<H: Copy> BananaNode<H> {
    pub(crate) fn new(item: H) -> Self {
        BananaNode {
            item,
            up: None,
            down: None,
            in_: None,
            mid: None,
            low: None,
            death: None,
            spine_label: SpineLabel::None,
        }
    }

    #[inline]
    pub fn item(&self) -> H {
        self.item
    }

    #[inline]
    pub fn up(&self) -> Option<NodeId> {
        self.up
    }
    #[inline]
    pub fn down(&self) -> Option<NodeId> {
        self.down
    }
    #[inline]
    pub fn in_node(&self) -> Option<NodeId> {
        self.in_
    }
    #[inline]
    pub fn mid_node(&self) -> Option<NodeId> {
        self.mid
    }
    #[inline]
    pub fn low(&self) -> Option<NodeId> {
        self.low
    }
    #[inline]
    pub fn death(&self) -> Option<NodeId> {
        self.death
    }
    #[inline]
    pub fn spine_label(&self) -> SpineLabel {
        self.spine_label
    }

    pub(crate) fn set_up(&mut self, n: Option<NodeId>) {
        self.up = n;
    }
    pub(crate) fn set_down(&mut self, n: Option<NodeId>) {
        self.down = n;
    }
    pub(crate) fn set_in(&mut self, n: Option<NodeId>) {
        self.in_ = n;
    }
    pub(crate) fn set_mid(&mut self, n: Option<NodeId>) {
        self.mid = n;
    }
    pub(crate) fn set_low(&mut self, n: Option<NodeId>) {
        self.low = n;
    }
    pub(crate) fn set_death(&mut self, n: Option<NodeId>) {
        self.death = n;
    }
    pub(crate) fn set_spine_label(&mut self, label: SpineLabel) {
        self.spine_label = label;
    }

    /// Rebinds this node to a different sample item, mirroring
    /// `banana_tree_node::replace_item`'s `item->assign_node`/old-item
    /// clearing: the previous item's node slot is cleared, the new item's
    /// slot is bound to `self_id`, and uniqueness is enforced the same way
    /// `set_node` enforces it elsewhere - panics if `new_item` already owns a
    /// node for this sign. Only used by a future maintenance-under-edit
    /// layer; the core construction algorithm never calls this.
    pub(crate) fn replace_item<S: Sign, I: SampleItem<Handle = H>>(
        &mut self,
        self_id: NodeId,
        items: &mut I,
        new_item: H,
    ) {
        assert!(
            items.node::<S>(new_item).is_none(),
            "replace_item: new item already has a node for this sign"
        );
        items.set_node::<S>(self.item, None);
        self.item = new_item;
        items.set_node::<S>(new_item, Some(self_id));
    }

    /// `self_id.low == Some(self_id)` is the minimum marker (invariant 1);
    /// since a node doesn't know its own id, the tree passes it in. In the
    /// degenerate case of a domain with no interior minimum for this sign,
    /// the special root's `low` also self-references (construction's
    /// cleanup step falls back to that when there's no real outer minimum
    /// to point at), so this additionally requires `death` to be set -
    /// `fix_banana` always pairs a minimum with its maximum's `death`, but
    /// the special root's `death` is never assigned (nothing encloses the
    /// outermost banana). See [`Self::is_special_root`].
    #[inline]
    pub fn is_leaf(&self, self_id: NodeId) -> bool {
        self.low == Some(self_id) && self.death.is_some()
    }

    #[inline]
    pub fn is_internal(&self, self_id: NodeId) -> bool {
        !self.is_leaf(self_id)
    }

    /// The special root is the only node with neither an `up` nor a `down`
    /// link that isn't also a leaf: `fix_banana` clears both for the leaf it
    /// seals, and construction's cleanup step clears both for the special
    /// root the same way, but a leaf always gets a `death` (its partner
    /// maximum) while the special root's `death` is never assigned - nothing
    /// encloses the outermost banana. Every other internal node keeps at
    /// least one of `up`/`down` set, since it sits embedded in some
    /// enclosing banana's trail. Doesn't need `self_id`: unlike `is_leaf`,
    /// this predicate reads no self-referential field.
    #[inline]
    pub fn is_special_root(&self, _self_id: NodeId) -> bool {
        self.up.is_none() && self.down.is_none() && self.death.is_none()
    }

    /// `birth(n) := n.low`, falling back to `n` itself when `low` hasn't
    /// been assigned yet (`None`). Every node's `low` starts `None` and is
    /// written exactly once by [`crate::construction`]: a true minimum gets
    /// `low = self` the moment its banana seals (`fix_banana`); any other
    /// node gets `low` set to the minimum of whichever banana's trail
    /// eventually sweeps over it. The special root is the one node that
    /// never gets swept by an enclosing banana (nothing encloses the
    /// outermost one); construction's cleanup step instead assigns it
    /// `low` directly to the outermost banana's own minimum, so `birth` on
    /// the special root resolves to that real node, not to itself.
    #[inline]
    pub fn birth(&self, self_id: NodeId) -> NodeId {
        self.low.unwrap_or(self_id)
    }
}
