//! The construction algorithm: one left-to-right pass over a domain list's
//! critical items that produces a fully wired [`BananaTree`]. Grounded
//! directly on `banana_tree_construction.cpp` (`construct_impl`,
//! `attach_below_on_left`, `attach_below_on_right`, `fix_banana`,
//! `initialize_spline_labels`).

use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::item::SampleItem;
use crate::node::{BananaNode, SpineLabel};
use crate::pool::{Arena, Id as NodeId};
use crate::sign::Sign;
use crate::tree::BananaTree;

/// Separation between a hook and the endpoint it guards, matching the
/// original's `constexpr interval_order_type offset = 0.1`.
const HOOK_ORDER_OFFSET: f64 = 0.1;

/// A handle into the transient, construction-only record list: the
/// critical items between the two endpoints, linked independently of the
/// domain list so the main pass can step item-to-item in O(1) without
/// re-filtering non-critical points.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct RecordId(usize);

struct Record<H> {
    item: H,
    node: NodeId,
    prev: Option<RecordId>,
    next: Option<RecordId>,
    /// Whether this record is a minimum, classified once at admission time
    /// (while the domain list is still untouched by hook/sentinel
    /// splicing). The main pass reads this instead of re-querying
    /// `SampleItem::is_minimum` live: by the time the pass reaches a
    /// boundary item, its domain-list neighbors have already been spliced
    /// with hooks or sentinels, which can silently change its classification.
    is_min: bool,
}

fn allocate_node<S: Sign, I: SampleItem>(
    arena: &mut Arena<BananaNode<I::Handle>>,
    items: &mut I,
    handle: I::Handle,
) -> NodeId {
    let id = arena.construct(BananaNode::new(handle));
    items.set_node::<S>(handle, Some(id));
    id
}

pub(crate) fn construct<S: Sign, I: SampleItem>(
    items: &mut I,
    left_endpoint: I::Handle,
    right_endpoint: I::Handle,
) -> BananaTree<S, I> {
    let mut arena: Arena<BananaNode<I::Handle>> = Arena::new();
    let mut records: Vec<Record<I::Handle>> = Vec::new();

    let left_node = allocate_node::<S, I>(&mut arena, items, left_endpoint);
    // An endpoint is never a minimum by definition (`SampleItem::is_endpoint`
    // excludes it from `is_minimum`'s domain).
    records.push(Record {
        item: left_endpoint,
        node: left_node,
        prev: None,
        next: None,
        is_min: false,
    });
    let mut prev_idx = RecordId(0);
    let mut left_c_endpoint = RecordId(0);
    let mut right_c_endpoint = RecordId(0);

    let mut global_max = left_endpoint;

    // Scan rightward from the left endpoint, admitting only items that are
    // an endpoint or sign-critical; track the running global extremum
    // among maxima/down-type items as we go. Each admitted record's
    // minimum/maximum classification is cached here, while the domain list
    // is still exactly as the caller built it: the main pass below splices
    // hooks and sentinels into that same list, and re-querying
    // `is_minimum`/`is_maximum` against the post-splice neighbors can
    // silently reclassify a boundary item.
    let mut cursor = items.right_neighbor(left_endpoint);
    while let Some(handle) = cursor {
        if items.is_endpoint(handle) || items.is_critical::<S>(handle) {
            let is_min = items.is_minimum::<S>(handle);
            if (items.is_maximum::<S>(handle) || items.is_down_type::<S>(handle))
                && S::more_extreme(items.value(handle), items.value(global_max))
            {
                global_max = handle;
            }
            let node = allocate_node::<S, I>(&mut arena, items, handle);
            let idx = RecordId(records.len());
            records.push(Record { item: handle, node, prev: Some(prev_idx), next: None, is_min });
            records[prev_idx.0].next = Some(idx);
            prev_idx = idx;
            right_c_endpoint = idx;
        }
        cursor = items.right_neighbor(handle);
    }

    // Add hooks if the endpoints are down-type: a hook sits just outside
    // its endpoint, nudged away from the sign's favored direction, so the
    // endpoint's boundary critical-type classification has a two-sided
    // neighbor to compare against.
    let mut added_left_hook = false;
    let mut left_hook = left_endpoint;
    if items.is_down_type::<S>(left_endpoint) {
        let hook_value = S::tiniest_offset_away(items.value(left_endpoint));
        let hook_order = items.interval_order(left_endpoint) - HOOK_ORDER_OFFSET;
        let hook_handle = items.alloc_synthetic(hook_value, hook_order);
        items.link(hook_handle, left_endpoint);
        let hook_node = allocate_node::<S, I>(&mut arena, items, hook_handle);
        let hook_idx = RecordId(records.len());
        records.push(Record {
            item: hook_handle,
            node: hook_node,
            prev: None,
            next: Some(left_c_endpoint),
            is_min: false,
        });
        records[left_c_endpoint.0].prev = Some(hook_idx);
        left_c_endpoint = hook_idx;
        left_hook = hook_handle;
        added_left_hook = true;
    }
    let mut added_right_hook = false;
    let mut right_hook = right_endpoint;
    if items.is_down_type::<S>(right_endpoint) {
        let hook_value = S::tiniest_offset_away(items.value(right_endpoint));
        let hook_order = items.interval_order(right_endpoint) + HOOK_ORDER_OFFSET;
        let hook_handle = items.alloc_synthetic(hook_value, hook_order);
        items.link(right_endpoint, hook_handle);
        let hook_node = allocate_node::<S, I>(&mut arena, items, hook_handle);
        let hook_idx = RecordId(records.len());
        records.push(Record {
            item: hook_handle,
            node: hook_node,
            prev: Some(right_c_endpoint),
            next: None,
            is_min: false,
        });
        records[right_c_endpoint.0].next = Some(hook_idx);
        right_c_endpoint = hook_idx;
        right_hook = hook_handle;
        added_right_hook = true;
    }

    // The fake-left sentinel (value sign*inf) guarantees the construction
    // stack never empties; it's freed again once the loop finishes.
    let fake_left_handle = items.alloc_synthetic(S::infinity(), f64::NEG_INFINITY);
    items.link(fake_left_handle, records[left_c_endpoint.0].item);
    let fake_left_node = allocate_node::<S, I>(&mut arena, items, fake_left_handle);
    let fake_left_idx = RecordId(records.len());
    records.push(Record {
        item: fake_left_handle,
        node: fake_left_node,
        prev: None,
        next: Some(left_c_endpoint),
        is_min: false,
    });
    // The leftmost real record's construction-chain `prev` is its `mid`
    // link target, and for the very first record processed by the main
    // pass that predecessor is the fake-left sentinel itself. Its `down` is
    // left at `None`: `attach_below_on_left`/`fix_banana` both treat that
    // as an empty in-trail rather than a missing one.
    records[left_c_endpoint.0].prev = Some(fake_left_idx);

    // The item on the right end becomes the tree's special root.
    let special_root_handle = items.alloc_synthetic(S::infinity(), f64::INFINITY);
    items.link(records[right_c_endpoint.0].item, special_root_handle);
    let special_root_node = allocate_node::<S, I>(&mut arena, items, special_root_handle);
    let special_root_idx = RecordId(records.len());
    records.push(Record {
        item: special_root_handle,
        node: special_root_node,
        prev: Some(right_c_endpoint),
        next: None,
        is_min: false,
    });
    records[right_c_endpoint.0].next = Some(special_root_idx);
    right_c_endpoint = special_root_idx;

    // Main pass: a single stack of (min, max) banana-in-progress pairs,
    // seeded with the fake-left sentinel so the stack never empties.
    let mut stack: SmallVec<[(Option<RecordId>, RecordId); 8]> = SmallVec::new();
    stack.push((Some(fake_left_idx), fake_left_idx));

    // The fake-left sentinel's `down` must point at the first admitted
    // record so that the very first `attach_below_on_left`/
    // `attach_below_on_right` call involving it (reading `b.down()` as the
    // in-trail occupant) sees a real node instead of `None`: every other
    // stack entry gets its `down` populated by a prior attach call, but the
    // sentinel is seeded directly onto the stack, never attached.
    arena.get_mut(fake_left_node).set_down(Some(records[left_c_endpoint.0].node));

    // Mirrors the stack's own seed: the running minimum candidate starts as
    // the fake-left sentinel too, so the first banana ever popped (which is
    // always the fake-left/first-record pair) has an assigned minimum.
    let mut a_candidate: Option<RecordId> = Some(fake_left_idx);
    let mut j_idx = left_c_endpoint;
    loop {
        let handle = records[j_idx.0].item;
        if records[j_idx.0].is_min {
            a_candidate = Some(j_idx);
        } else {
            // Every admitted record is either a minimum (handled above) or
            // a maximum/down-type item; the cached classification was
            // computed once, before any hook/sentinel splicing, and is the
            // authoritative answer for both branches.
            loop {
                let top_max = stack.last().expect("construction stack is never empty").1;
                let top_max_value = items.value(records[top_max.0].item);
                if !S::more_extreme(items.value(handle), top_max_value) {
                    break;
                }
                let (a, b) = stack.pop().expect("just peeked a non-empty stack");
                let a_value = a.map(|a| items.value(records[a.0].item));
                let a_cand_value = a_candidate.map(|a| items.value(records[a.0].item));
                // True iff the running candidate A is less extreme than the
                // popped banana's own minimum a (mirrors `A->get_value() <
                // a->get_value()`): under the sign's oriented ordering,
                // "less extreme" means a's value is the more extreme one.
                let a_candidate_is_less_extreme = match (a_value, a_cand_value) {
                    (Some(a_value), Some(a_cand_value)) => S::more_extreme(a_value, a_cand_value),
                    _ => panic!("construction: banana popped with no assigned minimum"),
                };
                if a_candidate_is_less_extreme {
                    fix_banana::<I::Handle>(
                        &records,
                        &mut arena,
                        a.expect("checked above"),
                        b,
                    );
                } else {
                    attach_below_on_right::<I::Handle>(&mut records, &mut arena, b, j_idx);
                    fix_banana::<I::Handle>(
                        &records,
                        &mut arena,
                        a_candidate.expect("checked above"),
                        b,
                    );
                    a_candidate = a;
                }
            }
            let top_max = stack.last().expect("construction stack is never empty").1;
            attach_below_on_left::<I::Handle>(&mut records, &mut arena, j_idx, top_max);
            stack.push((a_candidate, j_idx));
            if j_idx == right_c_endpoint {
                fix_banana::<I::Handle>(
                    &records,
                    &mut arena,
                    a_candidate.expect("the whole domain must resolve to a single global extremum"),
                    j_idx,
                );
            }
        }
        match records[j_idx.0].next {
            Some(next) => j_idx = next,
            None => break,
        }
    }

    // Cleanup: scrub any surviving reference to the fake-left sentinel
    // before freeing it. A domain with no interior minimum for this sign
    // (a monotone run, a single undivided peak) never replaces the
    // sentinel as the running minimum candidate, so every banana the main
    // pass seals against it leaves its trail nodes' `low` pointed at the
    // sentinel - a dangling reference the moment it's freed below. `records`
    // is a complete census of every node this construction allocated, so
    // this is an exhaustive sweep, not a reachable-from-root walk.
    for record in &records {
        let id = record.node;
        if id == fake_left_node {
            continue;
        }
        let node = arena.get_mut(id);
        if node.up() == Some(fake_left_node) {
            node.set_up(None);
        }
        if node.down() == Some(fake_left_node) {
            node.set_down(None);
        }
        if node.in_node() == Some(fake_left_node) {
            node.set_in(None);
        }
        if node.mid_node() == Some(fake_left_node) {
            node.set_mid(None);
        }
        if node.low() == Some(fake_left_node) {
            node.set_low(None);
        }
        if node.death() == Some(fake_left_node) {
            node.set_death(None);
        }
    }

    items.set_node::<S>(fake_left_handle, None);
    arena.free(fake_left_node);
    items.cut_right(fake_left_handle);

    items.cut_left(special_root_handle);
    {
        let special_root = arena.get_mut(special_root_node);
        special_root.set_up(None);
        special_root.set_down(None);
    }
    // `special_root.low` must be the outermost banana's real minimum - the
    // final `a_candidate`, sealed against the special root by the very last
    // `fix_banana` call above - not the special root itself.
    // `banana_tree_construction.cpp:132` assigns `special_root->low =
    // special_root->get_birth()`, and `map_in_trail`/`map_mid_trail`'s own
    // termination check (`in != max_node->get_birth()`) only halts correctly
    // if that's the real trail bottom, not a self-reference. The one
    // exception is a domain with no interior minimum for this sign at all (a
    // monotone run): then `a_candidate` is still the fake-left sentinel,
    // already freed above, and the self-loop this replaces is kept as the
    // fallback.
    let outer_min_record =
        a_candidate.expect("the whole domain must resolve to a single global extremum");
    let outer_min_node = records[outer_min_record.0].node;
    let special_root_low = if outer_min_node == fake_left_node { special_root_node } else { outer_min_node };
    arena.get_mut(special_root_node).set_low(Some(special_root_low));

    if added_left_hook {
        items.cut_right(left_hook);
    }
    if added_right_hook {
        items.cut_left(right_hook);
    }

    let mut tree = BananaTree {
        arena,
        special_root: special_root_node,
        left_hook,
        right_hook,
        global_max,
        left_endpoint,
        right_endpoint,
        _sign: PhantomData,
    };
    initialize_spine_labels(&mut tree);
    tree
}

/// Wires `j` in below `b` on the in-trail side: `j.up = b`, `j.in =
/// b.down` (the previous occupant of this boundary position - by
/// construction never `None`: every stack-top `b` has its `down` populated
/// either by a prior attach call or, for the fake-left sentinel, by the
/// preset above), `j.mid = j`'s construction-chain predecessor, and
/// (mirroring the original's `if (j->next != nullptr) J->down = ...`)
/// `j.down` is set to `j`'s construction-chain successor's node when one
/// exists - the admitted record immediately to `j`'s right, which is what
/// a later `fix_banana` sweep will step onto via `.down()` before anything
/// is ever attached below `j` directly. `b.down` is then replaced by `j`.
fn attach_below_on_left<H: Copy>(
    records: &mut [Record<H>],
    arena: &mut Arena<BananaNode<H>>,
    j: RecordId,
    b: RecordId,
) {
    let j_node = records[j.0].node;
    let b_node = records[b.0].node;
    let mid_record = records[j.0].prev.expect("attach_below_on_left: j has no predecessor");
    let mid_node = records[mid_record.0].node;
    let in_node = arena.get(b_node).down().expect("attach_below_on_left: b has no down");

    arena.get_mut(j_node).set_up(Some(b_node));
    arena.get_mut(j_node).set_in(Some(in_node));
    arena.get_mut(j_node).set_mid(Some(mid_node));
    if let Some(next) = records[j.0].next {
        let next_node = records[next.0].node;
        arena.get_mut(j_node).set_down(Some(next_node));
    }
    arena.get_mut(b_node).set_down(Some(j_node));
    arena.get_mut(in_node).set_up(Some(j_node));
    arena.get_mut(mid_node).set_up(Some(j_node));
}

/// Re-roots `b` below the newly arrived `j`: `b`'s old parent's `down`
/// link is spliced around it, `b.up` becomes `j`, `b.in` becomes `j`'s
/// construction-chain predecessor, and `b`'s `down`/`mid` links are
/// swapped (the banana previously rooted at `b` is now entered from the
/// other side). `b.in`/`b.down` may be `None` (an empty trail on that
/// side); splicing and swapping simply carries the `None` through.
fn attach_below_on_right<H: Copy>(
    records: &mut [Record<H>],
    arena: &mut Arena<BananaNode<H>>,
    b: RecordId,
    j: RecordId,
) {
    let j_node = records[j.0].node;
    let b_node = records[b.0].node;

    let b_up = arena.get(b_node).up().expect("attach_below_on_right: b has no up");
    let b_in = arena.get(b_node).in_node();
    arena.get_mut(b_up).set_down(b_in);
    if let Some(b_in) = b_in {
        arena.get_mut(b_in).set_up(Some(b_up));
    }

    arena.get_mut(b_node).set_up(Some(j_node));
    let prev_record = records[j.0].prev.expect("attach_below_on_right: j has no predecessor");
    let prev_node = records[prev_record.0].node;
    arena.get_mut(b_node).set_in(Some(prev_node));

    let old_down = arena.get(b_node).down();
    let old_mid = arena.get(b_node).mid_node();
    arena.get_mut(b_node).set_down(old_mid);
    arena.get_mut(b_node).set_mid(old_down);

    arena.get_mut(prev_node).set_up(Some(b_node));
    records[j.0].prev = Some(b);
}

/// Seals the banana `(a, b)`: every trail node strictly between `b` and
/// `a` (on both the in-trail and mid-trail) gets `low := a`; `a` itself
/// becomes the banana's leaf (`low = a`, `death = b`, no `up`/`down`). A
/// trail that starts at `None` (or already at `a`) is empty - `a.in`/
/// `a.mid` then point straight at `b`, the "empty banana" shape.
fn fix_banana<H: Copy>(
    records: &[Record<H>],
    arena: &mut Arena<BananaNode<H>>,
    a: RecordId,
    b: RecordId,
) {
    let a_node = records[a.0].node;
    let b_node = records[b.0].node;

    let mut q = b_node;
    let mut p = arena.get(b_node).in_node();
    while let Some(node) = p {
        if node == a_node {
            break;
        }
        arena.get_mut(node).set_low(Some(a_node));
        q = node;
        p = arena.get(node).down();
    }
    arena.get_mut(a_node).set_in(Some(q));

    q = b_node;
    p = arena.get(b_node).mid_node();
    while let Some(node) = p {
        if node == a_node {
            break;
        }
        arena.get_mut(node).set_low(Some(a_node));
        q = node;
        p = arena.get(node).down();
    }
    arena.get_mut(a_node).set_mid(Some(q));

    arena.get_mut(a_node).set_low(Some(a_node));
    arena.get_mut(a_node).set_death(Some(b_node));
    arena.get_mut(a_node).set_up(None);
    arena.get_mut(a_node).set_down(None);
}

/// Labels the two spines: `special_root.in_ -> in_ -> ... -> leaf` is the
/// left spine, `special_root.mid -> in_ -> ... -> leaf` is the right
/// spine, and the special root itself sits on both.
fn initialize_spine_labels<S: Sign, I: SampleItem>(tree: &mut BananaTree<S, I>) {
    let root = tree.special_root;
    tree.arena.get_mut(root).set_spine_label(SpineLabel::BothSpines);

    let mut left = tree.arena.get(root).in_node().expect("special root has no in");
    loop {
        tree.arena.get_mut(left).set_spine_label(SpineLabel::LeftSpine);
        if tree.arena.get(left).is_leaf(left) {
            break;
        }
        left = tree.arena.get(left).in_node().expect("left spine node has no in");
    }

    let mut right = tree.arena.get(root).mid_node().expect("special root has no mid");
    loop {
        tree.arena.get_mut(right).set_spine_label(SpineLabel::RightSpine);
        if tree.arena.get(right).is_leaf(right) {
            break;
        }
        right = tree.arena.get(right).in_node().expect("right spine node has no in");
    }
}
