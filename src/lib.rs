//! Persistence diagrams of piecewise-linear functions via **banana trees**.
//!
//! A banana tree is a pointer-linked (here: arena-indexed) data structure
//! that encodes every persistent pair of a real-valued function sampled
//! along a one-dimensional ordered domain, together with the nesting
//! relationships between pairs. Two trees are built over the same domain —
//! an up-tree (`Sign = Up`, sublevel-set persistence) and a down-tree
//! (`Sign = Down`, superlevel-set persistence) — and [`diagram::extract`]
//! reads a [`diagram::PersistenceDiagram`] out of the pair.
//!
//! ```
//! use banana_tree::prelude::*;
//!
//! let mut list = SampleList::new();
//! for v in [0.0, 3.0, 1.0, 4.0, 2.0] {
//!     list.push(v);
//! }
//! let left = list.first().unwrap();
//! let right = list.last().unwrap();
//!
//! let up: BananaTree<Up, SampleList> = BananaTree::construct(&mut list, left, right);
//! let down: BananaTree<Down, SampleList> = BananaTree::construct(&mut list, left, right);
//!
//! let mut dgm = PersistenceDiagram::new();
//! diagram::extract(&up, &down, &list, &mut dgm);
//! assert_eq!(dgm.essential().count(), 1);
//! ```
//!
//! Module layout mirrors the component breakdown of the design this crate
//! implements: [`pool`] (the arena backing every node), [`node`] and [`tree`]
//! (the six-link node and its owning container), [`construction`] (the
//! linear build pass), [`walk`] and [`string_iter`] (the two traversals),
//! and [`diagram`] (persistence-diagram extraction). [`item`] defines the
//! `SampleItem` contract external domain representations must satisfy;
//! [`sample_list`] is a minimal concrete one used by this crate's own tests
//! and doctests. [`sign`] factors the up/down duality into a small
//! zero-cost capability trait.

pub mod construction;
pub mod diagram;
pub mod item;
pub mod node;
pub mod pool;
pub mod sample_list;
pub mod sign;
pub mod string_iter;
pub mod tree;
pub mod walk;

pub use diagram::{DiagramKind, Difference, PersistenceDiagram, PersistentPair};
pub use item::SampleItem;
pub use node::{BananaNode, SpineLabel};
pub use pool::{Arena, Id as NodeId};
pub use sample_list::{ItemId, SampleList};
pub use sign::{Down, Sign, Up};
pub use string_iter::StringIter;
pub use tree::BananaTree;
pub use walk::WalkIter;

/// Convenience glob import for downstream crates and this crate's own tests:
/// `use banana_tree::prelude::*;` pulls in every public type needed to build
/// a tree, run a traversal, and extract a diagram.
pub mod prelude {
    pub use crate::diagram::{self, DiagramKind, Difference, PersistenceDiagram, PersistentPair};
    pub use crate::item::SampleItem;
    pub use crate::node::{BananaNode, SpineLabel};
    pub use crate::pool::{Arena, Id as NodeId};
    pub use crate::sample_list::{ItemId, SampleList};
    pub use crate::sign::{Down, Sign, Up};
    pub use crate::string_iter::StringIter;
    pub use crate::tree::BananaTree;
    pub use crate::walk::WalkIter;
}
