// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_sortable --heading-base-level=0

//! Understory Sortable: drag-to-reorder for lists, trees and tables.
//!
//! ## Overview
//!
//! Items live in named zones. Each zone holds a committed [`ItemTree`] and,
//! while a drag is in progress, a preview tree showing where the dragged item
//! would land. Dropping commits the previews; cancelling restores every zone to
//! what it was before the drag.
//!
//! All trees are persistent: a move produces new trees that share structure
//! with the old ones, and zones a move did not touch stay pointer-identical
//! (see [`Zones::ptr_eq`]).
//!
//! ## Layers
//!
//! - [`tree`] and [`moves`]: item trees and the pure move algorithm.
//! - [`state`]: [`SortableState`], the drag bookkeeping as immutable transitions.
//! - [`geometry`]: measured boxes and the FLIP animation items of a move.
//! - [`resolve`]: turns the element under the pointer into a drop position.
//! - [`sortable`]: [`Sortable`], answering [`understory_drag`] events and
//!   emitting [`SortEvent`]s.
//! - [`layout`]: [`SceneHost`], a headless host over [`understory_scene`].
//!
//! ## Moving items
//!
//! ```
//! use understory_sortable::{
//!     DropPosition, Item, ItemId, ItemTree, SortableState, ZoneId, move_item,
//! };
//!
//! let tree = ItemTree::from_items(vec![
//!     Item::leaf("a", ()),
//!     Item::leaf("b", ()),
//!     Item::group("box", (), vec![]),
//! ])
//! .unwrap();
//! let zone = ZoneId::new("list");
//! let state = SortableState::new().with_zone(zone.clone(), tree);
//!
//! // Pick up "a" and drop it into the empty container.
//! let a = ItemId::new("a");
//! let state = state.start_sort(&a, None, &zone);
//! let into_box = DropPosition::into_container(zone.clone(), Some(ItemId::new("box")));
//! let state = state.save_item_move(&into_box, false);
//! let state = state.commit_preview().end_sort();
//!
//! let tree = state.zones().current(&zone).unwrap();
//! assert_eq!(tree.parent_of(&a), Some(&ItemId::new("box")));
//! assert_eq!(tree.roots().len(), 2);
//!
//! // The same move expressed directly on zones.
//! let zones = state.zones();
//! let from = tree.position_of(&a, &zone).unwrap();
//! let back = DropPosition::at(zone.clone(), None, None, 0);
//! let moved = move_item(zones, &from, &back, false).committed();
//! assert_eq!(moved.current(&zone).unwrap().index_of(&a), Some(0));
//! ```
//!
//! Refused moves (into the item's own subtree, onto a leaf, to where the item
//! already is) return the input unchanged.

pub mod error;
pub mod geometry;
pub mod host;
pub mod item;
pub mod layout;
pub mod moves;
pub mod options;
pub mod position;
pub mod resolve;
pub mod sortable;
pub mod state;
pub mod tree;
pub mod zones;

pub use error::{GeometryError, TreeError};
pub use geometry::{
    AnimationBox, AnimationItem, BoxCache, MoveInfo, MoveKind, compute_moving_items, measure_box,
    measure_zone,
};
pub use host::{ElementMatch, SortableHost};
pub use item::{GroupName, Item, ItemId, ItemKind, ZoneId};
pub use layout::{RowLayout, SceneHost};
pub use moves::move_item;
pub use options::{SortableOptions, ZoneOptions};
pub use position::{DropPosition, ItemPosition};
pub use resolve::{Rejection, Resolution, TargetKind, resolve};
pub use sortable::{SortEvent, Sortable, SortableDelegate};
pub use state::SortableState;
pub use tree::{ItemTree, Location, Node, Preorder};
pub use zones::{Zone, Zones};
