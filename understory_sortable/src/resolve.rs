// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drop target resolution: from the element under the avatar to a candidate move.
//!
//! The element is walked up to the nearest item, container or placeholder, and
//! the candidate is classified:
//!
//! - over an item of the dragged item's own list: reorder;
//! - over an item of another list or zone: transfer next to it;
//! - over an empty zone, or an empty container of a tree-mode zone: drop into it;
//! - over a placeholder: swap.
//!
//! The final index of a drop onto a row is that row's index: removing the
//! dragged row first shifts the row into the gap the pointer points at.
//!
//! Anything else is a [`Rejection`]; the caller keeps the previous preview.

use std::collections::BTreeMap;

use crate::host::{ElementMatch, SortableHost};
use crate::item::{GroupName, ItemId, ZoneId};
use crate::options::ZoneOptions;
use crate::position::DropPosition;
use crate::state::SortableState;
use crate::tree::Node;

/// How a resolved target moves the dragged item.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TargetKind {
    /// Within the item's current list.
    Reorder,
    /// Into another list, next to an item.
    Transfer,
    /// Into a list that is empty.
    IntoEmpty,
    /// Exchange with another item.
    Swap,
}

/// A usable drop target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Where to move the dragged item.
    pub target: DropPosition,
    /// Classification.
    pub kind: TargetKind,
}

impl Resolution {
    /// Returns true for swaps.
    pub fn swap_with_placeholder(&self) -> bool {
        self.kind == TargetKind::Swap
    }
}

/// Why an element is not a usable drop target.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// No drag in progress.
    NotSorting,
    /// Nothing at or above the element belongs to a zone.
    NoMatch,
    /// The element belongs to a zone without options or trees.
    UnknownZone,
    /// The element renders the dragged item itself.
    OwnElement,
    /// The element lies inside the dragged item's subtree.
    InsideDragged,
    /// The element renders a container the dragged item lies in.
    Ancestor,
    /// The item's group tag does not match the destination zone's.
    GroupMismatch,
    /// Moving between containers needs a tree-mode zone.
    TreeModeOnly,
    /// A container was hit directly but already has children.
    OccupiedContainer,
    /// A placeholder was hit in a zone that does not swap.
    SwapDisabled,
    /// The item is already there.
    Redundant,
}

/// Resolve `element` against the drag in `state`.
pub fn resolve<T: Clone, H: SortableHost>(
    state: &SortableState<T>,
    options: &BTreeMap<ZoneId, ZoneOptions>,
    host: &H,
    element: H::Element,
) -> Result<Resolution, Rejection> {
    let (Some(item), Some(source)) = (state.item_id(), state.source_position()) else {
        return Err(Rejection::NotSorting);
    };
    let (_, matched) = host.closest_match(element).ok_or(Rejection::NoMatch)?;
    let zone = matched.zone().clone();
    let zone_options = options.get(&zone).ok_or(Rejection::UnknownZone)?;
    let tree = state.zones().current(&zone).ok_or(Rejection::UnknownZone)?;
    let same_zone = zone == source.zone;

    if !same_zone {
        let source_tree = state
            .zones()
            .current(&source.zone)
            .ok_or(Rejection::UnknownZone)?;
        let item_group: Option<&GroupName> = source_tree
            .get(item)
            .and_then(Node::group)
            .or_else(|| options.get(&source.zone).and_then(|o| o.group.as_ref()));
        if item_group != zone_options.group.as_ref() {
            return Err(Rejection::GroupMismatch);
        }
    }
    let inside_dragged = |id: &ItemId| same_zone && tree.contains(item, id);
    let encloses_dragged = |id: &ItemId| same_zone && tree.contains(id, item);

    let (target, kind) = match matched {
        ElementMatch::Item { id, .. } => {
            if &id == item {
                return Err(Rejection::OwnElement);
            }
            if inside_dragged(&id) {
                return Err(Rejection::InsideDragged);
            }
            if encloses_dragged(&id) {
                return Err(Rejection::Ancestor);
            }
            let at = tree.locate(&id).ok_or(Rejection::NoMatch)?;
            let same_list = same_zone && at.parent == source.parent;
            if !same_list && (same_zone || at.parent.is_some()) && !zone_options.tree_mode {
                return Err(Rejection::TreeModeOnly);
            }
            let kind = if same_list {
                TargetKind::Reorder
            } else {
                TargetKind::Transfer
            };
            (DropPosition::at(zone, at.parent, Some(id), at.index), kind)
        }
        ElementMatch::Placeholder { id, .. } => {
            if &id == item {
                return Err(Rejection::OwnElement);
            }
            if !zone_options.swap {
                return Err(Rejection::SwapDisabled);
            }
            if inside_dragged(&id) {
                return Err(Rejection::InsideDragged);
            }
            if encloses_dragged(&id) {
                return Err(Rejection::Ancestor);
            }
            let at = tree.locate(&id).ok_or(Rejection::NoMatch)?;
            (DropPosition::at(zone, at.parent, Some(id), at.index), TargetKind::Swap)
        }
        ElementMatch::Container { id: None, .. } => {
            if !tree.roots().is_empty() {
                return Err(Rejection::OccupiedContainer);
            }
            (DropPosition::into_container(zone, None), TargetKind::IntoEmpty)
        }
        ElementMatch::Container { id: Some(id), .. } => {
            if !zone_options.tree_mode {
                return Err(Rejection::TreeModeOnly);
            }
            if inside_dragged(&id) {
                return Err(Rejection::InsideDragged);
            }
            if encloses_dragged(&id) {
                return Err(Rejection::Ancestor);
            }
            let children = tree.children(Some(&id)).map_err(|_| Rejection::NoMatch)?;
            if !children.is_empty() {
                return Err(Rejection::OccupiedContainer);
            }
            (DropPosition::into_container(zone, Some(id)), TargetKind::IntoEmpty)
        }
    };

    if kind != TargetKind::Swap
        && target.zone == source.zone
        && target.parent == source.parent
        && target.index == Some(source.index)
    {
        return Err(Rejection::Redundant);
    }
    Ok(Resolution { target, kind })
}
