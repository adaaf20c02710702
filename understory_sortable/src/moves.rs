// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree move algorithm.
//!
//! [`move_item`] reads the current tree of each affected zone (the preview if
//! one exists) and writes the result into that zone's preview. A refused move
//! returns the input map itself, which [`Zones::ptr_eq`] reports as unchanged.

use tracing::trace;

use crate::item::{ItemId, ZoneId};
use crate::position::{DropPosition, ItemPosition};
use crate::tree::Location;
use crate::zones::Zones;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Refusal {
    OntoItself,
    UnknownZone,
    UnknownItem,
    NotAContainer,
    Cycle,
    IdCollision,
    Redundant,
}

/// Move `source` to `target`, or exchange it with `target.id` when
/// `swap_with_placeholder` is set.
///
/// Returns `zones` unchanged when:
/// - the target is the item itself,
/// - a zone, the item, or the target parent is unknown (or the parent is a leaf),
/// - the target parent lies inside the moving subtree (for swaps: either subtree contains the other),
/// - moving across zones would duplicate an id in the destination,
/// - the item would land exactly where it is.
///
/// The item's place is taken from the tree; `source.parent` and `source.index` are not trusted.
pub fn move_item<T: Clone>(
    zones: &Zones<T>,
    source: &ItemPosition,
    target: &DropPosition,
    swap_with_placeholder: bool,
) -> Zones<T> {
    let result = match (&target.id, swap_with_placeholder) {
        (Some(other), true) => swap(zones, source, &target.zone, other),
        _ => shift(zones, source, target),
    };
    result.unwrap_or_else(|refusal| {
        trace!(item = %source.id, zone = %target.zone, ?refusal, "move refused");
        zones.clone()
    })
}

fn locate_source<T: Clone>(zones: &Zones<T>, source: &ItemPosition) -> Result<Location, Refusal> {
    zones
        .current(&source.zone)
        .ok_or(Refusal::UnknownZone)?
        .locate(&source.id)
        .ok_or(Refusal::UnknownItem)
}

fn shift<T: Clone>(
    zones: &Zones<T>,
    source: &ItemPosition,
    target: &DropPosition,
) -> Result<Zones<T>, Refusal> {
    if target.id.as_ref() == Some(&source.id) {
        return Err(Refusal::OntoItself);
    }
    let from = locate_source(zones, source)?;
    let src = zones.current(&source.zone).ok_or(Refusal::UnknownZone)?;
    let dst = zones.current(&target.zone).ok_or(Refusal::UnknownZone)?;
    let parent = target.parent.as_ref();
    let list = dst.children(parent).map_err(|_| Refusal::NotAContainer)?;
    let same_zone = source.zone == target.zone;
    let same_list = same_zone && from.parent.as_ref() == parent;

    if same_zone && parent.is_some_and(|p| src.contains(&source.id, p)) {
        return Err(Refusal::Cycle);
    }

    // Length of the destination list once the item has left it.
    let len = if same_list { list.len() - 1 } else { list.len() };
    // A target found by id is counted before removal. That index puts the item
    // past the target when it came from above and before it when it came from below.
    let index = target
        .index
        .or_else(|| target.id.as_ref().and_then(|t| list.index_of(t)))
        .unwrap_or(len)
        .min(len);

    if same_list && index == from.index {
        return Err(Refusal::Redundant);
    }

    if same_zone {
        let mut tree = src.clone();
        tree.unlink(&source.id);
        tree.link(&source.id, parent, index);
        return Ok(zones.with_preview(&source.zone, tree));
    }

    let mut src = src.clone();
    let mut dst = dst.clone();
    let (_, moving) = src
        .take_subtree(&source.id)
        .ok_or(Refusal::UnknownItem)?;
    if moving.ids().any(|id| dst.contains_id(id)) {
        return Err(Refusal::IdCollision);
    }
    dst.graft(moving, parent, index);
    Ok(zones
        .with_preview(&source.zone, src)
        .with_preview(&target.zone, dst))
}

fn swap<T: Clone>(
    zones: &Zones<T>,
    source: &ItemPosition,
    target_zone: &ZoneId,
    other: &ItemId,
) -> Result<Zones<T>, Refusal> {
    let item = &source.id;
    if item == other {
        return Err(Refusal::OntoItself);
    }
    let from = locate_source(zones, source)?;
    let src = zones.current(&source.zone).ok_or(Refusal::UnknownZone)?;
    let dst = zones.current(target_zone).ok_or(Refusal::UnknownZone)?;
    let to = dst.locate(other).ok_or(Refusal::UnknownItem)?;

    if source.zone == *target_zone {
        if src.contains(item, other) || src.contains(other, item) {
            return Err(Refusal::Cycle);
        }
        let mut tree = src.clone();
        tree.put(other, from.parent.as_ref(), from.index);
        tree.put(item, to.parent.as_ref(), to.index);
        return Ok(zones.with_preview(target_zone, tree));
    }

    let mut src = src.clone();
    let mut dst = dst.clone();
    let (_, moving) = src.take_subtree(item).ok_or(Refusal::UnknownItem)?;
    let (_, swapped) = dst.take_subtree(other).ok_or(Refusal::UnknownItem)?;
    if moving.ids().any(|id| dst.contains_id(id)) || swapped.ids().any(|id| src.contains_id(id)) {
        return Err(Refusal::IdCollision);
    }
    src.graft(swapped, from.parent.as_ref(), from.index);
    dst.graft(moving, to.parent.as_ref(), to.index);
    Ok(zones
        .with_preview(&source.zone, src)
        .with_preview(target_zone, dst))
}
