// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sortable state machine.
//!
//! [`SortableState`] holds every zone's trees plus the bookkeeping of the drag
//! in progress. Transitions take `&self` and return the next state; the
//! previous value stays valid, so a renderer can keep reading it while the
//! next one is computed.
//!
//! A drag goes through `start_sort`, any number of `save_item_move`, and then
//! either `commit_preview` + `end_sort` (drop) or `cancel_sort` (rollback).

use tracing::{debug, trace};

use crate::geometry::{AnimationBox, AnimationItem, BoxCache};
use crate::item::{ItemId, ZoneId};
use crate::moves::move_item;
use crate::position::{DropPosition, ItemPosition};
use crate::tree::ItemTree;
use crate::zones::{Zone, Zones};

/// Zones plus the state of the drag in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct SortableState<T> {
    zones: Zones<T>,
    item_id: Option<ItemId>,
    target_id: Option<ItemId>,
    orig_sort_pos: Option<ItemPosition>,
    source_position: Option<ItemPosition>,
    prev_position: Option<DropPosition>,
    sort_position: Option<DropPosition>,
    boxes: BoxCache,
    target_boxes: BoxCache,
    transforms: Vec<AnimationItem>,
    moved: bool,
    swapped: bool,
}

impl<T: Clone> Default for SortableState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> SortableState<T> {
    /// No zones, no drag.
    pub fn new() -> Self {
        Self {
            zones: Zones::new(),
            item_id: None,
            target_id: None,
            orig_sort_pos: None,
            source_position: None,
            prev_position: None,
            sort_position: None,
            boxes: BoxCache::new(),
            target_boxes: BoxCache::new(),
            transforms: Vec::new(),
            moved: false,
            swapped: false,
        }
    }

    /// All zones.
    pub fn zones(&self) -> &Zones<T> {
        &self.zones
    }

    /// The dragged item.
    pub fn item_id(&self) -> Option<&ItemId> {
        self.item_id.as_ref()
    }

    /// Item under the pointer at the last accepted move.
    pub fn target_id(&self) -> Option<&ItemId> {
        self.target_id.as_ref()
    }

    /// Where the dragged item was when the drag started.
    pub fn orig_sort_pos(&self) -> Option<&ItemPosition> {
        self.orig_sort_pos.as_ref()
    }

    /// Where the dragged item is in the preview.
    pub fn source_position(&self) -> Option<&ItemPosition> {
        self.source_position.as_ref()
    }

    /// Target before the last accepted move.
    pub fn prev_position(&self) -> Option<&DropPosition> {
        self.prev_position.as_ref()
    }

    /// Target of the last accepted move.
    pub fn sort_position(&self) -> Option<&DropPosition> {
        self.sort_position.as_ref()
    }

    /// Boxes measured before the pending move.
    pub fn boxes(&self) -> &BoxCache {
        &self.boxes
    }

    /// Boxes measured after the pending move.
    pub fn target_boxes(&self) -> &BoxCache {
        &self.target_boxes
    }

    /// Animation items of the last move.
    pub fn transforms(&self) -> &[AnimationItem] {
        &self.transforms
    }

    /// Returns true between `start_sort` and `end_sort`/`cancel_sort`.
    pub fn is_sorting(&self) -> bool {
        self.item_id.is_some()
    }

    /// Returns true once any move was accepted in this drag.
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Register or replace a zone.
    pub fn with_zone(&self, zone: impl Into<ZoneId>, items: ItemTree<T>) -> Self {
        Self {
            zones: self.zones.with(zone.into(), Zone::new(items)),
            ..self.clone()
        }
    }

    /// Replace a zone's committed tree, dropping its preview.
    ///
    /// Unknown zones are registered.
    pub fn set_zone_items(&self, zone: &ZoneId, items: ItemTree<T>) -> Self {
        self.with_zone(zone.clone(), items)
    }

    /// Unregister a zone.
    pub fn remove_zone(&self, zone: &ZoneId) -> Self {
        Self {
            zones: self.zones.without(zone),
            ..self.clone()
        }
    }

    /// Begin dragging `item_id`.
    ///
    /// All four positions are set to the item's current place. An item not
    /// found in `zone_id` leaves the state as it is.
    pub fn start_sort(&self, item_id: &ItemId, parent_id: Option<&ItemId>, zone_id: &ZoneId) -> Self {
        let Some(position) = self
            .zones
            .current(zone_id)
            .and_then(|tree| tree.position_of(item_id, zone_id))
        else {
            trace!(item = %item_id, zone = %zone_id, "start_sort: unknown item");
            return self.clone();
        };
        if position.parent.as_ref() != parent_id {
            trace!(item = %item_id, "start_sort: stale parent, using the tree's");
        }
        debug!(item = %item_id, zone = %zone_id, index = position.index, "sort started");
        let here = DropPosition::from(&position);
        Self {
            zones: self.zones.clone(),
            item_id: Some(item_id.clone()),
            target_id: None,
            orig_sort_pos: Some(position.clone()),
            source_position: Some(position),
            prev_position: Some(here.clone()),
            sort_position: Some(here),
            boxes: BoxCache::new(),
            target_boxes: BoxCache::new(),
            transforms: Vec::new(),
            moved: false,
            swapped: false,
        }
    }

    /// Move the dragged item to `candidate` in the preview trees.
    ///
    /// A move the tree move algorithm refuses leaves the state as it is.
    pub fn save_item_move(&self, candidate: &DropPosition, swap_with_placeholder: bool) -> Self {
        let (Some(item), Some(source)) = (&self.item_id, &self.source_position) else {
            return self.clone();
        };
        let zones = move_item(&self.zones, source, candidate, swap_with_placeholder);
        if zones.ptr_eq(&self.zones) {
            return self.clone();
        }
        let source_position = zones
            .current(&candidate.zone)
            .and_then(|tree| tree.position_of(item, &candidate.zone));
        trace!(item = %item, zone = %candidate.zone, index = ?candidate.index, "preview move");
        Self {
            zones,
            item_id: self.item_id.clone(),
            target_id: candidate.id.clone().or_else(|| self.target_id.clone()),
            orig_sort_pos: self.orig_sort_pos.clone(),
            source_position,
            prev_position: self.sort_position.clone(),
            sort_position: Some(candidate.clone()),
            boxes: BoxCache::new(),
            target_boxes: BoxCache::new(),
            transforms: self.transforms.clone(),
            moved: true,
            swapped: self.swapped || swap_with_placeholder,
        }
    }

    /// Promote every preview tree to the committed tree.
    pub fn commit_preview(&self) -> Self {
        Self {
            zones: self.zones.committed(),
            ..self.clone()
        }
    }

    /// Drop the animation items.
    pub fn clear_transform(&self) -> Self {
        Self {
            transforms: Vec::new(),
            ..self.clone()
        }
    }

    /// Store the animation items of the last move.
    pub fn set_transforms(&self, transforms: Vec<AnimationItem>) -> Self {
        Self {
            transforms,
            ..self.clone()
        }
    }

    /// Store a fresh pre-move snapshot of `zone`.
    pub fn refresh_positions(&self, zone: &ZoneId, boxes: Vec<AnimationBox>) -> Self {
        let mut next = self.clone();
        next.boxes.insert(zone.clone(), boxes);
        next
    }

    /// Store a fresh post-move snapshot of `zone`.
    pub fn set_target_boxes(&self, zone: &ZoneId, boxes: Vec<AnimationBox>) -> Self {
        let mut next = self.clone();
        next.target_boxes.insert(zone.clone(), boxes);
        next
    }

    /// Forget the drag; trees are left as they are.
    pub fn end_sort(&self) -> Self {
        Self {
            zones: self.zones.clone(),
            transforms: self.transforms.clone(),
            ..Self::new()
        }
    }

    /// Roll the drag back and forget it.
    ///
    /// After moves, the dragged item is moved back to where it started and the
    /// restored previews become the committed trees. When the preview was
    /// reached through swaps, which one move cannot undo, the previews are
    /// discarded instead. Either way every zone ends up structurally equal to
    /// its tree before the drag.
    pub fn cancel_sort(&self) -> Self {
        let zones = match (&self.source_position, &self.orig_sort_pos) {
            (Some(current), Some(orig)) if self.moved => {
                if self.swapped {
                    self.zones.discarded()
                } else {
                    move_item(&self.zones, current, &DropPosition::from(orig), false).committed()
                }
            }
            _ => self.zones.clone(),
        };
        debug!(item = ?self.item_id, "sort cancelled");
        Self {
            zones,
            ..Self::new()
        }
    }
}
