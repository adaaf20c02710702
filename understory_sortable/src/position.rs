// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positions of items and candidate drop positions.

use crate::item::{ItemId, ZoneId};

/// Where an item sits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemPosition {
    /// The item.
    pub id: ItemId,
    /// Containing item, or `None` for the zone's root list.
    pub parent: Option<ItemId>,
    /// Index in the parent's child list.
    pub index: usize,
    /// Zone holding the item.
    pub zone: ZoneId,
}

/// A candidate place to move the dragged item to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropPosition {
    /// Item under the pointer, if any. For swaps this is the item exchanged with.
    pub id: Option<ItemId>,
    /// Destination container, or `None` for the zone's root list.
    pub parent: Option<ItemId>,
    /// Final index of the moved item, counted after it has been removed from its
    /// old place. `None` locates `id` in the destination list, or appends.
    pub index: Option<usize>,
    /// Destination zone.
    pub zone: ZoneId,
}

impl DropPosition {
    /// Drop next to (or onto) `id`, at final index `index` of `parent`.
    pub fn at(
        zone: impl Into<ZoneId>,
        parent: Option<ItemId>,
        id: Option<ItemId>,
        index: usize,
    ) -> Self {
        Self {
            id,
            parent,
            index: Some(index),
            zone: zone.into(),
        }
    }

    /// Drop into the (empty) child list of `parent`.
    pub fn into_container(zone: impl Into<ZoneId>, parent: Option<ItemId>) -> Self {
        Self::at(zone, parent, None, 0)
    }

    /// Drop onto `id`, resolving the index from its place in `parent`.
    pub fn onto(zone: impl Into<ZoneId>, parent: Option<ItemId>, id: impl Into<ItemId>) -> Self {
        Self {
            id: Some(id.into()),
            parent,
            index: None,
            zone: zone.into(),
        }
    }
}

impl From<&ItemPosition> for DropPosition {
    fn from(position: &ItemPosition) -> Self {
        Self {
            id: None,
            parent: position.parent.clone(),
            index: Some(position.index),
            zone: position.zone.clone(),
        }
    }
}
