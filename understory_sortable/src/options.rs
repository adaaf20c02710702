// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-zone and controller-wide configuration.

use understory_drag::AvatarKind;

use crate::item::GroupName;

/// How a zone behaves as a drop area.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZoneOptions {
    /// Group tag of the zone. Items only travel between zones whose tags match
    /// (an item's own tag overrides its zone's).
    pub group: Option<GroupName>,
    /// Allow moves between containers of this zone and drops into empty containers.
    pub tree_mode: bool,
    /// Items are rendered as swap placeholders: dropping onto one exchanges places.
    pub swap: bool,
}

impl ZoneOptions {
    /// A flat list with no group tag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the group tag.
    pub fn with_group(mut self, group: impl Into<GroupName>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Treat the zone as a tree.
    pub fn tree(mut self) -> Self {
        self.tree_mode = true;
        self
    }

    /// Swap instead of shifting (tables, grids of fixed slots).
    pub fn swapping(mut self) -> Self {
        self.swap = true;
        self
    }
}

/// Controller-wide settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortableOptions {
    /// Kind of the avatar handed to the drag orchestrator.
    pub avatar_kind: AvatarKind,
}

impl Default for SortableOptions {
    fn default() -> Self {
        Self {
            avatar_kind: AvatarKind("sortable-item"),
        }
    }
}
