// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors for contract violations.
//!
//! Expected refusals during a drag (cycles, group mismatches, redundant moves)
//! are not errors; they leave the state unchanged.

use thiserror::Error;

use crate::item::{ItemId, ZoneId};

/// Invalid arguments passed to tree operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A child list was requested from an item that is not a container.
    #[error("invalid argument: item `{0}` is a leaf, not a container")]
    NotAContainer(ItemId),
    /// The item is not part of the tree.
    #[error("invalid argument: unknown item `{0}`")]
    UnknownItem(ItemId),
    /// The same id appears twice in the supplied items.
    #[error("invalid argument: duplicate item id `{0}`")]
    DuplicateId(ItemId),
    /// The zone is not registered.
    #[error("invalid argument: unknown zone `{0}`")]
    UnknownZone(ZoneId),
}

/// Failures while snapshotting rendered geometry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The host has no rendered element for an item.
    #[error("no element rendered for item `{item}` in zone `{zone}`")]
    MissingElement {
        /// Zone of the item.
        zone: ZoneId,
        /// The unrendered item.
        item: ItemId,
    },
}
