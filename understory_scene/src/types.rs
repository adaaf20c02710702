// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: element identifiers, flags, and local geometry.

use kurbo::{Size, Vec2};

/// Identifier for an element in the scene.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `ElementId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `ElementId`.
///
/// Use [`Scene::is_alive`](crate::Scene::is_alive) to check whether an `ElementId` still refers to a live element.
/// Stale ids never alias a different live element because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Element flags controlling visibility, picking, and interactivity.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is visible (participates in hit testing and measurement).
        const VISIBLE     = 0b0000_0001;
        /// Element is pickable (participates in hit testing).
        const PICKABLE    = 0b0000_0010;
        /// Element handles pointer input on its own (buttons, inputs, links).
        ///
        /// Drag sources refuse to start a drag from inside such an element
        /// unless it is listed as an explicit handle.
        const INTERACTIVE = 0b0000_0100;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Local geometry and styling for an element.
///
/// Offsets are relative to the parent's origin, the way a positioned box is
/// placed inside its containing block.
#[derive(Clone, Debug)]
pub struct LocalElement {
    /// Offset of this element's origin from its parent's origin.
    pub offset: Vec2,
    /// Size the element takes when no explicit size is applied.
    pub intrinsic_size: Size,
    /// Explicit size styling (for example a pinned width/height during an animation).
    ///
    /// When set, it overrides [`LocalElement::intrinsic_size`] for rendering and hit testing.
    pub explicit_size: Option<Size>,
    /// Z-order within the parent. Higher is painted on top.
    pub z_index: i32,
    /// Visibility, picking and interactivity flags.
    pub flags: ElementFlags,
}

impl Default for LocalElement {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            intrinsic_size: Size::ZERO,
            explicit_size: None,
            z_index: 0,
            flags: ElementFlags::default(),
        }
    }
}

impl LocalElement {
    /// An element at `offset` with the given intrinsic size.
    pub fn at(offset: Vec2, intrinsic_size: Size) -> Self {
        Self {
            offset,
            intrinsic_size,
            ..Default::default()
        }
    }

    /// The size currently rendered: explicit styling wins over the intrinsic size.
    pub fn rendered_size(&self) -> Size {
        self.explicit_size.unwrap_or(self.intrinsic_size)
    }
}
